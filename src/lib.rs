//! Codescribe - multi-language source analysis engine.
//!
//! Given a snippet of source code, codescribe identifies its language,
//! extracts structural facts (functions, classes, imports, complexity),
//! flags security and performance risk patterns, computes a quality score,
//! writes inline commentary and renders a documentation summary.
//!
//! # Architecture
//!
//! - `language`: language tags and lexical detection
//! - `analysis`: structural analyzers (tree-sitter for Python, line count otherwise)
//! - `scan`: security and performance rule tables and scanners
//! - `score`: quality score calculation
//! - `comments`: template annotation and the generation strategy chain
//! - `docs`: documentation rendering
//! - `engine`: the pipeline that ties the stages into one `AnalysisResult`
//! - `settings`, `input`, `ratelimit`, `report`, `cli`: the outer surface
//!
//! # Example
//!
//! ```no_run
//! use codescribe::{Engine, ScanConfig, Settings};
//!
//! let engine = Engine::new(Settings::default());
//! let result = engine.analyze_full("import os\n", &ScanConfig::default());
//! println!("{} scored {}", result.language(), result.quality_score());
//! ```

pub mod analysis;
pub mod cli;
pub mod comments;
pub mod docs;
pub mod engine;
pub mod input;
pub mod language;
pub mod ratelimit;
pub mod report;
pub mod scan;
pub mod score;
pub mod settings;

pub use analysis::{AnalysisError, StructuralAnalyzer, StructuralFacts};
pub use comments::{CommentStrategy, CommentSynthesizer, StrategyError};
pub use engine::{default_engine, AnalysisResult, Engine, ScanConfig};
pub use input::{validate_code_input, CodeMetrics, InputError};
pub use language::SourceLanguage;
pub use ratelimit::RateLimiter;
pub use scan::{Finding, IssueCategory, PerformanceSuggestion, Severity};
pub use score::QualityScore;
pub use settings::{Settings, SettingsError};
