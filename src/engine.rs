//! Analysis orchestration.
//!
//! [`Engine::analyze_full`] runs the whole pipeline for one snippet:
//!
//! ```text
//! detect -> analyze -> security scan? -> performance scan? -> score -> comments -> docs
//! ```
//!
//! It never fails. A stage error (or panic) yields a degraded result with
//! language `unknown`, empty facts and fallback comments.

use once_cell::sync::OnceCell;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};

use crate::analysis::{self, AnalysisError, StructuralFacts};
use crate::comments::{fallback_comments, CommentSynthesizer};
use crate::docs;
use crate::language::{self, SourceLanguage};
use crate::scan::{scan_performance, scan_security, Finding, PerformanceSuggestion};
use crate::score;
use crate::settings::Settings;

static DEFAULT_ENGINE: OnceCell<Engine> = OnceCell::new();

/// Process-wide engine built from the environment on first use.
pub fn default_engine() -> &'static Engine {
    DEFAULT_ENGINE.get_or_init(Engine::from_env)
}

/// Per-call feature toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub security_enabled: bool,
    pub performance_enabled: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            security_enabled: true,
            performance_enabled: true,
        }
    }
}

impl From<&Settings> for ScanConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            security_enabled: settings.security_scan,
            performance_enabled: settings.performance_analysis,
        }
    }
}

/// Result of one full analysis.
///
/// Only the engine builds these, so the quality score always agrees with
/// the source and facts it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    commented_code: String,
    language: SourceLanguage,
    facts: StructuralFacts,
    security_issues: Vec<Finding>,
    performance_suggestions: Vec<PerformanceSuggestion>,
    quality_score: f64,
    documentation: String,
    #[serde(default)]
    degraded: bool,
}

impl AnalysisResult {
    pub fn commented_code(&self) -> &str {
        &self.commented_code
    }

    pub fn language(&self) -> SourceLanguage {
        self.language
    }

    pub fn facts(&self) -> &StructuralFacts {
        &self.facts
    }

    pub fn security_issues(&self) -> &[Finding] {
        &self.security_issues
    }

    pub fn performance_suggestions(&self) -> &[PerformanceSuggestion] {
        &self.performance_suggestions
    }

    pub fn quality_score(&self) -> f64 {
        self.quality_score
    }

    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    /// Cyclomatic complexity as a float.
    pub fn complexity_score(&self) -> f64 {
        f64::from(self.facts.complexity)
    }

    pub fn lines_of_code(&self) -> usize {
        self.facts.lines
    }

    /// Whether a stage failed and this is a best-effort placeholder.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn has_high_severity(&self) -> bool {
        self.security_issues
            .iter()
            .any(|f| f.severity == crate::scan::Severity::High)
    }
}

/// The analysis pipeline plus its comment strategy chain.
pub struct Engine {
    settings: Settings,
    comments: CommentSynthesizer,
}

impl Engine {
    pub fn new(settings: Settings) -> Self {
        let comments = CommentSynthesizer::from_settings(&settings);
        Self { settings, comments }
    }

    pub fn from_env() -> Self {
        Self::new(Settings::from_env())
    }

    /// Engine with a caller-supplied strategy chain.
    pub fn with_comments(settings: Settings, comments: CommentSynthesizer) -> Self {
        Self { settings, comments }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Scan toggles taken from this engine's settings.
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig::from(&self.settings)
    }

    /// Run the full pipeline. Never fails.
    pub fn analyze_full(&self, source: &str, config: &ScanConfig) -> AnalysisResult {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_pipeline(source, config)));

        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "analysis stage failed, returning degraded result");
                degraded(source)
            }
            Err(_) => {
                tracing::warn!("analysis stage panicked, returning degraded result");
                degraded(source)
            }
        }
    }

    /// Detect the language, then synthesize comments.
    pub fn synthesize_comments_only(&self, source: &str) -> String {
        let language = language::detect(source);
        self.comments.synthesize(source, language)
    }

    /// Analyze many snippets in parallel. Output order matches input order.
    pub fn analyze_batch<S>(&self, sources: &[S], config: &ScanConfig) -> Vec<AnalysisResult>
    where
        S: AsRef<str> + Sync,
    {
        sources
            .par_iter()
            .map(|source| self.analyze_full(source.as_ref(), config))
            .collect()
    }

    fn run_pipeline(
        &self,
        source: &str,
        config: &ScanConfig,
    ) -> Result<AnalysisResult, AnalysisError> {
        let language = language::detect(source);
        let facts = analysis::analyze(source, language)?;
        tracing::debug!(%language, lines = facts.lines, complexity = facts.complexity, "structure analyzed");

        let security_issues = if config.security_enabled {
            scan_security(source)
        } else {
            Vec::new()
        };
        let performance_suggestions = if config.performance_enabled {
            scan_performance(source)
        } else {
            Vec::new()
        };

        let quality_score = score::score(source, &facts);
        let commented_code = self.comments.synthesize(source, language);
        let documentation = docs::render(&facts, language);

        Ok(AnalysisResult {
            commented_code,
            language,
            facts,
            security_issues,
            performance_suggestions,
            quality_score,
            documentation,
            degraded: false,
        })
    }
}

fn degraded(source: &str) -> AnalysisResult {
    let facts = StructuralFacts::empty();
    let language = SourceLanguage::Unknown;

    AnalysisResult {
        commented_code: fallback_comments(source),
        language,
        quality_score: score::score(source, &facts),
        documentation: docs::render(&facts, language),
        facts,
        security_issues: Vec::new(),
        performance_suggestions: Vec::new(),
        degraded: true,
    }
}
