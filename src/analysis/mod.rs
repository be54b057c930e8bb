//! Structural analysis.
//!
//! This module turns source text into [`StructuralFacts`]: function
//! signatures, class names, imports, cyclomatic complexity and line count.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐     ┌──────────────────┐
//! │ Source +        │────▶│ analyzer_for()   │────▶│ StructuralFacts  │
//! │ SourceLanguage  │     │ (Python: exact,  │     │ (functions,      │
//! └─────────────────┘     │  others: generic)│     │  classes, ...)   │
//!                         └──────────────────┘     └──────────────────┘
//! ```
//!
//! # Adding a New Language
//!
//! 1. Create a new module in `src/analysis/languages/`
//! 2. Implement the `StructuralAnalyzer` trait
//! 3. Route the language's variant to it in `languages::analyzer_for`

mod facts;
mod languages;
mod traits;

pub use facts::{count_lines, format_signature, StructuralFacts};
pub use languages::{analyzer_for, exact_languages, GenericAnalyzer, PythonAnalyzer};
pub use traits::StructuralAnalyzer;

use thiserror::Error;

use crate::language::SourceLanguage;

/// Errors that stop an analyzer from running at all.
///
/// A source file that fails to parse is not an error; see
/// [`StructuralAnalyzer::analyze`].
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("failed to load grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),
    #[error("invalid tree-sitter query: {0}")]
    Query(#[from] tree_sitter::QueryError),
}

/// Analyze source with the analyzer registered for `language`.
pub fn analyze(source: &str, language: SourceLanguage) -> Result<StructuralFacts, AnalysisError> {
    analyzer_for(language).analyze(source)
}
