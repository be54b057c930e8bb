//! Core trait for structural analysis.

use super::{AnalysisError, StructuralFacts};

/// Language-specific structural analyzer.
///
/// Implementations either parse a full syntax tree (exact) or fall back to
/// counting lines (generic). Both report through [`StructuralFacts`].
///
/// # Thread Safety
///
/// tree_sitter::Parser is not Sync, so exact implementations create a parser
/// per call instead of holding one.
pub trait StructuralAnalyzer: Send + Sync {
    /// Returns the language identifier (e.g., "python", "generic").
    fn language_id(&self) -> &'static str;

    /// Whether this analyzer builds a real syntax tree.
    fn is_exact(&self) -> bool;

    /// Extract structural facts from source text.
    ///
    /// Parse failures are not errors: they yield [`StructuralFacts::empty`].
    /// An `Err` means the analyzer itself could not run (e.g. grammar load
    /// failure) and is left to the caller to recover from.
    fn analyze(&self, source: &str) -> Result<StructuralFacts, AnalysisError>;
}
