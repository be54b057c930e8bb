//! Fallback analyzer for languages without a parser.

use crate::analysis::{AnalysisError, StructuralAnalyzer, StructuralFacts};

/// Reports only the line count; every collection stays empty.
#[derive(Debug, Default)]
pub struct GenericAnalyzer;

impl GenericAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl StructuralAnalyzer for GenericAnalyzer {
    fn language_id(&self) -> &'static str {
        "generic"
    }

    fn is_exact(&self) -> bool {
        false
    }

    fn analyze(&self, source: &str) -> Result<StructuralFacts, AnalysisError> {
        Ok(StructuralFacts::line_count_only(source))
    }
}
