//! Language-specific analyzer implementations and the dispatch point.

mod generic;
mod python;

pub use generic::GenericAnalyzer;
pub use python::PythonAnalyzer;

use super::StructuralAnalyzer;
use crate::language::SourceLanguage;
use once_cell::sync::OnceCell;

/// Static storage for the Python analyzer.
static PYTHON_ANALYZER: OnceCell<PythonAnalyzer> = OnceCell::new();

/// Static storage for the generic analyzer.
static GENERIC_ANALYZER: OnceCell<GenericAnalyzer> = OnceCell::new();

/// Get the analyzer for a language.
///
/// Python gets the exact tree-sitter analyzer; every other variant,
/// `Unknown` included, gets the generic line counter.
pub fn analyzer_for(language: SourceLanguage) -> &'static dyn StructuralAnalyzer {
    match language {
        SourceLanguage::Python => {
            PYTHON_ANALYZER.get_or_init(PythonAnalyzer::new) as &'static dyn StructuralAnalyzer
        }
        SourceLanguage::JavaScript
        | SourceLanguage::Java
        | SourceLanguage::Cpp
        | SourceLanguage::C
        | SourceLanguage::TypeScript
        | SourceLanguage::Php
        | SourceLanguage::Ruby
        | SourceLanguage::Go
        | SourceLanguage::Rust
        | SourceLanguage::Swift
        | SourceLanguage::Unknown => {
            GENERIC_ANALYZER.get_or_init(GenericAnalyzer::new) as &'static dyn StructuralAnalyzer
        }
    }
}

/// Languages with an exact (syntax tree) analyzer.
pub fn exact_languages() -> Vec<SourceLanguage> {
    SourceLanguage::ALL
        .iter()
        .copied()
        .filter(|lang| analyzer_for(*lang).is_exact())
        .collect()
}
