//! Source language tags and language detection.

mod detect;

pub use detect::{classify, detect, label_to_language, LANGUAGE_TABLE, UNCLASSIFIED_LABEL};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of languages the engine can tag a snippet with.
///
/// Python is the only language with exact (syntax tree) structural analysis;
/// Python and JavaScript have local comment template tables. Everything else
/// goes through the heuristic paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    Python,
    JavaScript,
    Java,
    Cpp,
    C,
    TypeScript,
    Php,
    Ruby,
    Go,
    Rust,
    Swift,
    Unknown,
}

impl SourceLanguage {
    /// Every variant, in declaration order.
    pub const ALL: [SourceLanguage; 12] = [
        SourceLanguage::Python,
        SourceLanguage::JavaScript,
        SourceLanguage::Java,
        SourceLanguage::Cpp,
        SourceLanguage::C,
        SourceLanguage::TypeScript,
        SourceLanguage::Php,
        SourceLanguage::Ruby,
        SourceLanguage::Go,
        SourceLanguage::Rust,
        SourceLanguage::Swift,
        SourceLanguage::Unknown,
    ];

    /// Wire value (e.g. "python", "cpp", "unknown").
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLanguage::Python => "python",
            SourceLanguage::JavaScript => "javascript",
            SourceLanguage::Java => "java",
            SourceLanguage::Cpp => "cpp",
            SourceLanguage::C => "c",
            SourceLanguage::TypeScript => "typescript",
            SourceLanguage::Php => "php",
            SourceLanguage::Ruby => "ruby",
            SourceLanguage::Go => "go",
            SourceLanguage::Rust => "rust",
            SourceLanguage::Swift => "swift",
            SourceLanguage::Unknown => "unknown",
        }
    }

    /// Title-cased wire value, used in rendered documentation.
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceLanguage::Python => "Python",
            SourceLanguage::JavaScript => "Javascript",
            SourceLanguage::Java => "Java",
            SourceLanguage::Cpp => "Cpp",
            SourceLanguage::C => "C",
            SourceLanguage::TypeScript => "Typescript",
            SourceLanguage::Php => "Php",
            SourceLanguage::Ruby => "Ruby",
            SourceLanguage::Go => "Go",
            SourceLanguage::Rust => "Rust",
            SourceLanguage::Swift => "Swift",
            SourceLanguage::Unknown => "Unknown",
        }
    }

    /// Parse a wire value. Unrecognized values map to `Unknown`.
    pub fn parse(s: &str) -> Self {
        let lowered = s.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == lowered)
            .unwrap_or(SourceLanguage::Unknown)
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values_round_trip() {
        for lang in SourceLanguage::ALL {
            assert_eq!(SourceLanguage::parse(lang.as_str()), lang);
        }
        assert_eq!(SourceLanguage::parse("COBOL"), SourceLanguage::Unknown);
        assert_eq!(SourceLanguage::parse("Python"), SourceLanguage::Python);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&SourceLanguage::Cpp).unwrap();
        assert_eq!(json, "\"cpp\"");
        let lang: SourceLanguage = serde_json::from_str("\"javascript\"").unwrap();
        assert_eq!(lang, SourceLanguage::JavaScript);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(SourceLanguage::Python.display_name(), "Python");
        assert_eq!(SourceLanguage::Unknown.display_name(), "Unknown");
    }
}
