//! Structural facts extracted from a snippet.

use serde::{Deserialize, Serialize};

/// Inventory of a snippet's functions, classes, imports and size.
///
/// Produced once per analysis and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralFacts {
    /// Function signatures as `name(param, param)`, in source order.
    pub functions: Vec<String>,
    /// Class names, in source order.
    pub classes: Vec<String>,
    /// Imported module identifiers, in source order.
    pub imports: Vec<String>,
    /// Sum over all functions of `1 + branch constructs in the body`.
    pub complexity: u32,
    /// Number of newline-delimited segments in the source.
    pub lines: usize,
}

impl StructuralFacts {
    /// Facts with every collection empty and zero counts.
    ///
    /// This is what a failed exact parse reports.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Facts carrying only the line count, used when no parser is available.
    pub fn line_count_only(source: &str) -> Self {
        Self {
            lines: count_lines(source),
            ..Self::default()
        }
    }

    /// Whether no functions, classes or imports were found.
    pub fn is_bare(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty() && self.imports.is_empty()
    }
}

/// Count newline-delimited segments (`source.split('\n')`, no trimming).
///
/// An empty string is one segment; a trailing newline adds an empty segment.
pub fn count_lines(source: &str) -> usize {
    source.split('\n').count()
}

/// Format a function signature as `name(a, b)`.
pub fn format_signature(name: &str, params: &[String]) -> String {
    format!("{}({})", name, params.join(", "))
}
