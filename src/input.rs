//! Input gatekeeping and basic size metrics.
//!
//! These run before a snippet reaches the engine; the engine itself accepts
//! any text.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("code cannot be empty")]
    Empty,
    #[error("code too large: maximum {max} characters allowed, got {actual}")]
    TooLarge { max: usize, actual: usize },
    #[error("code contains potentially dangerous operations ({0})")]
    Dangerous(&'static str),
}

lazy_static! {
    /// Operations an untrusted snippet may not contain, with a short label.
    static ref DANGEROUS_PATTERNS: Vec<(Regex, &'static str)> = [
        (r#"__import__\s*\(\s*['"]os['"]"#, "__import__('os')"),
        (r"exec\s*\(", "exec()"),
        (r"eval\s*\(", "eval()"),
        (r"subprocess\.", "subprocess"),
        (r"os\.system", "os.system"),
        (r#"open\s*\(\s*['"][^'"]*['"],\s*['"]w"#, "open for write"),
    ]
    .iter()
    .map(|(p, label)| (Regex::new(&format!("(?i){}", p)).unwrap(), *label))
    .collect();
}

/// Validate a snippet before analysis.
pub fn validate_code_input(code: &str, max_length: usize) -> Result<(), InputError> {
    if code.trim().is_empty() {
        return Err(InputError::Empty);
    }

    let actual = code.chars().count();
    if actual > max_length {
        return Err(InputError::TooLarge {
            max: max_length,
            actual,
        });
    }

    if let Some((_, label)) = DANGEROUS_PATTERNS.iter().find(|(re, _)| re.is_match(code)) {
        return Err(InputError::Dangerous(label));
    }

    Ok(())
}

/// Line-level size metrics for a snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeMetrics {
    pub total_lines: usize,
    pub non_empty_lines: usize,
    /// Lines whose trimmed form starts with `#`, `//` or `/*`.
    pub comment_lines: usize,
    /// Mean line length in characters, rounded down.
    pub avg_line_length: usize,
    pub max_line_length: usize,
    /// Comment lines as a percentage of non-empty lines.
    pub comment_ratio: f64,
}

impl CodeMetrics {
    pub fn from_source(source: &str) -> Self {
        let lines: Vec<&str> = source.split('\n').collect();
        let lengths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();

        let total_lines = lines.len();
        let non_empty_lines = lines.iter().filter(|l| !l.trim().is_empty()).count();
        let comment_lines = lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| l.starts_with('#') || l.starts_with("//") || l.starts_with("/*"))
            .count();

        Self {
            total_lines,
            non_empty_lines,
            comment_lines,
            avg_line_length: lengths.iter().sum::<usize>() / total_lines.max(1),
            max_line_length: lengths.iter().copied().max().unwrap_or(0),
            comment_ratio: comment_lines as f64 / non_empty_lines.max(1) as f64 * 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_code_input("", 10), Err(InputError::Empty));
        assert_eq!(validate_code_input(" \n\t", 10), Err(InputError::Empty));
    }

    #[test]
    fn test_rejects_oversized_by_chars() {
        assert!(validate_code_input("ééé", 3).is_ok());
        assert_eq!(
            validate_code_input("abcd", 3),
            Err(InputError::TooLarge { max: 3, actual: 4 })
        );
    }

    #[test]
    fn test_rejects_dangerous_operations() {
        let cases = [
            "__import__( 'os' )",
            "EXEC (code)",
            "x = eval(s)",
            "import subprocess\nsubprocess.run(cmd)",
            "os.system('ls')",
            "f = open('out.txt', 'w')",
        ];
        for case in cases {
            assert!(
                matches!(validate_code_input(case, 1000), Err(InputError::Dangerous(_))),
                "expected rejection: {}",
                case
            );
        }
    }

    #[test]
    fn test_accepts_ordinary_code() {
        assert!(validate_code_input("def f(x):\n    return open('in.txt')\n", 1000).is_ok());
        assert!(validate_code_input("evaluate(x)", 1000).is_ok());
    }

    #[test]
    fn test_metrics() {
        let m = CodeMetrics::from_source("# head\nx = 1\n\n  // note\nlonger_line = 22");
        assert_eq!(m.total_lines, 5);
        assert_eq!(m.non_empty_lines, 4);
        assert_eq!(m.comment_lines, 2);
        assert_eq!(m.max_line_length, 16);
        assert_eq!(m.avg_line_length, (6 + 5 + 0 + 9 + 16) / 5);
        assert_eq!(m.comment_ratio, 50.0);
    }

    #[test]
    fn test_metrics_empty_source() {
        let m = CodeMetrics::from_source("");
        assert_eq!(m.total_lines, 1);
        assert_eq!(m.non_empty_lines, 0);
        assert_eq!(m.comment_ratio, 0.0);
    }
}
