//! Static rule tables for the security and performance scanners.

use lazy_static::lazy_static;
use regex::Regex;

use super::IssueCategory;

/// One issue category and the triggers registered under it.
pub struct SecurityRule {
    pub category: IssueCategory,
    pub triggers: Vec<Regex>,
}

/// One performance advisory and the multi-line pattern that raises it.
pub struct PerformanceRule {
    pub message: &'static str,
    pub trigger: Regex,
}

fn security_rule(category: IssueCategory, patterns: &[&str]) -> SecurityRule {
    SecurityRule {
        category,
        triggers: patterns
            .iter()
            .map(|p| Regex::new(&format!("(?i){}", p)).unwrap())
            .collect(),
    }
}

fn performance_rule(message: &'static str, pattern: &str) -> PerformanceRule {
    PerformanceRule {
        message,
        trigger: Regex::new(&format!("(?m){}", pattern)).unwrap(),
    }
}

lazy_static! {
    /// Security categories in scan order. Matching is case-insensitive.
    pub static ref SECURITY_RULES: Vec<SecurityRule> = vec![
        security_rule(IssueCategory::SqlInjection, &[
            r#"execute\s*\(\s*["'].*%.*["']"#,
            r#"query\s*\(\s*["'].*\+.*["']"#,
        ]),
        security_rule(IssueCategory::XssVulnerability, &[
            r"innerHTML\s*=\s*.*\+",
            r"document\.write\s*\(",
        ]),
        security_rule(IssueCategory::HardcodedCredentials, &[
            r#"password\s*=\s*["'][^"']+["']"#,
            r#"api_key\s*=\s*["'][^"']+["']"#,
            r#"secret\s*=\s*["'][^"']+["']"#,
        ]),
        security_rule(IssueCategory::UnsafeFileOperations, &[
            r"open\s*\(\s*.*\+",
            r"exec\s*\(",
            r"eval\s*\(",
        ]),
    ];

    /// Performance advisories in report order. `^`/`$` anchor at line
    /// boundaries; `.` does not cross newlines.
    pub static ref PERFORMANCE_RULES: Vec<PerformanceRule> = vec![
        performance_rule(
            "Nested loops detected - consider optimization",
            r"for.*:\s*\n.*for.*:",
        ),
        performance_rule(
            "Global variables used - consider local scope",
            r"^global\s+\w+",
        ),
        performance_rule(
            "Inefficient string concatenation",
            r#"\w+\s*\+=\s*["']"#,
        ),
        performance_rule(
            "Repeated function calls in loop",
            r"for.*:\s*\n.*\w+\(.*\)",
        ),
        performance_rule(
            "Large list comprehension - consider generator",
            r"\[.*for.*in.*for.*in.*\]",
        ),
    ];
}
