//! Core types for scan results.

use serde::{Deserialize, Serialize};

/// Severity of a security finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
}

impl Severity {
    /// `High` when the category name mentions "injection", else `Medium`.
    pub fn for_category(category: IssueCategory) -> Self {
        if category.as_str().to_lowercase().contains("injection") {
            Severity::High
        } else {
            Severity::Medium
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::High => write!(f, "high"),
            Severity::Medium => write!(f, "medium"),
        }
    }
}

/// Security issue categories, in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueCategory {
    #[serde(rename = "SQL Injection")]
    SqlInjection,
    #[serde(rename = "XSS Vulnerability")]
    XssVulnerability,
    #[serde(rename = "Hardcoded Credentials")]
    HardcodedCredentials,
    #[serde(rename = "Unsafe File Operations")]
    UnsafeFileOperations,
}

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::SqlInjection => "SQL Injection",
            IssueCategory::XssVulnerability => "XSS Vulnerability",
            IssueCategory::HardcodedCredentials => "Hardcoded Credentials",
            IssueCategory::UnsafeFileOperations => "Unsafe File Operations",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SQL Injection" => Some(IssueCategory::SqlInjection),
            "XSS Vulnerability" => Some(IssueCategory::XssVulnerability),
            "Hardcoded Credentials" => Some(IssueCategory::HardcodedCredentials),
            "Unsafe File Operations" => Some(IssueCategory::UnsafeFileOperations),
            _ => None,
        }
    }
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One flagged occurrence of a security pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub category: IssueCategory,
    /// Line number (1-indexed).
    pub line: usize,
    /// The offending line, trimmed.
    pub code: String,
    pub severity: Severity,
}

/// Advisory message drawn from the performance catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerformanceSuggestion(pub String);

impl PerformanceSuggestion {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PerformanceSuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_from_category_name() {
        assert_eq!(Severity::for_category(IssueCategory::SqlInjection), Severity::High);
        assert_eq!(
            Severity::for_category(IssueCategory::HardcodedCredentials),
            Severity::Medium
        );
        assert_eq!(
            Severity::for_category(IssueCategory::XssVulnerability),
            Severity::Medium
        );
    }

    #[test]
    fn test_finding_serializes_with_type_key() {
        let finding = Finding {
            category: IssueCategory::SqlInjection,
            line: 3,
            code: "db.execute(q)".to_string(),
            severity: Severity::High,
        };
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["type"], "SQL Injection");
        assert_eq!(json["severity"], "high");
        assert_eq!(json["line"], 3);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(
            IssueCategory::parse("XSS Vulnerability"),
            Some(IssueCategory::XssVulnerability)
        );
        assert_eq!(IssueCategory::parse("nope"), None);
    }
}
