//! Line-by-line security pattern scan.

use super::rules::SECURITY_RULES;
use super::{Finding, Severity};

/// Scan source for security-risk patterns.
///
/// Every (line, category, trigger) combination that matches yields its own
/// finding: a line hitting two triggers of one category is reported twice.
/// Order is line order, then category-table order, then trigger order.
pub fn scan_security(source: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (idx, line) in source.split('\n').enumerate() {
        let line_number = idx + 1;

        for rule in SECURITY_RULES.iter() {
            for trigger in &rule.triggers {
                if trigger.is_match(line) {
                    findings.push(Finding {
                        category: rule.category,
                        line: line_number,
                        code: line.trim().to_string(),
                        severity: Severity::for_category(rule.category),
                    });
                }
            }
        }
    }

    if !findings.is_empty() {
        tracing::debug!(count = findings.len(), "security scan flagged lines");
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::IssueCategory;

    #[test]
    fn test_hardcoded_password() {
        let findings = scan_security(r#"password = "abc123""#);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, IssueCategory::HardcodedCredentials);
        assert_eq!(findings[0].severity, Severity::Medium);
        assert_eq!(findings[0].line, 1);
        assert_eq!(findings[0].code, r#"password = "abc123""#);
    }

    #[test]
    fn test_sql_injection_is_high() {
        let findings =
            scan_security(r#"cursor.execute("SELECT * FROM t WHERE x=%s" % val)"#);
        assert!(findings
            .iter()
            .any(|f| f.category == IssueCategory::SqlInjection && f.severity == Severity::High));
    }

    #[test]
    fn test_line_numbers_and_trimming() {
        let source = "x = 1\n\n    result = eval(user_input)  \n";
        let findings = scan_security(source);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 3);
        assert_eq!(findings[0].code, "result = eval(user_input)");
        assert_eq!(findings[0].category, IssueCategory::UnsafeFileOperations);
    }

    #[test]
    fn test_case_insensitive() {
        let findings = scan_security(r#"API_KEY = "sk-live-123""#);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, IssueCategory::HardcodedCredentials);
    }

    #[test]
    fn test_no_dedup_across_triggers() {
        // Hits both exec( and eval( triggers of the same category.
        let findings = scan_security("exec(eval(data))");
        assert_eq!(findings.len(), 2);
        assert!(findings
            .iter()
            .all(|f| f.category == IssueCategory::UnsafeFileOperations));
    }

    #[test]
    fn test_multiple_categories_on_one_line_follow_table_order() {
        let findings = scan_security(r#"el.innerHTML = "<b>" + eval(x)"#);
        let categories: Vec<_> = findings.iter().map(|f| f.category).collect();
        assert_eq!(
            categories,
            vec![
                IssueCategory::XssVulnerability,
                IssueCategory::UnsafeFileOperations,
            ]
        );
    }

    #[test]
    fn test_clean_and_malformed_input() {
        assert!(scan_security("").is_empty());
        assert!(scan_security("def f():\n    return 1\n").is_empty());
        assert!(scan_security("\u{0}\u{fffd}((((\n\"'").is_empty());
    }
}
