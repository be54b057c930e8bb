//! Rule-based security and performance scanners.

mod performance;
mod rules;
mod security;
mod types;

pub use performance::scan_performance;
pub use rules::{PerformanceRule, SecurityRule, PERFORMANCE_RULES, SECURITY_RULES};
pub use security::scan_security;
pub use types::{Finding, IssueCategory, PerformanceSuggestion, Severity};
