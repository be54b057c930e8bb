//! Whole-source performance pattern scan.

use super::rules::PERFORMANCE_RULES;
use super::PerformanceSuggestion;

/// Scan source for performance concerns.
///
/// Each catalog entry is tested once against the full text, so an advisory
/// appears at most once regardless of how often its pattern occurs.
pub fn scan_performance(source: &str) -> Vec<PerformanceSuggestion> {
    PERFORMANCE_RULES
        .iter()
        .filter(|rule| rule.trigger.is_match(source))
        .map(|rule| PerformanceSuggestion(rule.message.to_string()))
        .collect()
}
