//! Quality scoring.
//!
//! Calculates a quality score (0-100) from structural facts and the source's
//! size and comment density. Higher is better.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::{count_lines, StructuralFacts};

/// Penalty thresholds and caps.
pub mod penalties {
    pub const MAX_SCORE: f64 = 100.0;
    /// Complexity above this starts costing one point per unit.
    pub const COMPLEXITY_THRESHOLD: u32 = 10;
    pub const MAX_COMPLEXITY_PENALTY: f64 = 20.0;
    /// Line count above this costs one point per `LINES_PER_POINT` lines.
    pub const LENGTH_THRESHOLD: usize = 100;
    pub const LINES_PER_POINT: f64 = 10.0;
    pub const MAX_LENGTH_PENALTY: f64 = 15.0;
    /// Comment markers per non-empty line below this costs a flat penalty.
    pub const MIN_COMMENT_RATIO: f64 = 0.1;
    pub const LOW_COMMENT_PENALTY: f64 = 10.0;
}

lazy_static! {
    static ref COMMENT_MARKER: Regex = Regex::new(r"#|//|/\*").unwrap();
}

/// The calculated quality score with its deductions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    /// Final score, clamped to [0, 100].
    pub score: f64,
    pub complexity_penalty: f64,
    pub length_penalty: f64,
    pub comment_penalty: f64,
    /// Comment markers per non-empty line.
    pub comment_ratio: f64,
}

impl QualityScore {
    /// Total points deducted before clamping.
    pub fn total_penalty(&self) -> f64 {
        self.complexity_penalty + self.length_penalty + self.comment_penalty
    }
}

/// Count `#`, `//` and `/*` occurrences (non-overlapping, left to right).
pub fn comment_marker_count(source: &str) -> usize {
    COMMENT_MARKER.find_iter(source).count()
}

/// Count lines whose trimmed form is non-empty, with a floor of 1.
pub fn non_empty_line_count(source: &str) -> usize {
    source
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .count()
        .max(1)
}

/// Calculate the quality score with its breakdown.
pub fn calculate(source: &str, facts: &StructuralFacts) -> QualityScore {
    use penalties::*;

    let complexity_penalty = if facts.complexity > COMPLEXITY_THRESHOLD {
        f64::from(facts.complexity - COMPLEXITY_THRESHOLD).min(MAX_COMPLEXITY_PENALTY)
    } else {
        0.0
    };

    let line_count = count_lines(source);
    let length_penalty = if line_count > LENGTH_THRESHOLD {
        ((line_count - LENGTH_THRESHOLD) as f64 / LINES_PER_POINT).min(MAX_LENGTH_PENALTY)
    } else {
        0.0
    };

    let comment_ratio = comment_marker_count(source) as f64 / non_empty_line_count(source) as f64;
    let comment_penalty = if comment_ratio < MIN_COMMENT_RATIO {
        LOW_COMMENT_PENALTY
    } else {
        0.0
    };

    let score = (MAX_SCORE - complexity_penalty - length_penalty - comment_penalty).max(0.0);

    QualityScore {
        score,
        complexity_penalty,
        length_penalty,
        comment_penalty,
        comment_ratio,
    }
}

/// Quality score in [0, 100].
pub fn score(source: &str, facts: &StructuralFacts) -> f64 {
    calculate(source, facts).score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts_with_complexity(complexity: u32) -> StructuralFacts {
        StructuralFacts {
            complexity,
            ..StructuralFacts::default()
        }
    }

    #[test]
    fn test_long_commented_source() {
        // 150 lines, half of them comments.
        let source = (0..150)
            .map(|i| if i % 2 == 0 { "# note" } else { "x = 1" })
            .collect::<Vec<_>>()
            .join("\n");

        let result = calculate(&source, &facts_with_complexity(5));
        assert_eq!(result.comment_ratio, 0.5);
        assert_eq!(result.length_penalty, 5.0);
        assert_eq!(result.score, 95.0);
    }

    #[test]
    fn test_complexity_penalty_capped() {
        let source = "# documented\nx = 1";
        assert_eq!(score(source, &facts_with_complexity(10)), 100.0);
        assert_eq!(score(source, &facts_with_complexity(14)), 96.0);
        assert_eq!(score(source, &facts_with_complexity(500)), 80.0);
    }

    #[test]
    fn test_length_penalty_is_fractional_and_capped() {
        let commented = |n: usize| vec!["# c"; n].join("\n");
        assert_eq!(calculate(&commented(105), &StructuralFacts::default()).length_penalty, 0.5);
        assert_eq!(calculate(&commented(1000), &StructuralFacts::default()).length_penalty, 15.0);
    }

    #[test]
    fn test_uncommented_source_penalized() {
        let result = calculate("x = 1\ny = 2\n", &StructuralFacts::default());
        assert_eq!(result.comment_penalty, 10.0);
        assert_eq!(result.score, 90.0);
    }

    #[test]
    fn test_marker_counting() {
        assert_eq!(comment_marker_count("// a /* b */ # c"), 3);
        assert_eq!(comment_marker_count("///"), 1);
        assert_eq!(comment_marker_count("##"), 2);
    }

    #[test]
    fn test_empty_source_does_not_divide_by_zero() {
        let result = calculate("", &StructuralFacts::default());
        assert_eq!(result.comment_ratio, 0.0);
        assert_eq!(result.score, 90.0);
    }

    #[test]
    fn test_score_never_negative() {
        let source = vec!["x"; 2000].join("\n");
        let s = score(&source, &facts_with_complexity(1000));
        assert!((0.0..=100.0).contains(&s));
        assert_eq!(s, 55.0);
    }
}
