//! Session summary statistics.
//!
//! Pure reductions over a finished session's results. All rates are whole
//! percentages and are exactly 0 when there are no results.

use serde::{Deserialize, Serialize};

use crate::model::QuizResult;

/// Aggregate statistics for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Number of scored questions.
    pub total: usize,
    /// Number of results marked correct.
    pub correct_count: usize,
    /// Rounded mean score (0..=100).
    pub average_score: u32,
    /// Rounded percentage of correct results (0..=100).
    pub accuracy_rate: u32,
}

impl SessionSummary {
    /// Compute the summary for a set of results.
    pub fn from_results(results: &[QuizResult]) -> Self {
        let total = results.len();
        if total == 0 {
            return Self::default();
        }

        let correct_count = results.iter().filter(|r| r.correct).count();
        let score_sum: u64 = results.iter().map(|r| r.score as u64).sum();

        Self {
            total,
            correct_count,
            average_score: (score_sum as f64 / total as f64).round() as u32,
            accuracy_rate: (correct_count as f64 / total as f64 * 100.0).round() as u32,
        }
    }
}
