use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Distribution of cycle durations over a set of cycles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub total_cycles: usize,
    pub avg_duration: f64,
    pub min_duration: f64,
    pub max_duration: f64,
    /// `100 - coefficient of variation * 100`, clamped into `[0, 100]`.
    pub consistency: f64,
    /// Population standard deviation of durations.
    pub standard_deviation: f64,
    /// Rounded mean of the cycles that carry a similarity score.
    pub avg_similarity: Option<f64>,
    /// Seconds spent per action label, in first-seen order.
    pub action_breakdown: IndexMap<String, f64>,
}
