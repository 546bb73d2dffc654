use crate::pipeline::types::{Cycle, StatisticsSummary};
use indexmap::IndexMap;

/// Summarizes the duration distribution of `cycles`.
///
/// Consistency is `100 - stddev / mean * 100` clamped into `[0, 100]`, so identical durations
/// score 100. An empty list gives an all-zero summary with no average similarity.
pub fn calculate_statistics(cycles: &[Cycle]) -> StatisticsSummary {
    if cycles.is_empty() {
        return StatisticsSummary::default();
    }

    let count = cycles.len() as f64;
    let durations = cycles.iter().map(|cycle| cycle.duration);
    let total: f64 = durations.clone().sum();
    let avg_duration = total / count;
    let min_duration = durations.clone().fold(f64::INFINITY, f64::min);
    let max_duration = durations.clone().fold(f64::NEG_INFINITY, f64::max);

    let variance = durations
        .map(|duration| (duration - avg_duration).powi(2))
        .sum::<f64>()
        / count;
    let standard_deviation = variance.sqrt();

    let consistency = if avg_duration > 0.0 {
        (100.0 - standard_deviation / avg_duration * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    let scores: Vec<f64> = cycles
        .iter()
        .filter_map(|cycle| cycle.similarity_score)
        .collect();
    let avg_similarity = if scores.is_empty() {
        None
    } else {
        Some((scores.iter().sum::<f64>() / scores.len() as f64).round())
    };

    let mut action_breakdown: IndexMap<String, f64> = IndexMap::new();
    for run in cycles.iter().flat_map(|cycle| &cycle.actions) {
        *action_breakdown.entry(run.action.clone()).or_insert(0.0) += run.duration;
    }

    tracing::debug!(
        "Statistics over {} cycles: mean {:.2}s, stddev {:.2}s, consistency {:.1}",
        cycles.len(),
        avg_duration,
        standard_deviation,
        consistency
    );

    StatisticsSummary {
        total_cycles: cycles.len(),
        avg_duration,
        min_duration,
        max_duration,
        consistency,
        standard_deviation,
        avg_similarity,
        action_breakdown,
    }
}
