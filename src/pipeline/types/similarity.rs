use serde::{Deserialize, Serialize};

/// Scores at or above this value count as a consistent cycle.
pub const CONSISTENCY_SCORE: f64 = 80.0;

/// How far a candidate drifted from the baseline. A dimension that could not be compared is
/// `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Deviations {
    /// Absolute duration difference in seconds.
    pub duration_diff: Option<f64>,
    /// 100 minus the pose-trajectory score.
    pub pose_deviation: Option<f64>,
    /// 100 minus the action-sequence score.
    pub action_deviation: Option<f64>,
    /// Absolute difference of average motion intensity.
    pub motion_diff: Option<f64>,
}

impl Deviations {
    pub fn is_empty(&self) -> bool {
        self.duration_diff.is_none()
            && self.pose_deviation.is_none()
            && self.action_deviation.is_none()
            && self.motion_diff.is_none()
    }
}

/// Individual similarity sub-scores, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SubScores {
    pub duration: Option<f64>,
    pub pose: Option<f64>,
    pub action: Option<f64>,
    pub motion: Option<f64>,
}

impl SubScores {
    pub fn computed(&self) -> impl Iterator<Item = f64> {
        [self.duration, self.pose, self.action, self.motion]
            .into_iter()
            .flatten()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub score: f64,
    pub deviations: Deviations,
    pub components: SubScores,
    pub is_consistent: bool,
}

impl SimilarityResult {
    /// Result for a comparison with a missing side.
    pub fn zero() -> Self {
        Self {
            score: 0.0,
            deviations: Deviations::default(),
            components: SubScores::default(),
            is_consistent: false,
        }
    }

    pub(crate) fn from_parts(components: SubScores, deviations: Deviations) -> Self {
        let (sum, count) = components
            .computed()
            .fold((0.0, 0usize), |(sum, count), score| (sum + score, count + 1));
        let score = if count == 0 {
            0.0
        } else {
            (sum / count as f64).clamp(0.0, 100.0)
        };
        Self {
            score,
            deviations,
            components,
            is_consistent: score >= CONSISTENCY_SCORE,
        }
    }
}
