use super::edit_distance::levenshtein;
use crate::common::PoseFrame;
use crate::pipeline::types::{Cycle, Deviations, FrameRecord, SimilarityResult, SubScores};

/// Scores how closely a candidate cycle follows a baseline cycle.
///
/// Four dimensions are compared: duration, pose trajectory, action sequence and average
/// motion. A dimension whose inputs are missing is skipped and the final score averages the
/// rest.
#[derive(Debug, Clone)]
pub struct CycleComparator {
    sample_count: usize,
    min_keypoint_score: f64,
}

impl CycleComparator {
    pub fn new() -> Self {
        Self {
            sample_count: 20,
            min_keypoint_score: 0.3,
        }
    }

    /// Maximum number of frame pairs sampled along the pose trajectories.
    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count.max(1);
        self
    }

    /// Keypoints at or below this score are left out of pose distances.
    pub fn with_min_keypoint_score(mut self, min_keypoint_score: f64) -> Self {
        self.min_keypoint_score = min_keypoint_score;
        self
    }

    pub fn compare(&self, baseline: Option<&Cycle>, candidate: Option<&Cycle>) -> SimilarityResult {
        let (Some(baseline), Some(candidate)) = (baseline, candidate) else {
            return SimilarityResult::zero();
        };

        let mut components = SubScores::default();
        let mut deviations = Deviations::default();

        if baseline.duration > 0.0 {
            let diff = (candidate.duration - baseline.duration).abs();
            components.duration = Some(relative_score(diff, baseline.duration));
            deviations.duration_diff = Some(diff);
        }

        if let Some(pose) = self.pose_score(&baseline.frames, &candidate.frames) {
            components.pose = Some(pose);
            deviations.pose_deviation = Some(100.0 - pose);
        }

        if let Some(action) = action_score(&baseline.action_labels(), &candidate.action_labels()) {
            components.action = Some(action);
            deviations.action_deviation = Some(100.0 - action);
        }

        if baseline.avg_motion > 0.0 {
            let diff = (candidate.avg_motion - baseline.avg_motion).abs();
            components.motion = Some(relative_score(diff, baseline.avg_motion));
            deviations.motion_diff = Some(diff);
        }

        let result = SimilarityResult::from_parts(components, deviations);
        tracing::debug!(
            "Cycle {} vs baseline {}: score {:.1} ({:?})",
            candidate.cycle_number,
            baseline.cycle_number,
            result.score,
            result.components
        );
        result
    }

    /// Compares evenly spaced frames of both trajectories pairwise.
    ///
    /// Each list gets its own stride so that both yield the same number of samples. Pairs
    /// where either frame has no pose are skipped; `None` when no pair could be compared.
    fn pose_score(&self, baseline: &[FrameRecord], candidate: &[FrameRecord]) -> Option<f64> {
        if !baseline.iter().any(FrameRecord::has_person)
            || !candidate.iter().any(FrameRecord::has_person)
        {
            return None;
        }

        let samples = self
            .sample_count
            .min(baseline.len())
            .min(candidate.len());
        let baseline_stride = baseline.len() as f64 / samples as f64;
        let candidate_stride = candidate.len() as f64 / samples as f64;

        let (total, compared) = (0..samples)
            .filter_map(|i| {
                let a = &baseline[sample_index(i, baseline_stride, baseline.len())];
                let b = &candidate[sample_index(i, candidate_stride, candidate.len())];
                match (a.pose(), b.pose()) {
                    (Some(a), Some(b)) => Some(self.pose_similarity(a, b)),
                    _ => None,
                }
            })
            .fold((0.0, 0usize), |(sum, count), score| (sum + score, count + 1));

        if compared == 0 {
            return None;
        }
        Some((total / compared as f64).clamp(0.0, 100.0))
    }

    /// 100 minus the mean keypoint distance (x100) over landmarks confidently seen in both.
    fn pose_similarity(&self, a: &PoseFrame, b: &PoseFrame) -> f64 {
        let (sum, count) = a
            .keypoints()
            .iter()
            .filter(|keypoint| keypoint.is_confident(self.min_keypoint_score))
            .filter_map(|keypoint| {
                b.get(keypoint.name)
                    .filter(|other| other.is_confident(self.min_keypoint_score))
                    .map(|other| keypoint.distance_to(other))
            })
            .fold((0.0, 0usize), |(sum, count), distance| (sum + distance, count + 1));

        if count == 0 {
            return 0.0;
        }
        (100.0 - sum / count as f64 * 100.0).max(0.0)
    }
}

impl Default for CycleComparator {
    fn default() -> Self {
        Self::new()
    }
}

fn relative_score(diff: f64, reference: f64) -> f64 {
    (100.0 - diff / reference * 100.0).clamp(0.0, 100.0)
}

fn sample_index(i: usize, stride: f64, len: usize) -> usize {
    ((i as f64 * stride).floor() as usize).min(len - 1)
}

fn action_score(baseline: &[&str], candidate: &[&str]) -> Option<f64> {
    let max_len = baseline.len().max(candidate.len());
    if max_len == 0 {
        return None;
    }
    let distance = levenshtein(baseline, candidate);
    Some((100.0 - distance as f64 / max_len as f64 * 100.0).clamp(0.0, 100.0))
}
