use super::angles::joint_angle;
use crate::common::{Keypoint, KeypointName, PoseFrame};
use crate::pipeline::types::FeatureSet;

/// Derives per-frame geometry from one pose.
///
/// Pure: the same pose always gives the same features. Velocity needs the previous frame and
/// is filled by [`super::MotionTracker`] instead.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    min_score: f64,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self { min_score: 0.0 }
    }

    /// Ignore keypoints whose score is not above `min_score`.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn extract(&self, pose: &PoseFrame) -> FeatureSet {
        FeatureSet {
            left_elbow_angle: self.angle(
                pose,
                KeypointName::LeftShoulder,
                KeypointName::LeftElbow,
                KeypointName::LeftWrist,
            ),
            right_elbow_angle: self.angle(
                pose,
                KeypointName::RightShoulder,
                KeypointName::RightElbow,
                KeypointName::RightWrist,
            ),
            left_shoulder_angle: self.angle(
                pose,
                KeypointName::LeftHip,
                KeypointName::LeftShoulder,
                KeypointName::LeftElbow,
            ),
            right_shoulder_angle: self.angle(
                pose,
                KeypointName::RightHip,
                KeypointName::RightShoulder,
                KeypointName::RightElbow,
            ),
            wrist_distance: self.distance(pose, KeypointName::LeftWrist, KeypointName::RightWrist),
            shoulder_width: self.distance(
                pose,
                KeypointName::LeftShoulder,
                KeypointName::RightShoulder,
            ),
            velocity: Vec::new(),
        }
    }

    fn keypoint<'a>(&self, pose: &'a PoseFrame, name: KeypointName) -> Option<&'a Keypoint> {
        pose.get(name)
            .filter(|keypoint| self.min_score <= 0.0 || keypoint.is_confident(self.min_score))
    }

    fn angle(&self, pose: &PoseFrame, a: KeypointName, b: KeypointName, c: KeypointName) -> f64 {
        match (
            self.keypoint(pose, a),
            self.keypoint(pose, b),
            self.keypoint(pose, c),
        ) {
            (Some(a), Some(b), Some(c)) => joint_angle((a.x, a.y), (b.x, b.y), (c.x, c.y)),
            _ => 0.0,
        }
    }

    fn distance(&self, pose: &PoseFrame, a: KeypointName, b: KeypointName) -> f64 {
        match (self.keypoint(pose, a), self.keypoint(pose, b)) {
            (Some(a), Some(b)) => a.distance_to(b),
            _ => 0.0,
        }
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}
