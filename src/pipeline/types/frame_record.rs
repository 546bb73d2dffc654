use super::classification::ActionClassification;
use super::feature_set::FeatureSet;
use crate::common::PoseFrame;
use serde::{Deserialize, Serialize};

/// One sampled instant of the video. Immutable once built.
///
/// Decoded records go through [`FrameRecord::new`]: confidence is clamped into `[0, 1]` and
/// negative motion becomes 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FrameRecordFields")]
pub struct FrameRecord {
    frame_number: usize,
    time: f64,
    pose: Option<PoseFrame>,
    features: Option<FeatureSet>,
    action: String,
    action_confidence: f64,
    motion_intensity: f64,
}

#[derive(Deserialize)]
struct FrameRecordFields {
    frame_number: usize,
    time: f64,
    pose: Option<PoseFrame>,
    features: Option<FeatureSet>,
    action: String,
    action_confidence: f64,
    motion_intensity: f64,
}

impl From<FrameRecordFields> for FrameRecord {
    fn from(fields: FrameRecordFields) -> Self {
        Self::new(
            fields.frame_number,
            fields.time,
            fields.pose,
            fields.features,
            ActionClassification::new(fields.action, fields.action_confidence),
            fields.motion_intensity,
        )
    }
}

impl FrameRecord {
    pub fn new(
        frame_number: usize,
        time: f64,
        pose: Option<PoseFrame>,
        features: Option<FeatureSet>,
        classification: ActionClassification,
        motion_intensity: f64,
    ) -> Self {
        Self {
            frame_number,
            time,
            pose,
            features,
            action: classification.label,
            action_confidence: classification.confidence,
            motion_intensity: motion_intensity.max(0.0),
        }
    }

    /// A frame where the pose source reported nobody. Not an error.
    pub fn no_person(frame_number: usize, time: f64) -> Self {
        Self::new(
            frame_number,
            time,
            None,
            None,
            ActionClassification::no_person(),
            0.0,
        )
    }

    pub fn frame_number(&self) -> usize {
        self.frame_number
    }

    /// Seconds from the start of the video.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn pose(&self) -> Option<&PoseFrame> {
        self.pose.as_ref()
    }

    pub fn features(&self) -> Option<&FeatureSet> {
        self.features.as_ref()
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn action_confidence(&self) -> f64 {
        self.action_confidence
    }

    pub fn motion_intensity(&self) -> f64 {
        self.motion_intensity
    }

    pub fn has_person(&self) -> bool {
        self.pose.is_some()
    }
}
