use crate::common::KeypointName;
use serde::{Deserialize, Serialize};

/// Frame-to-frame velocity of one landmark, in normalized units per second scaled by 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeypointVelocity {
    pub name: KeypointName,
    pub vx: f64,
    pub vy: f64,
}

impl KeypointVelocity {
    pub fn magnitude(&self) -> f64 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }
}

/// Geometry derived from one pose.
///
/// Angles are in degrees (0 - 180), distances in normalized image units. A value is 0 when one
/// of the landmarks it needs is missing. `velocity` is left empty by the extractor; the frame
/// sampler fills it because it needs the previous frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureSet {
    pub left_elbow_angle: f64,
    pub right_elbow_angle: f64,
    pub left_shoulder_angle: f64,
    pub right_shoulder_angle: f64,
    pub wrist_distance: f64,
    pub shoulder_width: f64,
    pub velocity: Vec<KeypointVelocity>,
}

impl FeatureSet {
    /// Summed velocity magnitude over every tracked landmark.
    pub fn motion_intensity(&self) -> f64 {
        self.velocity.iter().map(KeypointVelocity::magnitude).sum()
    }
}
