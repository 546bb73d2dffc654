use serde::{Deserialize, Serialize};
use std::fmt;

/// Body landmarks tracked by the pose source.
///
/// The serialized form is the snake_case landmark name used by MoveNet / BlazePose style
/// detectors (`left_wrist`, `right_elbow`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeypointName {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl KeypointName {
    pub const ALL: [KeypointName; 17] = [
        KeypointName::Nose,
        KeypointName::LeftEye,
        KeypointName::RightEye,
        KeypointName::LeftEar,
        KeypointName::RightEar,
        KeypointName::LeftShoulder,
        KeypointName::RightShoulder,
        KeypointName::LeftElbow,
        KeypointName::RightElbow,
        KeypointName::LeftWrist,
        KeypointName::RightWrist,
        KeypointName::LeftHip,
        KeypointName::RightHip,
        KeypointName::LeftKnee,
        KeypointName::RightKnee,
        KeypointName::LeftAnkle,
        KeypointName::RightAnkle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KeypointName::Nose => "nose",
            KeypointName::LeftEye => "left_eye",
            KeypointName::RightEye => "right_eye",
            KeypointName::LeftEar => "left_ear",
            KeypointName::RightEar => "right_ear",
            KeypointName::LeftShoulder => "left_shoulder",
            KeypointName::RightShoulder => "right_shoulder",
            KeypointName::LeftElbow => "left_elbow",
            KeypointName::RightElbow => "right_elbow",
            KeypointName::LeftWrist => "left_wrist",
            KeypointName::RightWrist => "right_wrist",
            KeypointName::LeftHip => "left_hip",
            KeypointName::RightHip => "right_hip",
            KeypointName::LeftKnee => "left_knee",
            KeypointName::RightKnee => "right_knee",
            KeypointName::LeftAnkle => "left_ankle",
            KeypointName::RightAnkle => "right_ankle",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.as_str() == name)
    }
}

impl fmt::Display for KeypointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracked landmark in normalized image coordinates.
///
/// Deserialization goes through [`Keypoint::new`], so decoded values are clamped as well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "KeypointFields")]
pub struct Keypoint {
    pub name: KeypointName,
    /// Normalized X coordinate (0.0 - 1.0)
    pub x: f64,
    /// Normalized Y coordinate (0.0 - 1.0), growing downwards
    pub y: f64,
    /// Detection confidence (0.0 - 1.0)
    pub score: f64,
}

#[derive(Deserialize)]
struct KeypointFields {
    name: KeypointName,
    x: f64,
    y: f64,
    score: f64,
}

impl From<KeypointFields> for Keypoint {
    fn from(fields: KeypointFields) -> Self {
        Self::new(fields.name, fields.x, fields.y, fields.score)
    }
}

impl Keypoint {
    /// Coordinates and score are clamped into `[0, 1]`.
    pub fn new(name: KeypointName, x: f64, y: f64, score: f64) -> Self {
        Self {
            name,
            x: x.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
            score: score.clamp(0.0, 1.0),
        }
    }

    pub fn is_confident(&self, min_score: f64) -> bool {
        self.score > min_score
    }

    pub fn distance_to(&self, other: &Keypoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
