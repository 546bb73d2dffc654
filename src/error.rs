use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing input: {0}")]
    MissingInput(String),
    #[error("Frame times are not monotonic at index {index}: {previous}s followed by {current}s")]
    NonMonotonicFrames {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
}

// Pose Source Error Type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoseSourceError {
    #[error("The pose source is unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to seek to {timestamp}s: {reason}")]
    SeekFailed { timestamp: f64, reason: String },
    #[error("Pose detection failed: {0}")]
    DetectFailed(String),
}

impl PoseSourceError {
    /// Unavailability ends the whole pass, everything else only costs one frame.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PoseSourceError::Unavailable(_))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("Classification failed: {0}")]
    ClassificationFailed(String),
}
