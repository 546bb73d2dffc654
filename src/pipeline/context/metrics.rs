use std::time::Duration;

/// Timings collected while sampling one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameMetrics {
    detection_duration: Option<Duration>,
    analysis_duration: Option<Duration>,
    total_duration: Option<Duration>,
}

impl FrameMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seek plus pose detection.
    pub fn record_detection_duration(&mut self, duration: Duration) {
        self.detection_duration = Some(duration);
    }

    /// Feature extraction, classification and motion.
    pub fn record_analysis_duration(&mut self, duration: Duration) {
        self.analysis_duration = Some(duration);
    }

    pub fn record_total_duration(&mut self, duration: Duration) {
        self.total_duration = Some(duration);
    }

    pub fn detection_duration(&self) -> Option<Duration> {
        self.detection_duration
    }

    pub fn analysis_duration(&self) -> Option<Duration> {
        self.analysis_duration
    }

    pub fn total_duration(&self) -> Option<Duration> {
        self.total_duration
    }
}
