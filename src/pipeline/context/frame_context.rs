use crate::common::PoseFrame;
use crate::pipeline::context::metrics::FrameMetrics;
use crate::pipeline::context::state::{Detected, Pending, ProcessingState};
use crate::pipeline::types::{ActionClassification, FeatureSet, FrameRecord};
use std::time::{Duration, Instant};

// FrameContext with compile-time state tracking via the state marker
pub struct FrameContext<S> {
    frame_number: usize,
    time: f64,
    metrics: FrameMetrics,
    processing_start: Instant,
    state: S,
}

impl<S: ProcessingState> FrameContext<S> {
    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }

    pub fn elapsed(&self) -> Duration {
        self.processing_start.elapsed()
    }

    pub fn state_name(&self) -> &'static str {
        S::state_name()
    }
}

impl FrameContext<Pending> {
    pub fn new(frame_number: usize, time: f64) -> Self {
        Self {
            frame_number,
            time,
            metrics: FrameMetrics::new(),
            processing_start: Instant::now(),
            state: Pending,
        }
    }

    pub fn into_detected(mut self, pose: Option<PoseFrame>) -> FrameContext<Detected> {
        self.metrics.record_detection_duration(self.elapsed());
        FrameContext::<Detected> {
            frame_number: self.frame_number,
            time: self.time,
            metrics: self.metrics,
            processing_start: self.processing_start,
            state: Detected { pose },
        }
    }
}

impl FrameContext<Detected> {
    pub fn pose(&self) -> Option<&PoseFrame> {
        self.state.pose.as_ref()
    }

    /// Seals the frame. A frame without a pose becomes a "No Person Detected" record whatever
    /// the other arguments say.
    pub fn into_record(
        mut self,
        features: Option<FeatureSet>,
        classification: ActionClassification,
        motion_intensity: f64,
    ) -> (FrameRecord, FrameMetrics) {
        let detection = self.metrics.detection_duration().unwrap_or_default();
        let total = self.elapsed();
        self.metrics
            .record_analysis_duration(total.saturating_sub(detection));
        self.metrics.record_total_duration(total);

        let record = match self.state.pose {
            Some(pose) => FrameRecord::new(
                self.frame_number,
                self.time,
                Some(pose),
                features,
                classification,
                motion_intensity,
            ),
            None => FrameRecord::no_person(self.frame_number, self.time),
        };
        (record, self.metrics)
    }
}
