use crate::pipeline::context::FrameMetrics;
use crate::pipeline::types::FrameRecord;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Observer pattern for sampling progress and per-frame metrics
pub trait SamplingObserver: Send {
    /// Fraction of planned frames sampled so far, in `(0, 1]`.
    fn on_progress(&mut self, fraction: f64) {
        let _ = fraction;
    }

    fn on_frame_sampled(&mut self, record: &FrameRecord, metrics: &FrameMetrics) {
        let _ = (record, metrics);
    }
}

/// Any `FnMut(f64)` works as a progress callback.
impl<F> SamplingObserver for F
where
    F: FnMut(f64) + Send,
{
    fn on_progress(&mut self, fraction: f64) {
        self(fraction)
    }
}

/// Collects and notifies multiple sampling observers
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn SamplingObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observer(mut self, observer: Box<dyn SamplingObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn push(&mut self, observer: Box<dyn SamplingObserver>) {
        self.observers.push(observer);
    }

    pub fn notify_progress(&mut self, fraction: f64) {
        for observer in &mut self.observers {
            observer.on_progress(fraction);
        }
    }

    pub fn notify_frame_sampled(&mut self, record: &FrameRecord, metrics: &FrameMetrics) {
        for observer in &mut self.observers {
            observer.on_frame_sampled(record, metrics);
        }
    }
}

/// Performance monitoring observer
#[derive(Clone, Default)]
pub struct PerformanceMonitor {
    stats: Arc<Mutex<PerformanceStats>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceStats {
    pub frames_sampled: usize,
    pub frames_without_person: usize,
    pub last_progress: f64,

    // EWMA timing stats
    pub avg_detection_us: f64,
    pub avg_analysis_us: f64,
    pub avg_frame_us: f64,

    // Max timing stats for bottleneck detection
    pub max_detection_us: u64,
    pub max_analysis_us: u64,
    pub max_frame_us: u64,
}

impl PerformanceMonitor {
    const ALPHA: f64 = 0.1; // EWMA smoothing factor

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_stats(&self) -> PerformanceStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update_ewma(current: f64, new_value: u64, first: bool) -> f64 {
        if first {
            new_value as f64
        } else {
            current * (1.0 - Self::ALPHA) + new_value as f64 * Self::ALPHA
        }
    }

    fn micros(duration: Option<Duration>) -> u64 {
        duration.map_or(0, |d| d.as_micros() as u64)
    }
}

impl SamplingObserver for PerformanceMonitor {
    fn on_progress(&mut self, fraction: f64) {
        let mut stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        stats.last_progress = fraction;
    }

    fn on_frame_sampled(&mut self, record: &FrameRecord, metrics: &FrameMetrics) {
        let mut stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        let first = stats.frames_sampled == 0;
        stats.frames_sampled += 1;
        if !record.has_person() {
            stats.frames_without_person += 1;
        }

        let detection = Self::micros(metrics.detection_duration());
        let analysis = Self::micros(metrics.analysis_duration());
        let total = Self::micros(metrics.total_duration());

        stats.avg_detection_us = Self::update_ewma(stats.avg_detection_us, detection, first);
        stats.avg_analysis_us = Self::update_ewma(stats.avg_analysis_us, analysis, first);
        stats.avg_frame_us = Self::update_ewma(stats.avg_frame_us, total, first);
        stats.max_detection_us = stats.max_detection_us.max(detection);
        stats.max_analysis_us = stats.max_analysis_us.max(analysis);
        stats.max_frame_us = stats.max_frame_us.max(total);

        // Flag slow seeks (> 500ms)
        if detection > 500_000 {
            tracing::warn!(
                "Slow seek+detect for frame {}: {}us",
                record.frame_number(),
                detection
            );
        }
    }
}
