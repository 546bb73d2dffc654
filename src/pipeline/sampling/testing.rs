//! Scripted in-memory pose source for sampler and engine tests.

use super::pose_source::PoseSource;
use crate::common::{Keypoint, KeypointName, PoseFrame};
use crate::error::PoseSourceError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

type PoseScript = Box<dyn Fn(usize) -> Option<PoseFrame> + Send + Sync>;

pub(crate) struct ScriptedSource {
    duration: Option<f64>,
    ready: bool,
    delay: Duration,
    script: PoseScript,
    failures: HashMap<usize, PoseSourceError>,
    seeks: Mutex<Vec<f64>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ScriptedSource {
    /// `script` maps the n-th seek to the pose shown there.
    pub(crate) fn new<F>(duration: f64, script: F) -> Self
    where
        F: Fn(usize) -> Option<PoseFrame> + Send + Sync + 'static,
    {
        Self {
            duration: Some(duration),
            ready: true,
            delay: Duration::ZERO,
            script: Box::new(script),
            failures: HashMap::new(),
            seeks: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn without_video(mut self) -> Self {
        self.duration = None;
        self
    }

    pub(crate) fn not_ready(mut self) -> Self {
        self.ready = false;
        self
    }

    /// The n-th seek fails with `error`.
    pub(crate) fn failing_at(mut self, seek: usize, error: PoseSourceError) -> Self {
        self.failures.insert(seek, error);
        self
    }

    pub(crate) fn seeks(&self) -> Vec<f64> {
        self.seeks.lock().unwrap().clone()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PoseSource for ScriptedSource {
    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn seek(&self, timestamp: f64) -> Result<(), PoseSourceError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let index = {
            let mut seeks = self.seeks.lock().unwrap();
            seeks.push(timestamp);
            seeks.len() - 1
        };
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.failures.get(&index) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn detect(&self) -> Result<Option<PoseFrame>, PoseSourceError> {
        let index = self.seeks.lock().unwrap().len().saturating_sub(1);
        Ok((self.script)(index))
    }
}

/// Upper body swaying sideways, arms hanging straight.
pub(crate) fn moving_pose(i: usize) -> PoseFrame {
    let dx = (i % 20) as f64 * 0.01;
    PoseFrame::new(vec![
        Keypoint::new(KeypointName::Nose, 0.5 + dx, 0.15, 0.95),
        Keypoint::new(KeypointName::LeftShoulder, 0.4 + dx, 0.3, 0.9),
        Keypoint::new(KeypointName::RightShoulder, 0.6 + dx, 0.3, 0.9),
        Keypoint::new(KeypointName::LeftElbow, 0.4 + dx, 0.5, 0.9),
        Keypoint::new(KeypointName::RightElbow, 0.6 + dx, 0.5, 0.9),
        Keypoint::new(KeypointName::LeftWrist, 0.35 + dx, 0.7, 0.9),
        Keypoint::new(KeypointName::RightWrist, 0.65 + dx, 0.7, 0.9),
    ])
}

/// Ten still frames, then ten frames of steady sideways motion, repeating.
pub(crate) fn work_rhythm(i: usize) -> PoseFrame {
    let phase = i % 20;
    if phase < 10 {
        moving_pose(0)
    } else {
        moving_pose((phase - 10) * 2)
    }
}
