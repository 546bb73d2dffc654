use super::action_run::ActionRun;
use super::frame_record::FrameRecord;
use super::similarity::Deviations;
use crate::error::AppError;
use crate::pipeline::segmentation::{self, action_runs};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;

/// One repetition of the work sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cycle {
    pub cycle_number: usize,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub frames: Vec<FrameRecord>,
    pub avg_motion: f64,
    pub actions: Vec<ActionRun>,
    pub similarity_score: Option<f64>,
    pub deviations: Option<Deviations>,
}

impl Cycle {
    /// Builds a cycle that owns `frames` and spans `start_time..end_time`.
    pub(crate) fn assemble(
        cycle_number: usize,
        frames: Vec<FrameRecord>,
        start_time: f64,
        end_time: f64,
    ) -> Self {
        let avg_motion = if frames.is_empty() {
            0.0
        } else {
            frames.iter().map(FrameRecord::motion_intensity).sum::<f64>() / frames.len() as f64
        };
        let actions = action_runs::encode(&frames);
        Self {
            cycle_number,
            start_time,
            end_time,
            duration: end_time - start_time,
            frames,
            avg_motion,
            actions,
            similarity_score: None,
            deviations: None,
        }
    }

    /// Builds a cycle from a hand-picked frame range, e.g. to use as a golden cycle.
    ///
    /// The cycle ends at the last frame's time. A segmented cycle instead ends at the exit frame,
    /// which is not part of its `frames`, so over the same frames this cycle is one frame
    /// interval shorter. Use [`Cycle::from_span`] to match a segmented cycle exactly.
    pub fn from_frames(cycle_number: usize, frames: Vec<FrameRecord>) -> Result<Self, AppError> {
        let end_time = frames.last().map_or(f64::NAN, FrameRecord::time);
        Self::from_span(cycle_number, frames, end_time)
    }

    /// Builds a cycle over `frames` that ends at `end_time`, at or after the last frame.
    pub fn from_span(
        cycle_number: usize,
        frames: Vec<FrameRecord>,
        end_time: f64,
    ) -> Result<Self, AppError> {
        segmentation::ensure_monotonic(&frames)?;
        let (start_time, last_time) = match (frames.first(), frames.last()) {
            (Some(first), Some(last)) => (first.time(), last.time()),
            _ => {
                return Err(AppError::MissingInput(
                    "a cycle needs at least one frame".to_string(),
                ))
            }
        };
        if !(end_time >= last_time) {
            return Err(AppError::InvalidOptions(format!(
                "a cycle cannot end at {end_time}s before its last frame at {last_time}s"
            )));
        }
        if end_time <= start_time {
            return Err(AppError::InvalidOptions(format!(
                "a cycle needs a positive duration, got {start_time}s..{end_time}s"
            )));
        }
        Ok(Self::assemble(cycle_number, frames, start_time, end_time))
    }

    /// Action labels of the cycle's runs, in order.
    pub fn action_labels(&self) -> Vec<&str> {
        self.actions.iter().map(|run| run.action.as_str()).collect()
    }
}

/// Reference cycle used as the comparison baseline.
///
/// Shared read-only; replacing it means building a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct GoldenCycle(Arc<Cycle>);

impl GoldenCycle {
    pub fn new(cycle: Cycle) -> Self {
        Self(Arc::new(cycle))
    }

    pub fn cycle(&self) -> &Cycle {
        &self.0
    }
}

impl Deref for GoldenCycle {
    type Target = Cycle;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Cycle> for GoldenCycle {
    fn from(cycle: Cycle) -> Self {
        Self::new(cycle)
    }
}
