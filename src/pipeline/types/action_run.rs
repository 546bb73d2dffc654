use serde::{Deserialize, Serialize};

/// A maximal span of consecutive frames sharing one action label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRun {
    pub action: String,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    /// Number of frames covered by the run.
    pub frame_count: usize,
}

impl ActionRun {
    pub fn new(
        action: impl Into<String>,
        start_time: f64,
        end_time: f64,
        frame_count: usize,
    ) -> Self {
        Self {
            action: action.into(),
            start_time,
            end_time,
            duration: end_time - start_time,
            frame_count,
        }
    }

    /// Per-frame labels covered by this run.
    pub fn expand(&self) -> impl Iterator<Item = &str> {
        std::iter::repeat(self.action.as_str()).take(self.frame_count)
    }
}
