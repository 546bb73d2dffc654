use crate::common::PoseFrame;
use crate::error::PoseSourceError;
use async_trait::async_trait;

/// The video plus pose model the sampler reads from.
///
/// Seeking moves a shared playback position, so calls must not overlap: the sampler awaits
/// each `seek` and `detect` before issuing the next one.
#[async_trait]
pub trait PoseSource: Send + Sync {
    /// Length of the loaded video in seconds, `None` while nothing is loaded.
    fn duration(&self) -> Option<f64>;

    /// Whether the pose model is loaded and able to run.
    fn is_ready(&self) -> bool {
        true
    }

    /// Resolves once the video shows the frame at `timestamp` seconds.
    async fn seek(&self, timestamp: f64) -> Result<(), PoseSourceError>;

    /// Runs the pose model on the current frame. `Ok(None)` means nobody is in view.
    async fn detect(&self) -> Result<Option<PoseFrame>, PoseSourceError>;
}
