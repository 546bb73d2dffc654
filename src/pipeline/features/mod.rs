pub mod angles;
pub mod extractor;
pub mod motion;

pub use extractor::FeatureExtractor;
pub use motion::{MotionTracker, VelocityMode};
