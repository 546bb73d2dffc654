pub mod keypoint;
pub mod pose;

pub use keypoint::{Keypoint, KeypointName};
pub use pose::PoseFrame;
