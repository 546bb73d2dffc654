pub mod common;
pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;

pub use config::{Configuration, SamplingOptions, SegmentationOptions};
pub use engine::{CycleEngine, CycleEngineBuilder};
pub use error::{AppError, ClassifierError, PoseSourceError};
