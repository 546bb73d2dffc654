pub mod classifier;
pub mod detect_service;
pub mod frame_sampler;
pub mod observer;
pub mod pose_source;

pub use classifier::{ActionClassifier, ClassificationRule, RuleBasedClassifier};
pub use detect_service::{DetectService, DetectServiceBuilder};
pub use frame_sampler::{FrameSampler, FrameSamplerBuilder, SamplingReport, SamplingStatus};
pub use observer::{ObserverSet, PerformanceMonitor, PerformanceStats, SamplingObserver};
pub use pose_source::PoseSource;

#[cfg(test)]
pub(crate) mod testing;
