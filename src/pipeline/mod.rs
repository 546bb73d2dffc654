pub mod comparison;
pub mod context;
pub mod features;
pub mod sampling;
pub mod segmentation;
pub mod statistics;
pub mod types;

pub use comparison::CycleComparator;
pub use features::{FeatureExtractor, MotionTracker, VelocityMode};
pub use sampling::{
    ActionClassifier, FrameSampler, PoseSource, RuleBasedClassifier, SamplingObserver,
    SamplingReport, SamplingStatus,
};
pub use segmentation::CycleSegmenter;
pub use types::{
    ActionClassification, ActionRun, Cycle, Deviations, FeatureSet, FrameRecord, GoldenCycle,
    SimilarityResult, StatisticsSummary,
};
