mod action_run;
mod classification;
mod cycle;
mod feature_set;
mod frame_record;
mod similarity;
mod statistics_summary;

pub use action_run::ActionRun;
pub use classification::{ActionClassification, NO_PERSON_LABEL};
pub use cycle::{Cycle, GoldenCycle};
pub use feature_set::{FeatureSet, KeypointVelocity};
pub use frame_record::FrameRecord;
pub use similarity::{Deviations, SimilarityResult, SubScores, CONSISTENCY_SCORE};
pub use statistics_summary::StatisticsSummary;
