pub mod action_runs;
pub mod cycle_segmenter;

pub use cycle_segmenter::{ensure_monotonic, CycleSegmenter, SegmenterState};
