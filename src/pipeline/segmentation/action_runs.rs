//! Run-length encoding of per-frame action labels.

use crate::pipeline::types::{ActionRun, FrameRecord};

/// Collapses consecutive identical labels into runs.
///
/// A run ends where the next one starts; the last run ends at the last frame's time. Runs
/// cover the frames without gaps or overlaps.
pub fn encode(frames: &[FrameRecord]) -> Vec<ActionRun> {
    let mut runs = Vec::new();
    let Some(first) = frames.first() else {
        return runs;
    };

    let mut current = first.action();
    let mut start_time = first.time();
    let mut frame_count = 0;

    for frame in frames {
        if frame.action() != current {
            runs.push(ActionRun::new(current, start_time, frame.time(), frame_count));
            current = frame.action();
            start_time = frame.time();
            frame_count = 0;
        }
        frame_count += 1;
    }

    let end_time = frames.last().map_or(start_time, FrameRecord::time);
    runs.push(ActionRun::new(current, start_time, end_time, frame_count));
    runs
}

/// Inverse of [`encode`]: one label per encoded frame.
pub fn expand_labels(runs: &[ActionRun]) -> Vec<&str> {
    runs.iter().flat_map(ActionRun::expand).collect()
}
