use crate::config::SegmentationOptions;
use crate::error::AppError;
use crate::pipeline::comparison::CycleComparator;
use crate::pipeline::types::{Cycle, FrameRecord};

/// Where the segmenter stands relative to the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmenterState {
    OutsideCycle,
    InsideCycle { start_index: usize },
}

impl SegmenterState {
    /// State after seeing the frame at `index`. Entry is strictly above `threshold`, exit at
    /// or below it.
    pub fn advance(self, index: usize, intensity: f64, threshold: f64) -> Self {
        match self {
            SegmenterState::OutsideCycle if intensity > threshold => {
                SegmenterState::InsideCycle { start_index: index }
            }
            SegmenterState::InsideCycle { .. } if intensity <= threshold => {
                SegmenterState::OutsideCycle
            }
            unchanged => unchanged,
        }
    }
}

/// Rejects frame sequences whose time goes backwards.
pub fn ensure_monotonic(frames: &[FrameRecord]) -> Result<(), AppError> {
    for (index, pair) in frames.windows(2).enumerate() {
        let (previous, current) = (pair[0].time(), pair[1].time());
        // also catches NaN
        if !(current >= previous) {
            return Err(AppError::NonMonotonicFrames {
                index: index + 1,
                previous,
                current,
            });
        }
    }
    Ok(())
}

/// Splits a frame sequence into work cycles on motion-intensity threshold crossings.
///
/// A frame enters a cycle when its intensity is strictly above the threshold and leaves it
/// when the intensity is at or below it. A span still open when the frames run out is not
/// emitted.
#[derive(Debug, Clone)]
pub struct CycleSegmenter {
    options: SegmentationOptions,
    comparator: CycleComparator,
}

impl CycleSegmenter {
    pub fn new(options: SegmentationOptions) -> Self {
        Self {
            options,
            comparator: CycleComparator::default(),
        }
    }

    pub fn with_comparator(mut self, comparator: CycleComparator) -> Self {
        self.comparator = comparator;
        self
    }

    pub fn options(&self) -> &SegmentationOptions {
        &self.options
    }

    /// Detects cycles in `frames`, leaving the input untouched.
    ///
    /// With `use_golden_cycle` set and a golden cycle given, every emitted cycle carries its
    /// similarity score and deviations against it.
    pub fn segment(
        &self,
        frames: &[FrameRecord],
        golden: Option<&Cycle>,
    ) -> Result<Vec<Cycle>, AppError> {
        self.options.validate()?;
        ensure_monotonic(frames)?;

        let threshold = self.options.threshold;
        let mut state = SegmenterState::OutsideCycle;
        let mut cycles: Vec<Cycle> = Vec::new();
        let mut discarded = 0usize;

        for (index, frame) in frames.iter().enumerate() {
            let next = state.advance(index, frame.motion_intensity(), threshold);
            match (state, next) {
                (SegmenterState::OutsideCycle, SegmenterState::InsideCycle { .. }) => {
                    tracing::debug!("Cycle start at frame {} ({}s)", index, frame.time());
                }
                (SegmenterState::InsideCycle { start_index }, SegmenterState::OutsideCycle) => {
                    let start_time = frames[start_index].time();
                    let duration = frame.time() - start_time;
                    if duration >= self.options.min_cycle_duration && duration > 0.0 {
                        let cycle = Cycle::assemble(
                            cycles.len() + 1,
                            frames[start_index..index].to_vec(),
                            start_time,
                            frame.time(),
                        );
                        tracing::debug!(
                            "Cycle {} detected: {}s..{}s ({}s)",
                            cycle.cycle_number,
                            cycle.start_time,
                            cycle.end_time,
                            cycle.duration
                        );
                        cycles.push(cycle);
                    } else {
                        tracing::debug!(
                            "Discarding {}s span at {}s as noise",
                            duration,
                            start_time
                        );
                        discarded += 1;
                    }
                }
                _ => {}
            }
            state = next;
        }

        if let SegmenterState::InsideCycle { start_index } = state {
            tracing::debug!(
                "Span open since frame {} at end of stream is not emitted",
                start_index
            );
        }

        if self.options.use_golden_cycle {
            if let Some(golden) = golden {
                for cycle in &mut cycles {
                    let result = self.comparator.compare(Some(golden), Some(cycle));
                    cycle.similarity_score = Some(result.score);
                    cycle.deviations = Some(result.deviations);
                }
            }
        }

        if cycles.is_empty() {
            tracing::info!(
                "No cycles detected over {} frames (threshold {}, min duration {}s)",
                frames.len(),
                threshold,
                self.options.min_cycle_duration
            );
        } else {
            tracing::info!(
                "Detected {} cycles over {} frames, {} short spans discarded",
                cycles.len(),
                frames.len(),
                discarded
            );
        }

        Ok(cycles)
    }

    /// Whether each frame sits inside a cycle span, before the minimum-duration filter.
    pub fn inside_cycle_mask(&self, frames: &[FrameRecord]) -> Vec<bool> {
        let threshold = self.options.threshold;
        let mut state = SegmenterState::OutsideCycle;
        frames
            .iter()
            .enumerate()
            .map(|(index, frame)| {
                state = state.advance(index, frame.motion_intensity(), threshold);
                matches!(state, SegmenterState::InsideCycle { .. })
            })
            .collect()
    }
}

impl Default for CycleSegmenter {
    fn default() -> Self {
        Self::new(SegmentationOptions::default())
    }
}
