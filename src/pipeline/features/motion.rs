//! Frame-to-frame landmark velocity
//!
//! Velocity is the one feature that is not a function of a single pose, so it lives with the
//! sampler: the tracker remembers the previous pose of the current pass only.

use crate::common::PoseFrame;
use crate::pipeline::types::KeypointVelocity;
use serde::{Deserialize, Serialize};

/// Normalized units per second are scaled to "percent of frame per second".
pub const VELOCITY_SCALE: f64 = 100.0;

/// How the sampler fills the velocity feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityMode {
    /// Real displacement between consecutive poses.
    #[default]
    Displacement,
    /// Never filled, so motion intensity is always 0 and no cycle is ever entered.
    Unpopulated,
}

#[derive(Debug, Clone)]
pub struct MotionTracker {
    mode: VelocityMode,
    previous: Option<(f64, PoseFrame)>,
}

impl MotionTracker {
    pub fn new(mode: VelocityMode) -> Self {
        Self {
            mode,
            previous: None,
        }
    }

    /// Velocities of the landmarks present in both this pose and the previous one.
    ///
    /// A frame without a pose breaks the chain; the next pose starts from rest.
    pub fn update(&mut self, time: f64, pose: Option<&PoseFrame>) -> Vec<KeypointVelocity> {
        if self.mode == VelocityMode::Unpopulated {
            return Vec::new();
        }

        let Some(pose) = pose else {
            self.previous = None;
            return Vec::new();
        };

        let velocities = match &self.previous {
            Some((previous_time, previous_pose)) if time > *previous_time => {
                let dt = time - previous_time;
                pose.keypoints()
                    .iter()
                    .filter_map(|current| {
                        previous_pose.get(current.name).map(|before| KeypointVelocity {
                            name: current.name,
                            vx: (current.x - before.x) / dt * VELOCITY_SCALE,
                            vy: (current.y - before.y) / dt * VELOCITY_SCALE,
                        })
                    })
                    .collect()
            }
            _ => Vec::new(),
        };

        self.previous = Some((time, pose.clone()));
        velocities
    }
}
