//! Bounce detection over a ball forecast.
//!
//! In free fall the finite-difference vertical acceleration between two
//! forecast samples sits near gravity. An impact with the floor (or a wall)
//! injects an impulse that pushes the estimate out of the free-fall band, so
//! the later sample of the pair is flagged as a bounce.

use serde::{Deserialize, Serialize};

use crate::constants::{BOUNCE_GUARD_SAMPLES, FREE_FALL_ACCEL_MAX, FREE_FALL_ACCEL_MIN};
use crate::forecast::{Trajectory, TrajectorySample};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BounceEvent {
    pub index: usize,
    pub sample: TrajectorySample,
}

pub fn vertical_acceleration(prev: &TrajectorySample, current: &TrajectorySample) -> Option<f32> {
    let dt = current.time - prev.time;
    if dt == 0.0 {
        return None;
    }
    Some((current.velocity.z - prev.velocity.z) / dt)
}

#[inline]
pub fn is_free_fall(acceleration_z: f32) -> bool {
    FREE_FALL_ACCEL_MIN < acceleration_z && acceleration_z < FREE_FALL_ACCEL_MAX
}

/// Every bounce in the forecast, in time order.
///
/// The first `BOUNCE_GUARD_SAMPLES` samples are never flagged: the forecast's
/// opening samples produce unreliable differences.
pub fn detect_bounces(trajectory: &Trajectory) -> Vec<BounceEvent> {
    let samples = trajectory.samples();
    let mut bounces = Vec::new();

    for index in BOUNCE_GUARD_SAMPLES.max(1)..samples.len() {
        let prev = &samples[index - 1];
        let current = &samples[index];
        let Some(acceleration_z) = vertical_acceleration(prev, current) else {
            continue;
        };
        if !is_free_fall(acceleration_z) {
            bounces.push(BounceEvent {
                index,
                sample: *current,
            });
        }
    }

    bounces
}

pub fn first_bounce(trajectory: &Trajectory) -> Option<BounceEvent> {
    detect_bounces(trajectory).into_iter().next()
}
