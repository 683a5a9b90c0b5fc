use serde::{Deserialize, Serialize};

use crate::constants::{ATTITUDE_DIVISOR, ATTITUDE_GAIN, ATTITUDE_RATE_DAMPING, RECOVERY_GAIN};
use crate::state::Rotator;
use crate::vector::{clamp11, Vec3};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttitudeOutput {
    pub steer: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    pub error: f32,
}

pub fn steer_pd(angle: f32, rate: f32) -> f32 {
    let scaled = ATTITUDE_GAIN * (angle + rate);
    clamp11(scaled * scaled * scaled / ATTITUDE_DIVISOR)
}

/// Point the nose at `local`, a body-frame (forward, left, up) vector.
///
/// `local_angular_velocity` damps the response. Roll is left neutral.
pub fn aim_local(local: Vec3, local_angular_velocity: Vec3) -> AttitudeOutput {
    let yaw_error = local.y.atan2(local.x);
    let pitch_error = local.z.atan2(local.x);

    AttitudeOutput {
        steer: steer_pd(yaw_error, 0.0),
        yaw: steer_pd(yaw_error, -local_angular_velocity.z / ATTITUDE_RATE_DAMPING),
        pitch: steer_pd(pitch_error, local_angular_velocity.y / ATTITUDE_RATE_DAMPING),
        roll: 0.0,
        error: yaw_error.abs() + pitch_error.abs(),
    }
}

/// Restoring (roll, pitch) toward a level attitude for an airborne car.
pub fn recover(rotation: Rotator) -> (f32, f32) {
    (
        clamp11(rotation.roll * RECOVERY_GAIN),
        clamp11(rotation.pitch * RECOVERY_GAIN),
    )
}
