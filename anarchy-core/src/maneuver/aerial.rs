use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{FinishReason, ManeuverEvent};
use crate::attitude::aim_local;
use crate::constants::{
    AERIAL_ARRIVAL_DISTANCE, AERIAL_BOOST_MAX_ERROR_RAD, AERIAL_COAST_AFTER_S,
    AERIAL_MAX_REMAINING_S, AERIAL_MIN_REMAINING_S, DOUBLE_JUMP_END_S, DOUBLE_JUMP_MIN_HEIGHT,
    DOUBLE_JUMP_START_S, JUMP_HOLD_S,
};
use crate::controls::ActuatorCommand;
use crate::intercept::{backsolve_future, future};
use crate::state::{BallState, Pose};
use crate::vector::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AerialState {
    /// Clock value when the first jump was pressed; `None` until launch.
    pub activation_time: Option<f32>,
    /// Absolute clock value the intercept was locked to at launch.
    pub intercept_time: f32,
    pub double_jumped: bool,
}

impl AerialState {
    pub fn new(intercept_time: f32) -> Self {
        Self {
            activation_time: None,
            intercept_time,
            double_jumped: false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AerialTick<'a> {
    pub time: f32,
    pub car: &'a Pose,
    pub desired: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AerialStep {
    /// `None` once the aerial is over; the caller drives normally this tick.
    pub state: Option<AerialState>,
    pub command: ActuatorCommand,
    pub events: Vec<ManeuverEvent>,
}

pub fn time_remaining(state: &AerialState, now: f32) -> f32 {
    let remaining = (state.intercept_time - now).clamp(AERIAL_MIN_REMAINING_S, AERIAL_MAX_REMAINING_S);
    if remaining == 0.0 {
        0.1
    } else {
        remaining
    }
}

/// Vector the aerial steers along: the acceleration that meets the ball's
/// ballistic future at the locked time, or the car's own velocity once the
/// intercept is long gone.
pub fn desired_vector(state: &AerialState, now: f32, car: &Pose, ball: &BallState) -> Vec3 {
    let remaining = time_remaining(state, now);
    if remaining <= AERIAL_COAST_AFTER_S {
        return car.velocity;
    }
    let meet = future(ball.position, ball.velocity, remaining);
    backsolve_future(car.position, car.velocity, meet, remaining)
}

/// Advance the ground-to-air jump by one tick.
///
/// Jump windows are keyed on time since launch and checked in ascending order:
/// hold, release, optional double jump, then free flight.
pub fn step_aerial(mut state: AerialState, tick: &AerialTick<'_>) -> AerialStep {
    let grounded = tick.car.has_wheel_contact;
    let mut events = Vec::new();

    let Some(start) = state.activation_time else {
        if !grounded {
            return AerialStep {
                state: None,
                command: ActuatorCommand::NEUTRAL,
                events,
            };
        }
        state.activation_time = Some(tick.time);
        debug!(time = tick.time, intercept = state.intercept_time, "aerial launched");
        events.push(ManeuverEvent::AerialLaunched {
            time: tick.time,
            intercept_time: state.intercept_time,
        });
        return AerialStep {
            state: Some(state),
            command: ActuatorCommand {
                jump: true,
                ..ActuatorCommand::NEUTRAL
            },
            events,
        };
    };

    let t = tick.time - start;
    let finished = if grounded && t >= JUMP_HOLD_S {
        Some(FinishReason::Landed)
    } else if tick.time - state.intercept_time > -AERIAL_MIN_REMAINING_S {
        Some(FinishReason::TimedOut)
    } else {
        None
    };
    if let Some(reason) = finished {
        debug!(time = tick.time, ?reason, "aerial finished");
        events.push(ManeuverEvent::AerialFinished {
            time: tick.time,
            reason,
        });
        return AerialStep {
            state: None,
            command: ActuatorCommand::NEUTRAL,
            events,
        };
    }

    if grounded {
        // Still on the floor inside the hold window.
        return AerialStep {
            state: Some(state),
            command: ActuatorCommand {
                jump: true,
                ..ActuatorCommand::NEUTRAL
            },
            events,
        };
    }

    let local = tick.car.orientation().to_local(tick.desired);
    let attitude = aim_local(local, tick.car.local_angular_velocity());
    let mut command = ActuatorCommand {
        steer: attitude.steer,
        yaw: attitude.yaw,
        pitch: attitude.pitch,
        roll: attitude.roll,
        boost: tick.desired.length() > AERIAL_ARRIVAL_DISTANCE
            && attitude.error <= AERIAL_BOOST_MAX_ERROR_RAD,
        ..ActuatorCommand::NEUTRAL
    };

    if t < JUMP_HOLD_S {
        command.jump = true;
    } else if t < DOUBLE_JUMP_START_S {
        command.jump = false;
    } else if t < DOUBLE_JUMP_END_S && tick.desired.z > DOUBLE_JUMP_MIN_HEIGHT {
        command.jump = true;
        command.boost = false;
        command.yaw = 0.0;
        command.pitch = 0.0;
        command.roll = 0.0;
        if !state.double_jumped {
            state.double_jumped = true;
            events.push(ManeuverEvent::DoubleJump { time: tick.time });
        }
    } else {
        command.jump = false;
    }

    AerialStep {
        state: Some(state),
        command,
        events,
    }
}
