use serde::{Deserialize, Serialize};

use crate::constants::{
    BOOST_ALIGNMENT_RAD, MAX_GROUND_SPEED, REVERSE_MAX_HEIGHT, SPEED_GAP_ACCELERATE,
    SPEED_GAP_COAST, STEER_GAIN,
};
use crate::vector::{clamp11, sign, Vec2};
use core::f32::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroundInput {
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Vec2,
    /// Point the nose (or tail, when reversing) is aimed at.
    pub aim: Vec2,
    /// Point whose distance sets the required speed.
    pub destination: Vec2,
    pub time_to_target: f32,
    pub height: f32,
    pub is_super_sonic: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroundOutput {
    pub steer: f32,
    pub throttle: f32,
    pub boost: bool,
    pub handbrake: bool,
    pub backwards: bool,
    /// Steering correction actually applied, after any reverse reflection.
    pub correction: f32,
    pub required_speed: f32,
}

pub fn required_speed(distance: f32, time_to_target: f32) -> f32 {
    if time_to_target > 0.0 && time_to_target.is_finite() {
        distance / time_to_target
    } else {
        0.0
    }
}

pub fn should_reverse(correction: f32, height: f32) -> bool {
    correction.cos() < 0.0 && height < REVERSE_MAX_HEIGHT
}

pub fn reverse_correction(correction: f32) -> f32 {
    if correction == 0.0 {
        return PI;
    }
    -(correction - sign(correction) * PI)
}

/// One tick of ground driving. Pure: identical inputs give identical outputs.
pub fn drive(input: &GroundInput) -> GroundOutput {
    let mut correction = input.facing.correction_to(input.aim - input.position);
    let backwards = should_reverse(correction, input.height);
    if backwards {
        correction = reverse_correction(correction);
    }
    let direction = if backwards { -1.0 } else { 1.0 };

    let required = required_speed((input.destination - input.position).length(), input.time_to_target);
    let speed_gap = required - input.velocity.length();

    let (throttle, boost) = if speed_gap > SPEED_GAP_ACCELERATE || required > MAX_GROUND_SPEED {
        let boost = correction.abs() < BOOST_ALIGNMENT_RAD && !input.is_super_sonic && !backwards;
        (direction, boost)
    } else if speed_gap > SPEED_GAP_COAST {
        (0.0, false)
    } else {
        (-direction, false)
    };

    let turn = correction * STEER_GAIN;

    GroundOutput {
        steer: clamp11(turn),
        throttle,
        boost,
        handbrake: turn.abs() > 1.0 && !input.is_super_sonic,
        backwards,
        correction,
        required_speed: required,
    }
}
