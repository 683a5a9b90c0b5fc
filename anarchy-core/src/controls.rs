use serde::{Deserialize, Serialize};

use crate::vector::clamp11;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActuatorCommand {
    pub steer: f32,
    pub throttle: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
    pub jump: bool,
    pub boost: bool,
    pub handbrake: bool,
}

impl ActuatorCommand {
    pub const NEUTRAL: Self = Self {
        steer: 0.0,
        throttle: 0.0,
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
        jump: false,
        boost: false,
        handbrake: false,
    };

    /// Copy with every analog axis forced into [-1, 1] (NaN becomes 0).
    pub fn clamped(self) -> Self {
        Self {
            steer: clamp11(self.steer),
            throttle: clamp11(self.throttle),
            pitch: clamp11(self.pitch),
            yaw: clamp11(self.yaw),
            roll: clamp11(self.roll),
            ..self
        }
    }

    pub fn is_within_bounds(&self) -> bool {
        [self.steer, self.throttle, self.pitch, self.yaw, self.roll]
            .iter()
            .all(|axis| (-1.0..=1.0).contains(axis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_bounds_every_axis() {
        let wild = ActuatorCommand {
            steer: 3.0,
            throttle: -7.5,
            pitch: f32::NAN,
            yaw: 1.5,
            roll: -0.25,
            jump: true,
            boost: true,
            handbrake: false,
        };
        assert!(!wild.is_within_bounds());

        let tame = wild.clamped();
        assert!(tame.is_within_bounds());
        assert_eq!(tame.steer, 1.0);
        assert_eq!(tame.throttle, -1.0);
        assert_eq!(tame.pitch, 0.0);
        assert_eq!(tame.roll, -0.25);
        assert!(tame.jump && tame.boost && !tame.handbrake);
    }

    #[test]
    fn neutral_is_default() {
        assert_eq!(ActuatorCommand::default(), ActuatorCommand::NEUTRAL);
    }
}
