use serde::{Deserialize, Serialize};

use crate::vector::{Vec2, Vec3};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    #[default]
    Blue,
    Orange,
}

impl Team {
    /// +1 for the blue side, -1 for orange.
    pub fn side_sign(self) -> f32 {
        match self {
            Team::Blue => 1.0,
            Team::Orange => -1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotator {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotator {
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orientation {
    pub forward: Vec3,
    pub left: Vec3,
    pub up: Vec3,
}

impl Orientation {
    pub fn from_rotator(rot: Rotator) -> Self {
        let (sp, cp) = rot.pitch.sin_cos();
        let (sy, cy) = rot.yaw.sin_cos();
        let (sr, cr) = rot.roll.sin_cos();

        Self {
            forward: Vec3::new(cp * cy, cp * sy, sp),
            left: Vec3::new(cy * sp * sr - cr * sy, sy * sp * sr + cr * cy, -cp * sr),
            up: Vec3::new(-cr * cy * sp - sr * sy, -cr * sy * sp + sr * cy, cp * cr),
        }
    }

    /// Express a world-frame vector in body coordinates.
    #[inline]
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        Vec3::new(
            self.forward.dot(world),
            self.left.dot(world),
            self.up.dot(world),
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Rotator,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub has_wheel_contact: bool,
    pub is_super_sonic: bool,
}

impl Pose {
    /// Planar heading derived from pitch and yaw (not normalized when pitched).
    pub fn facing(&self) -> Vec2 {
        let cp = self.rotation.pitch.cos();
        Vec2::new(cp * self.rotation.yaw.cos(), cp * self.rotation.yaw.sin())
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        Orientation::from_rotator(self.rotation)
    }

    #[inline]
    pub fn local_angular_velocity(&self) -> Vec3 {
        self.orientation().to_local(self.angular_velocity)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub position: Vec3,
    pub velocity: Vec3,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: f32,
    pub car: Pose,
    pub ball: BallState,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn level_orientation_is_world_aligned() {
        let o = Orientation::from_rotator(Rotator::default());
        assert!(approx(o.forward, Vec3::new(1.0, 0.0, 0.0)));
        assert!(approx(o.left, Vec3::new(0.0, 1.0, 0.0)));
        assert!(approx(o.up, Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn yawed_orientation_rotates_forward() {
        let o = Orientation::from_rotator(Rotator::new(0.0, FRAC_PI_2, 0.0));
        assert!(approx(o.forward, Vec3::new(0.0, 1.0, 0.0)));
        let local = o.to_local(Vec3::new(0.0, 10.0, 0.0));
        assert!(approx(local, Vec3::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn facing_follows_yaw() {
        let pose = Pose {
            rotation: Rotator::new(0.0, FRAC_PI_2, 0.0),
            ..Pose::default()
        };
        let f = pose.facing();
        assert!(f.x.abs() < 1e-6);
        assert!((f.y - 1.0).abs() < 1e-6);
    }
}
