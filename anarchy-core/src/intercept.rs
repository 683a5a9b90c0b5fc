use serde::{Deserialize, Serialize};

use crate::bounce::first_bounce;
use crate::constants::{
    AERIAL_ETA_DIVISOR, AERIAL_MAX_REMAINING_S, GRAVITY_Z, HALF_GRAVITY,
};
use crate::forecast::Trajectory;
use crate::state::{BallState, Pose, Team};
use crate::vector::{sign, Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub position: Vec3,
    pub time_to_arrival: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Intercept {
    Bounce { index: usize, target: Target },
    NoTarget,
}

impl Intercept {
    pub fn target(&self) -> Option<Target> {
        match self {
            Intercept::Bounce { target, .. } => Some(*target),
            Intercept::NoTarget => None,
        }
    }
}

pub fn plan_ground_intercept(now: f32, trajectory: &Trajectory) -> Intercept {
    match first_bounce(trajectory) {
        Some(bounce) => Intercept::Bounce {
            index: bounce.index,
            target: Target {
                position: bounce.sample.position,
                time_to_arrival: bounce.sample.time - now,
            },
        },
        None => Intercept::NoTarget,
    }
}

/// Destination shifted toward the car's own half, so the approach comes from
/// behind the ball.
pub fn approach_point(ball: Vec2, car: Vec2, team: Team) -> Vec2 {
    let dy = (ball - car).y.abs();
    Vec2::new(ball.x, ball.y - dy / 2.0 * team.side_sign())
}

/// Seconds until a body `height` above the floor, moving down at
/// `downward_speed`, lands under constant acceleration `accel` (positive, downward).
///
/// Returns 0 for a zero acceleration or when the floor is never reached.
pub fn bounce_time(height: f32, downward_speed: f32, accel: f32) -> f32 {
    if accel == 0.0 {
        return 0.0;
    }
    let discriminant = 2.0 * accel * height + downward_speed * downward_speed;
    if discriminant < 0.0 || !discriminant.is_finite() {
        return 0.0;
    }
    (discriminant.sqrt() - downward_speed) / accel
}

pub fn future(position: Vec3, velocity: Vec3, time: f32) -> Vec3 {
    Vec3::new(
        position.x + velocity.x * time,
        position.y + velocity.y * time,
        position.z + velocity.z * time - HALF_GRAVITY * time * time,
    )
}

/// Average acceleration (gravity compensated) needed to move from `position`
/// with `velocity` to `target` in exactly `time` seconds.
pub fn backsolve_future(position: Vec3, velocity: Vec3, target: Vec3, time: f32) -> Vec3 {
    if time <= 0.0 {
        return Vec3::ZERO;
    }
    let d = target - position;
    Vec3::new(
        2.0 * (d.x / time - velocity.x) / time,
        2.0 * (d.y / time - velocity.y) / time,
        2.0 * (HALF_GRAVITY * time + (d.z / time - velocity.z)) / time,
    )
}

pub fn closing_speed(target_pos: Vec3, target_vel: Vec3, our_pos: Vec3, our_vel: Vec3) -> f32 {
    let offset = target_pos - our_pos;
    let distance = offset.length();
    if distance == 0.0 {
        return 0.0;
    }
    offset.dot(target_vel - our_vel) / distance
}

fn eta_for(distance: f32) -> f32 {
    (distance.max(0.0) / AERIAL_ETA_DIVISOR).sqrt()
}

/// Intercept time estimate, in seconds from now, for an aerial at the ball.
pub fn refine_aerial_intercept(car: &Pose, ball: &BallState) -> f32 {
    let distance = (ball.position - car.position).length();
    let guess = eta_for(distance);
    let guessed_point = future(ball.position, ball.velocity, guess);

    let before = closing_speed(ball.position, ball.velocity, car.position, car.velocity);
    let after = closing_speed(guessed_point, ball.velocity, car.position, car.velocity);

    let refined = if sign(before) == sign(after) {
        eta_for(distance + before)
    } else {
        eta_for(distance + before + after)
    };
    refined.clamp(0.0, AERIAL_MAX_REMAINING_S)
}

/// Drag-free landing time of the ball on a floor at height `floor`.
pub fn ball_landing_time(ball: &BallState, floor: f32) -> f32 {
    bounce_time(ball.position.z - floor, -ball.velocity.z, -GRAVITY_Z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::BALL_RADIUS;
    use crate::forecast::TrajectorySample;

    fn flat_then_bounce(now: f32) -> Trajectory {
        let mut samples = Vec::new();
        for i in 0..120 {
            let t = i as f32 / 60.0;
            let vz = if i < 40 { -650.0 * t } else { 300.0 - 650.0 * (t - 40.0 / 60.0) };
            samples.push(TrajectorySample {
                time: now + t,
                position: Vec3::new(500.0 + 10.0 * i as f32, 200.0, 300.0),
                velocity: Vec3::new(600.0, 0.0, vz),
            });
        }
        Trajectory::new(samples).unwrap()
    }

    #[test]
    fn ground_intercept_uses_first_bounce() {
        let now = 42.0;
        let intercept = plan_ground_intercept(now, &flat_then_bounce(now));
        let Intercept::Bounce { index, target } = intercept else {
            panic!("expected a bounce, got {intercept:?}");
        };
        assert_eq!(index, 40);
        assert!((target.time_to_arrival - 40.0 / 60.0).abs() < 1e-3);
        assert_eq!(target.position, Vec3::new(900.0, 200.0, 300.0));
    }

    #[test]
    fn no_bounce_means_no_target() {
        let samples = (0..30)
            .map(|i| TrajectorySample {
                time: i as f32 / 60.0,
                position: Vec3::new(0.0, 0.0, 1_000.0),
                velocity: Vec3::new(0.0, 0.0, -650.0 * i as f32 / 60.0),
            })
            .collect();
        let intercept = plan_ground_intercept(0.0, &Trajectory::new(samples).unwrap());
        assert_eq!(intercept, Intercept::NoTarget);
        assert!(intercept.target().is_none());
    }

    #[test]
    fn bounce_time_guards_degenerate_inputs() {
        assert_eq!(bounce_time(100.0, 0.0, 0.0), 0.0);
        // Moving up too slowly to ever come back below a negative height.
        assert_eq!(bounce_time(-100.0, -10.0, 650.0), 0.0);
        let t = bounce_time(325.0, 0.0, 650.0);
        assert!((t - 1.0).abs() < 1e-5, "got {t}");
    }

    #[test]
    fn landing_time_matches_free_fall() {
        let ball = BallState {
            position: Vec3::new(0.0, 0.0, BALL_RADIUS + 325.0),
            velocity: Vec3::ZERO,
        };
        assert!((ball_landing_time(&ball, BALL_RADIUS) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn backsolve_inverts_future_for_a_resting_body() {
        let start = Vec3::new(0.0, 0.0, 17.0);
        let target = Vec3::new(400.0, -200.0, 817.0);
        let accel = backsolve_future(start, Vec3::ZERO, target, 2.0);
        // x: d = a t^2 / 2
        assert!((accel.x - 200.0).abs() < 1e-3);
        assert!((accel.y + 100.0).abs() < 1e-3);
        assert!((accel.z - (400.0 + 650.0)).abs() < 1e-3);
        assert_eq!(backsolve_future(start, Vec3::ZERO, target, 0.0), Vec3::ZERO);
    }

    #[test]
    fn closing_speed_sign_and_degenerate_case() {
        let approaching = closing_speed(
            Vec3::new(1_000.0, 0.0, 0.0),
            Vec3::new(-500.0, 0.0, 0.0),
            Vec3::ZERO,
            Vec3::ZERO,
        );
        assert!((approaching + 500.0).abs() < 1e-3);
        assert_eq!(closing_speed(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO), 0.0);
    }

    #[test]
    fn approach_point_sits_on_own_side() {
        let ball = Vec2::new(0.0, 1_000.0);
        let car = Vec2::new(0.0, 0.0);
        assert_eq!(approach_point(ball, car, Team::Blue), Vec2::new(0.0, 500.0));
        assert_eq!(approach_point(ball, car, Team::Orange), Vec2::new(0.0, 1_500.0));
    }

    #[test]
    fn aerial_refinement_is_bounded_and_finite() {
        let car = Pose {
            position: Vec3::new(0.0, 0.0, 17.0),
            ..Pose::default()
        };
        let hovering = BallState {
            position: Vec3::new(0.0, 800.0, 900.0),
            velocity: Vec3::ZERO,
        };
        let eta = refine_aerial_intercept(&car, &hovering);
        assert!(eta > 0.5 && eta < 3.0, "eta={eta}");

        let on_top = BallState {
            position: car.position,
            velocity: Vec3::new(0.0, 0.0, -3_000.0),
        };
        let eta = refine_aerial_intercept(&car, &on_top);
        assert!(eta.is_finite() && (0.0..=AERIAL_MAX_REMAINING_S).contains(&eta));
    }
}
