//! Deterministic stand-in for the game: one car, one ball, fixed-step
//! integration. Good enough to close the control loop; not a physics engine.

use crate::config::{forecast_sample_count, HarnessSettings, FORECAST_RATE};
use crate::rng::SeededRng;
use anarchy_core::constants::{
    BALL_RADIUS, CAR_NEUTRAL_Z, GRAVITY_Z, MAX_BOOST_SPEED, MAX_GROUND_SPEED,
};
use anarchy_core::state::Orientation;
use anarchy_core::{
    ActuatorCommand, BallState, ForecastError, Pose, Rotator, Team, Trajectory, TrajectorySample,
    Vec3, WorldSnapshot,
};

pub const ARENA_HALF_WIDTH: f32 = 4096.0;
pub const ARENA_HALF_LENGTH: f32 = 5120.0;
pub const ARENA_CEILING: f32 = 2044.0;
pub const CAR_RADIUS: f32 = 60.0;

const BALL_RESTITUTION: f32 = 0.6;
const BALL_ROLL_FRICTION: f32 = 0.97;
/// Horizontal only; vertical drag would push free fall out of the detector's band.
const BALL_DRAG: f32 = 0.0305;
const BALL_SETTLE_SPEED: f32 = 60.0;

const THROTTLE_ACCEL: f32 = 1600.0;
const BRAKE_ACCEL: f32 = 3500.0;
const COAST_DECEL: f32 = 525.0;
const BOOST_ACCEL: f32 = 991.667;
const SUPERSONIC_SPEED: f32 = 2200.0;
const TURN_RATE_SLOW: f32 = 4.0;
const TURN_RATE_FAST: f32 = 1.5;
const HANDBRAKE_TURN_SCALE: f32 = 1.5;
const JUMP_IMPULSE: f32 = 291.667;
const JUMP_HOLD_ACCEL: f32 = 1458.333;
const JUMP_HOLD_MAX_S: f32 = 0.2;
const SECOND_JUMP_WINDOW_S: f32 = 1.25;
const DODGE_IMPULSE: f32 = 500.0;
const DODGE_STICK_DEADZONE: f32 = 0.5;
const AIR_PITCH_RATE: f32 = 3.5;
const AIR_YAW_RATE: f32 = 3.0;
const AIR_ROLL_RATE: f32 = 4.5;
const TOUCH_PUSH: f32 = 250.0;

#[derive(Clone, Copy, Debug, Default)]
struct CarRuntime {
    jump_held: bool,
    jump_time: Option<f32>,
    second_jump_used: bool,
}

#[derive(Clone, Debug)]
pub struct Arena {
    time: f32,
    dt: f32,
    car: Pose,
    ball: BallState,
    runtime: CarRuntime,
    touching: bool,
}

impl Arena {
    /// Kickoff-style spawn for `team` with a seeded ball launch.
    pub fn new(seed: u32, team: Team, settings: &HarnessSettings) -> Self {
        let mut rng = SeededRng::new(seed);
        let ball = BallState {
            position: Vec3::new(
                rng.next_range(-2_000.0, 2_000.0),
                rng.next_range(-1_500.0, 1_500.0),
                rng.next_range(200.0, 1_200.0),
            ),
            velocity: Vec3::new(
                rng.next_range(-800.0, 800.0),
                rng.next_range(-800.0, 800.0),
                rng.next_range(-200.0, 800.0),
            ),
        };
        let side = team.side_sign();
        let car = Pose {
            position: Vec3::new(0.0, -2_500.0 * side, CAR_NEUTRAL_Z),
            rotation: Rotator::new(0.0, side * core::f32::consts::FRAC_PI_2, 0.0),
            has_wheel_contact: true,
            ..Pose::default()
        };
        Self::with_state(car, ball, settings)
    }

    pub fn with_state(car: Pose, ball: BallState, settings: &HarnessSettings) -> Self {
        Self {
            time: 0.0,
            dt: settings.tick_dt(),
            car,
            ball,
            runtime: CarRuntime::default(),
            touching: false,
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            time: self.time,
            car: self.car,
            ball: self.ball,
        }
    }

    pub fn car_ball_distance(&self) -> f32 {
        (self.ball.position - self.car.position).length()
    }

    /// Ball path over the next `horizon_s` seconds, sampled at the forecast
    /// rate, starting with the current state.
    pub fn forecast(&self, horizon_s: f32) -> Result<Trajectory, ForecastError> {
        let dt = 1.0 / FORECAST_RATE as f32;
        let count = forecast_sample_count(horizon_s);
        let mut ball = self.ball;
        let mut samples = Vec::with_capacity(count);
        for i in 0..count {
            if i > 0 {
                step_ball(&mut ball, dt);
            }
            samples.push(TrajectorySample {
                time: self.time + i as f32 * dt,
                position: ball.position,
                velocity: ball.velocity,
            });
        }
        Trajectory::new(samples)
    }

    /// Advance one tick. Returns true when this tick starts a car-ball contact.
    pub fn step(&mut self, command: &ActuatorCommand) -> bool {
        let command = command.clamped();
        if self.car.has_wheel_contact {
            self.drive(&command);
        } else {
            self.fly(&command);
        }
        self.runtime.jump_held = command.jump;
        self.integrate_car();
        step_ball(&mut self.ball, self.dt);
        self.time += self.dt;
        self.resolve_touch()
    }

    fn drive(&mut self, command: &ActuatorCommand) {
        let dt = self.dt;
        let car = &mut self.car;
        let yaw = car.rotation.yaw;
        let forward = Vec3::new(yaw.cos(), yaw.sin(), 0.0);
        let mut speed = car.velocity.dot(forward);

        let accel = if command.throttle * speed < 0.0 {
            BRAKE_ACCEL * command.throttle.signum()
        } else if command.throttle != 0.0 {
            let headroom = (1.0 - speed.abs() / MAX_GROUND_SPEED).max(0.0);
            THROTTLE_ACCEL * command.throttle * headroom
        } else if speed.abs() > 1.0 {
            -COAST_DECEL * speed.signum()
        } else {
            -speed / dt
        };
        speed += accel * dt;
        if command.boost {
            speed += BOOST_ACCEL * dt;
        }
        speed = speed.clamp(-MAX_BOOST_SPEED, MAX_BOOST_SPEED);

        let blend = (speed.abs() / MAX_BOOST_SPEED).min(1.0);
        let mut turn_rate = TURN_RATE_SLOW + (TURN_RATE_FAST - TURN_RATE_SLOW) * blend;
        if command.handbrake {
            turn_rate *= HANDBRAKE_TURN_SCALE;
        }
        // Turning needs some rolling speed, and reverses with the direction of travel.
        let rolling = (speed.abs() / 200.0).min(1.0) * speed.signum();
        let yaw_rate = command.steer * turn_rate * rolling;
        car.rotation = Rotator::new(0.0, wrap(yaw + yaw_rate * dt), 0.0);
        car.angular_velocity = Vec3::new(0.0, 0.0, yaw_rate);

        let heading = Vec3::new(car.rotation.yaw.cos(), car.rotation.yaw.sin(), 0.0);
        car.velocity = heading * speed;

        if command.jump && !self.runtime.jump_held {
            car.velocity.z += JUMP_IMPULSE;
            car.has_wheel_contact = false;
            self.runtime.jump_time = Some(self.time);
            self.runtime.second_jump_used = false;
        }
    }

    fn fly(&mut self, command: &ActuatorCommand) {
        let dt = self.dt;
        let pitch_rate = command.pitch * AIR_PITCH_RATE;
        let yaw_rate = command.yaw * AIR_YAW_RATE;
        let roll_rate = command.roll * AIR_ROLL_RATE;

        let rot = self.car.rotation;
        self.car.rotation = Rotator::new(
            wrap(rot.pitch + pitch_rate * dt),
            wrap(rot.yaw + yaw_rate * dt),
            wrap(rot.roll + roll_rate * dt),
        );
        let axes = Orientation::from_rotator(self.car.rotation);
        self.car.angular_velocity = axes.forward * roll_rate - axes.left * pitch_rate + axes.up * yaw_rate;

        let since_jump = self.runtime.jump_time.map(|t| self.time - t);
        if let Some(elapsed) = since_jump {
            if command.jump && self.runtime.jump_held && elapsed < JUMP_HOLD_MAX_S {
                self.car.velocity.z += JUMP_HOLD_ACCEL * dt;
            }
            let fresh_press = command.jump && !self.runtime.jump_held;
            if fresh_press && !self.runtime.second_jump_used && elapsed < SECOND_JUMP_WINDOW_S {
                self.runtime.second_jump_used = true;
                let stick = command.pitch.abs() + command.roll.abs();
                if stick > DODGE_STICK_DEADZONE {
                    let forward = axes.forward.flatten().normalized().extend(0.0);
                    let left = axes.left.flatten().normalized().extend(0.0);
                    self.car.velocity += (forward * -command.pitch + left * command.roll) * DODGE_IMPULSE;
                } else {
                    self.car.velocity.z += JUMP_IMPULSE;
                }
            }
        }

        if command.boost {
            self.car.velocity += axes.forward * (BOOST_ACCEL * dt);
        }
        self.car.velocity.z += GRAVITY_Z * dt;
    }

    fn integrate_car(&mut self) {
        let dt = self.dt;
        let car = &mut self.car;
        let speed = car.velocity.length();
        if speed > MAX_BOOST_SPEED {
            car.velocity = car.velocity * (MAX_BOOST_SPEED / speed);
        }
        car.position += car.velocity * dt;

        if car.position.x.abs() > ARENA_HALF_WIDTH {
            car.position.x = car.position.x.clamp(-ARENA_HALF_WIDTH, ARENA_HALF_WIDTH);
            car.velocity.x = 0.0;
        }
        if car.position.y.abs() > ARENA_HALF_LENGTH {
            car.position.y = car.position.y.clamp(-ARENA_HALF_LENGTH, ARENA_HALF_LENGTH);
            car.velocity.y = 0.0;
        }
        if car.position.z > ARENA_CEILING {
            car.position.z = ARENA_CEILING;
            car.velocity.z = car.velocity.z.min(0.0);
        }

        if !car.has_wheel_contact && car.position.z <= CAR_NEUTRAL_Z && car.velocity.z <= 0.0 {
            car.position.z = CAR_NEUTRAL_Z;
            car.velocity.z = 0.0;
            car.rotation = Rotator::new(0.0, car.rotation.yaw, 0.0);
            car.angular_velocity = Vec3::ZERO;
            car.has_wheel_contact = true;
            self.runtime.jump_time = None;
        }
        car.is_super_sonic = car.velocity.flatten().length() >= SUPERSONIC_SPEED;
    }

    fn resolve_touch(&mut self) -> bool {
        let offset = self.ball.position - self.car.position;
        let distance = offset.length();
        let contact = distance < BALL_RADIUS + CAR_RADIUS;
        let started = contact && !self.touching;
        self.touching = contact;
        if !contact {
            return false;
        }

        let normal = if distance > 0.0 {
            offset / distance
        } else {
            Vec3::new(0.0, 0.0, 1.0)
        };
        let approach = (self.car.velocity - self.ball.velocity).dot(normal).max(0.0);
        self.ball.velocity += normal * (approach * 1.5 + TOUCH_PUSH);
        self.ball.position = self.car.position + normal * (BALL_RADIUS + CAR_RADIUS);
        started
    }
}

/// One integration step for the ball: gravity, planar drag, floor, walls, ceiling.
pub fn step_ball(ball: &mut BallState, dt: f32) {
    let drag = 1.0 - BALL_DRAG * dt;
    ball.velocity.x *= drag;
    ball.velocity.y *= drag;
    ball.velocity.z += GRAVITY_Z * dt;
    ball.position += ball.velocity * dt;

    if ball.position.z < BALL_RADIUS {
        ball.position.z = BALL_RADIUS;
        if ball.velocity.z < 0.0 {
            ball.velocity.z = -ball.velocity.z * BALL_RESTITUTION;
            ball.velocity.x *= BALL_ROLL_FRICTION;
            ball.velocity.y *= BALL_ROLL_FRICTION;
            if ball.velocity.z < BALL_SETTLE_SPEED {
                ball.velocity.z = 0.0;
            }
        }
    }
    if ball.position.z > ARENA_CEILING - BALL_RADIUS && ball.velocity.z > 0.0 {
        ball.position.z = ARENA_CEILING - BALL_RADIUS;
        ball.velocity.z = -ball.velocity.z * BALL_RESTITUTION;
    }
    let x_limit = ARENA_HALF_WIDTH - BALL_RADIUS;
    if ball.position.x.abs() > x_limit {
        ball.position.x = ball.position.x.clamp(-x_limit, x_limit);
        ball.velocity.x = -ball.velocity.x * BALL_RESTITUTION;
    }
    let y_limit = ARENA_HALF_LENGTH - BALL_RADIUS;
    if ball.position.y.abs() > y_limit {
        ball.position.y = ball.position.y.clamp(-y_limit, y_limit);
        ball.velocity.y = -ball.velocity.y * BALL_RESTITUTION;
    }
}

fn wrap(angle: f32) -> f32 {
    anarchy_core::vector::wrap_angle(angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anarchy_core::bounce::detect_bounces;

    fn settings() -> HarnessSettings {
        HarnessSettings::default()
    }

    #[test]
    fn same_seed_same_spawn() {
        let a = Arena::new(9, Team::Blue, &settings()).snapshot();
        let b = Arena::new(9, Team::Blue, &settings()).snapshot();
        assert_eq!(a, b);
        assert_ne!(a.ball, Arena::new(10, Team::Blue, &settings()).snapshot().ball);
    }

    #[test]
    fn teams_spawn_on_their_own_half() {
        let blue = Arena::new(1, Team::Blue, &settings()).snapshot();
        let orange = Arena::new(1, Team::Orange, &settings()).snapshot();
        assert!(blue.car.position.y < 0.0);
        assert!(orange.car.position.y > 0.0);
        assert!(blue.car.facing().y > 0.99);
        assert!(orange.car.facing().y < -0.99);
    }

    #[test]
    fn dropped_ball_forecast_flags_the_floor_hit() {
        let ball = BallState {
            position: Vec3::new(0.0, 0.0, 800.0),
            velocity: Vec3::ZERO,
        };
        let arena = Arena::with_state(Pose::default(), ball, &settings());
        let forecast = arena.forecast(3.0).unwrap();
        assert_eq!(forecast.len(), 180);
        let bounces = detect_bounces(&forecast);
        let first = bounces.first().expect("ball should land");
        // sqrt(2 * (800 - 92.75) / 650) is about 1.475 s.
        assert!((first.sample.time - 1.475).abs() < 0.05, "t={}", first.sample.time);
    }

    #[test]
    fn ball_loses_energy_on_each_bounce() {
        let mut ball = BallState {
            position: Vec3::new(0.0, 0.0, 1_000.0),
            velocity: Vec3::ZERO,
        };
        let mut peaks = Vec::new();
        let mut rising = false;
        for _ in 0..(120 * 8) {
            let before = ball.velocity.z;
            step_ball(&mut ball, 1.0 / 120.0);
            if rising && ball.velocity.z <= 0.0 && before > 0.0 {
                peaks.push(ball.position.z);
            }
            rising = ball.velocity.z > 0.0;
            assert!(ball.position.z >= BALL_RADIUS);
        }
        assert!(peaks.len() >= 2);
        assert!(peaks.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn full_throttle_never_exceeds_ground_cap() {
        let mut arena = Arena::new(3, Team::Blue, &settings());
        let gas = ActuatorCommand {
            throttle: 1.0,
            ..ActuatorCommand::NEUTRAL
        };
        for _ in 0..600 {
            arena.step(&gas);
        }
        let speed = arena.snapshot().car.velocity.length();
        assert!(speed <= MAX_GROUND_SPEED + 1.0, "speed={speed}");
        assert!(speed > 1_300.0);
    }

    #[test]
    fn jump_leaves_the_floor_and_lands_level() {
        let mut arena = Arena::new(3, Team::Blue, &settings());
        let jump = ActuatorCommand {
            jump: true,
            pitch: 1.0,
            ..ActuatorCommand::NEUTRAL
        };
        arena.step(&jump);
        assert!(!arena.snapshot().car.has_wheel_contact);
        let mut landed = false;
        for _ in 0..600 {
            arena.step(&ActuatorCommand::NEUTRAL);
            let car = arena.snapshot().car;
            if car.has_wheel_contact {
                assert_eq!(car.position.z, CAR_NEUTRAL_Z);
                assert_eq!(car.rotation.pitch, 0.0);
                landed = true;
                break;
            }
        }
        assert!(landed);
    }
}
