use anarchy_core::bounce::detect_bounces;
use anarchy_core::maneuver::{step_aerial, step_dodge, AerialState, AerialTick, DodgeAim, DodgeTick, ManeuverState};
use anarchy_core::steering::{drive, GroundInput};
use anarchy_core::{
    ActuatorCommand, Agent, AgentConfig, BallState, ForecastError, Pose, Trajectory, TrajectorySample, Vec2,
    Vec3, WorldSnapshot,
};
use core::f32::consts::PI;

const DT: f32 = 1.0 / 120.0;

fn free_fall(count: usize) -> Vec<TrajectorySample> {
    (0..count)
        .map(|i| {
            let t = i as f32 * DT;
            TrajectorySample {
                time: t,
                position: Vec3::new(0.0, 0.0, 1_500.0 - 325.0 * t * t),
                velocity: Vec3::new(0.0, 0.0, -650.0 * t),
            }
        })
        .collect()
}

#[test]
fn free_fall_has_no_bounces_and_one_kick_has_one() {
    let clean = Trajectory::new(free_fall(240)).unwrap();
    assert!(detect_bounces(&clean).is_empty());

    for kick in [10, 57, 239] {
        let mut samples = free_fall(240);
        for sample in samples.iter_mut().skip(kick) {
            sample.velocity.z += 900.0;
        }
        let bounces = detect_bounces(&Trajectory::new(samples).unwrap());
        assert_eq!(bounces.len(), 1, "kick={kick}");
        assert_eq!(bounces[0].index, kick);
    }

    let mut early = free_fall(240);
    for sample in early.iter_mut().skip(4) {
        sample.velocity.z += 900.0;
    }
    assert!(detect_bounces(&Trajectory::new(early).unwrap()).is_empty());
}

#[test]
fn malformed_forecasts_are_rejected() {
    assert_eq!(Trajectory::new(Vec::new()), Err(ForecastError::Empty));

    let mut backwards = free_fall(20);
    backwards[7].time = -1.0;
    assert!(matches!(
        Trajectory::new(backwards),
        Err(ForecastError::TimestampWentBackwards { index: 7, .. })
    ));

    let mut nan = free_fall(20);
    nan[3].velocity.x = f32::NAN;
    assert_eq!(Trajectory::new(nan), Err(ForecastError::NonFiniteSample { index: 3 }));
}

#[test]
fn correction_stays_in_half_open_range() {
    let facing = Vec2::new(1.0, 0.0);
    assert_eq!(facing.correction_to(Vec2::new(10.0, 0.0)), 0.0);
    assert_eq!(facing.correction_to(Vec2::new(-10.0, 0.0)), PI);
    for deg in 0..720 {
        let a = (deg as f32 * 0.5).to_radians();
        let c = Vec2::new(a.cos(), a.sin()).correction_to(Vec2::new(-a.sin(), a.cos() + 0.3));
        assert!(c > -PI && c <= PI, "deg={deg} c={c}");
    }
}

#[test]
fn sprint_from_rest_boosts_straight() {
    let out = drive(&GroundInput {
        position: Vec2::ZERO,
        velocity: Vec2::ZERO,
        facing: Vec2::new(1.0, 0.0),
        aim: Vec2::new(1_000.0, 0.0),
        destination: Vec2::new(1_000.0, 0.0),
        time_to_target: 1.0,
        height: 17.0,
        is_super_sonic: false,
    });
    assert_eq!(out.throttle, 1.0);
    assert!(out.boost);
    assert_eq!(out.steer, 0.0);
}

#[test]
fn dodge_is_idle_by_one_point_one_seconds_in_the_air() {
    let mut state = step_dodge(
        ManeuverState::IDLE,
        &DodgeTick {
            time: 0.0,
            has_wheel_contact: true,
        },
        Some(DodgeAim::TargetDirection(-0.3)),
    )
    .state;
    for time in [0.05, 0.1, 0.5, 1.0] {
        state = step_dodge(
            state,
            &DodgeTick {
                time,
                has_wheel_contact: false,
            },
            None,
        )
        .state;
        assert!(state.active(), "t={time}");
    }
    let out = step_dodge(
        state,
        &DodgeTick {
            time: 1.1,
            has_wheel_contact: false,
        },
        None,
    );
    assert!(!out.state.active());
}

#[test]
fn ground_to_air_jump_schedule() {
    let grounded = Pose {
        has_wheel_contact: true,
        ..Pose::default()
    };
    let airborne = Pose {
        position: Vec3::new(0.0, 0.0, 150.0),
        ..Pose::default()
    };
    let desired = Vec3::new(0.0, 0.0, 800.0);

    let launch = step_aerial(
        AerialState::new(1.5),
        &AerialTick {
            time: 0.0,
            car: &grounded,
            desired,
        },
    );
    let state = launch.state.unwrap();
    let schedule: Vec<bool> = [0.22, 0.26, 0.30]
        .into_iter()
        .map(|time| {
            step_aerial(
                state,
                &AerialTick {
                    time,
                    car: &airborne,
                    desired,
                },
            )
            .command
            .jump
        })
        .collect();
    assert!(launch.command.jump);
    assert_eq!(schedule, vec![false, true, false]);
}

#[test]
fn agent_output_is_always_bounded() {
    let forecast = Trajectory::new(free_fall(360)).unwrap();
    let mut agent = Agent::new(AgentConfig::preset("aerial").unwrap());
    for i in 0..200 {
        let t = i as f32 * DT;
        let snapshot = WorldSnapshot {
            time: t,
            car: Pose {
                position: Vec3::new(-800.0 + 4.0 * i as f32, 300.0, 17.0),
                velocity: Vec3::new(1_500.0, -100.0, 0.0),
                angular_velocity: Vec3::new(0.0, 0.0, 5.5),
                has_wheel_contact: i % 3 != 0,
                ..Pose::default()
            },
            ball: BallState {
                position: Vec3::new(0.0, 0.0, 1_500.0 - 325.0 * t * t),
                velocity: Vec3::new(0.0, 0.0, -650.0 * t),
            },
        };
        let command: ActuatorCommand = agent.next_command(&snapshot, &forecast);
        assert!(command.is_within_bounds(), "tick={i} {command:?}");
    }
}
