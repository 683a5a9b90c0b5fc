use crate::attitude::recover;
use crate::config::AgentConfig;
use crate::controls::ActuatorCommand;
use crate::forecast::Trajectory;
use crate::intercept::{approach_point, plan_ground_intercept, refine_aerial_intercept, Target};
use crate::maneuver::aerial::desired_vector;
use crate::maneuver::{
    step_aerial, step_dodge, AerialState, AerialTick, DodgeAim, DodgeTick, Maneuver, ManeuverEvent,
    ManeuverState,
};
use crate::state::WorldSnapshot;
use crate::steering::{drive, GroundInput};

pub type EventListener = Box<dyn FnMut(&ManeuverEvent) + Send>;

pub struct Agent {
    config: AgentConfig,
    maneuver: Maneuver,
    last_target: Option<Target>,
    listener: Option<EventListener>,
}

impl Agent {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            maneuver: Maneuver::Idle,
            last_target: None,
            listener: None,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn maneuver(&self) -> Maneuver {
        self.maneuver
    }

    pub fn last_target(&self) -> Option<Target> {
        self.last_target
    }

    /// Forget any maneuver in progress, e.g. before a new match. The
    /// listener stays registered.
    pub fn reset(&mut self) {
        self.maneuver = Maneuver::Idle;
        self.last_target = None;
    }

    pub fn on_event<F>(&mut self, listener: F)
    where
        F: FnMut(&ManeuverEvent) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    /// Decide this tick's command. Always returns a bounded command.
    pub fn next_command(&mut self, snapshot: &WorldSnapshot, trajectory: &Trajectory) -> ActuatorCommand {
        let now = snapshot.time;
        let car = &snapshot.car;
        let ball = &snapshot.ball;
        let car_xy = car.position.flatten();
        let ball_xy = ball.position.flatten();

        let target = plan_ground_intercept(now, trajectory).target().unwrap_or_else(|| Target {
            position: approach_point(ball_xy, car_xy, self.config.team).extend(ball.position.z),
            time_to_arrival: trajectory.horizon_from(now),
        });
        self.last_target = Some(target);

        if let Some(command) = self.step_aerial_mode(snapshot) {
            return command.clamped();
        }

        let ground = drive(&GroundInput {
            position: car_xy,
            velocity: car.velocity.flatten(),
            facing: car.facing(),
            aim: ball_xy,
            destination: target.position.flatten(),
            time_to_target: target.time_to_arrival,
            height: car.position.z,
            is_super_sonic: car.is_super_sonic,
        });
        let mut command = ActuatorCommand {
            steer: ground.steer,
            throttle: ground.throttle,
            boost: ground.boost,
            handbrake: ground.handbrake,
            ..ActuatorCommand::NEUTRAL
        };

        self.step_dodge_mode(snapshot, &mut command);

        if !car.has_wheel_contact && self.maneuver.is_idle() {
            let (roll, pitch) = recover(car.rotation);
            command.roll = roll;
            command.pitch = pitch;
            command.boost = false;
        }

        command.clamped()
    }

    fn dodge_gate(&self, snapshot: &WorldSnapshot) -> bool {
        let car = &snapshot.car;
        let ball = &snapshot.ball;
        let distance = (ball.position.flatten() - car.position.flatten()).length();
        distance < self.config.dodge_distance
            && car.velocity.length() > self.config.dodge_min_speed
            && ball.position.z < self.config.dodge_max_ball_height
    }

    fn step_dodge_mode(&mut self, snapshot: &WorldSnapshot, command: &mut ActuatorCommand) {
        let state = match self.maneuver {
            Maneuver::Dodge(state) => state,
            Maneuver::Idle if self.dodge_gate(snapshot) => ManeuverState::IDLE,
            _ => return,
        };

        let car = &snapshot.car;
        let trigger = if state.active() {
            None
        } else {
            let to_ball = (snapshot.ball.position - car.position).flatten();
            Some(DodgeAim::TargetDirection(car.facing().correction_to(to_ball)))
        };
        let step = step_dodge(
            state,
            &DodgeTick {
                time: snapshot.time,
                has_wheel_contact: car.has_wheel_contact,
            },
            trigger,
        );

        command.jump = step.jump;
        if let Some(pitch) = step.pitch {
            command.pitch = pitch;
        }
        if let Some(roll) = step.roll {
            command.roll = roll;
        }
        self.maneuver = if step.state.active() {
            Maneuver::Dodge(step.state)
        } else {
            Maneuver::Idle
        };
        self.emit(&step.events);
    }

    fn aerial_trigger(&self, snapshot: &WorldSnapshot) -> bool {
        let car = &snapshot.car;
        let ball = &snapshot.ball;
        self.config.aerials
            && car.has_wheel_contact
            && ball.position.z > self.config.aerial_min_height
            && (ball.position.flatten() - car.position.flatten()).length() < self.config.aerial_max_distance
    }

    fn step_aerial_mode(&mut self, snapshot: &WorldSnapshot) -> Option<ActuatorCommand> {
        let now = snapshot.time;
        let car = &snapshot.car;
        let ball = &snapshot.ball;

        let state = match self.maneuver {
            Maneuver::Aerial(state) => state,
            Maneuver::Idle if self.aerial_trigger(snapshot) => {
                AerialState::new(now + refine_aerial_intercept(car, ball))
            }
            _ => return None,
        };

        let desired = desired_vector(&state, now, car, ball);
        let step = step_aerial(
            state,
            &AerialTick {
                time: now,
                car,
                desired,
            },
        );
        self.emit(&step.events);

        match step.state {
            Some(next) => {
                self.maneuver = Maneuver::Aerial(next);
                Some(step.command)
            }
            None => {
                self.maneuver = Maneuver::Idle;
                None
            }
        }
    }

    fn emit(&mut self, events: &[ManeuverEvent]) {
        if let Some(listener) = self.listener.as_mut() {
            for event in events {
                listener(event);
            }
        }
    }
}
