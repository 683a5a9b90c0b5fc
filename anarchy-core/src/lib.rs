pub mod agent;
pub mod attitude;
pub mod bounce;
pub mod config;
pub mod constants;
pub mod controls;
pub mod error;
pub mod forecast;
pub mod intercept;
pub mod maneuver;
pub mod state;
pub mod steering;
pub mod vector;

pub use agent::Agent;
pub use config::AgentConfig;
pub use controls::ActuatorCommand;
pub use error::ForecastError;
pub use forecast::{Trajectory, TrajectorySample};
pub use intercept::{Intercept, Target};
pub use maneuver::{Maneuver, ManeuverEvent};
pub use state::{BallState, Pose, Rotator, Team, WorldSnapshot};
pub use vector::{Vec2, Vec3};
