use serde::{Deserialize, Serialize};

pub mod aerial;
pub mod dodge;

pub use aerial::{step_aerial, AerialState, AerialStep, AerialTick};
pub use dodge::{step_dodge, DodgeAim, DodgeStep, DodgeTick};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManeuverPhase {
    #[default]
    Idle,
    /// Jump pressed; waiting out the arming delay.
    Committed,
    /// Secondary input is being issued.
    Executing,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ManeuverState {
    pub phase: ManeuverPhase,
    pub activation_time: f32,
    pub committed_pitch: f32,
    pub committed_roll: f32,
}

impl ManeuverState {
    pub const IDLE: Self = Self {
        phase: ManeuverPhase::Idle,
        activation_time: 0.0,
        committed_pitch: 0.0,
        committed_roll: 0.0,
    };

    #[inline]
    pub fn active(&self) -> bool {
        self.phase != ManeuverPhase::Idle
    }

    #[inline]
    pub fn elapsed(&self, now: f32) -> f32 {
        now - self.activation_time
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Maneuver {
    #[default]
    Idle,
    Dodge(ManeuverState),
    Aerial(AerialState),
}

impl Maneuver {
    pub fn is_idle(&self) -> bool {
        matches!(self, Maneuver::Idle)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Landed,
    TimedOut,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ManeuverEvent {
    DodgeCommitted { time: f32, pitch: f32, roll: f32 },
    DodgeExecuting { time: f32 },
    DodgeFinished { time: f32, reason: FinishReason },
    AerialLaunched { time: f32, intercept_time: f32 },
    DoubleJump { time: f32 },
    AerialFinished { time: f32, reason: FinishReason },
}
