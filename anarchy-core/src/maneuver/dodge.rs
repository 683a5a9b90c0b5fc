use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{FinishReason, ManeuverEvent, ManeuverPhase, ManeuverState};
use crate::constants::{DODGE_ARMING_DELAY_S, DODGE_MAX_EXECUTION_S};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DodgeAim {
    NoTarget,
    /// Flip toward a target this many radians off the nose.
    TargetDirection(f32),
}

impl DodgeAim {
    /// (pitch, roll) stick deflection held through the flip.
    pub fn stick(self) -> (f32, f32) {
        match self {
            DodgeAim::NoTarget => (-1.0, 0.0),
            DodgeAim::TargetDirection(angle) => (-angle.cos(), angle.sin()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DodgeTick {
    pub time: f32,
    pub has_wheel_contact: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DodgeStep {
    pub state: ManeuverState,
    pub jump: bool,
    /// `None` while the dodge has no opinion on the stick.
    pub pitch: Option<f32>,
    pub roll: Option<f32>,
    pub events: Vec<ManeuverEvent>,
}

impl DodgeStep {
    fn quiet(state: ManeuverState) -> Self {
        Self {
            state,
            jump: false,
            pitch: None,
            roll: None,
            events: Vec::new(),
        }
    }
}

/// Advance a dodge by one tick.
///
/// `trigger` is only consulted while idle; once committed the dodge runs to
/// completion regardless. A trigger while airborne does nothing.
pub fn step_dodge(state: ManeuverState, tick: &DodgeTick, trigger: Option<DodgeAim>) -> DodgeStep {
    match state.phase {
        ManeuverPhase::Idle => match trigger {
            Some(aim) if tick.has_wheel_contact => commit(tick.time, aim),
            _ => DodgeStep::quiet(state),
        },
        ManeuverPhase::Committed | ManeuverPhase::Executing => advance(state, tick),
    }
}

fn commit(time: f32, aim: DodgeAim) -> DodgeStep {
    let (pitch, roll) = aim.stick();
    let state = ManeuverState {
        phase: ManeuverPhase::Committed,
        activation_time: time,
        committed_pitch: pitch,
        committed_roll: roll,
    };
    debug!(time, pitch, roll, "dodge committed");

    DodgeStep {
        state,
        jump: true,
        pitch: None,
        roll: None,
        events: vec![ManeuverEvent::DodgeCommitted { time, pitch, roll }],
    }
}

fn advance(mut state: ManeuverState, tick: &DodgeTick) -> DodgeStep {
    let elapsed = state.elapsed(tick.time);
    if elapsed < DODGE_ARMING_DELAY_S {
        return DodgeStep::quiet(state);
    }

    let mut events = Vec::new();
    if state.phase == ManeuverPhase::Committed {
        state.phase = ManeuverPhase::Executing;
        events.push(ManeuverEvent::DodgeExecuting { time: tick.time });
    }

    let step_pitch = state.committed_pitch;
    let step_roll = state.committed_roll;

    let finished = if tick.has_wheel_contact {
        Some(FinishReason::Landed)
    } else if elapsed >= DODGE_ARMING_DELAY_S + DODGE_MAX_EXECUTION_S {
        Some(FinishReason::TimedOut)
    } else {
        None
    };
    if let Some(reason) = finished {
        debug!(time = tick.time, ?reason, "dodge finished");
        events.push(ManeuverEvent::DodgeFinished {
            time: tick.time,
            reason,
        });
        state = ManeuverState::IDLE;
    }

    DodgeStep {
        state,
        jump: true,
        pitch: Some(step_pitch),
        roll: Some(step_roll),
        events,
    }
}
