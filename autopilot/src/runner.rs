use crate::arena::Arena;
use crate::config::HarnessSettings;
use crate::util::seed_to_hex;
use anarchy_core::{ActuatorCommand, Agent, AgentConfig, ManeuverEvent};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::mpsc;

#[derive(Clone, Debug, Serialize)]
pub struct RunMetrics {
    pub config_id: String,
    pub seed: u32,
    pub max_ticks: u32,
    pub ticks: u32,
    pub touches: u32,
    pub first_touch_s: Option<f32>,
    pub closest_approach: f32,
    pub boost_ticks: u32,
    pub jump_ticks: u32,
    pub dodges: u32,
    pub aerials: u32,
    pub double_jumps: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunArtifact {
    pub metrics: RunMetrics,
    pub commands: Vec<ActuatorCommand>,
    pub events: Vec<ManeuverEvent>,
}

pub fn run_agent(
    config: &AgentConfig,
    seed: u32,
    max_ticks: u32,
    settings: &HarnessSettings,
) -> Result<RunArtifact> {
    let mut agent = Agent::new(config.clone());
    run_agent_instance(&mut agent, seed, max_ticks, settings)
}

/// Drive `agent` through one seeded arena from a clean maneuver state.
/// Replaces any event listener the agent already had.
pub fn run_agent_instance(
    agent: &mut Agent,
    seed: u32,
    max_ticks: u32,
    settings: &HarnessSettings,
) -> Result<RunArtifact> {
    if max_ticks == 0 {
        return Err(anyhow!("max_ticks must be > 0"));
    }

    agent.reset();
    let (tx, rx) = mpsc::channel();
    agent.on_event(move |event| {
        // Receiver outlives the run; a closed channel only means nobody is counting.
        let _ = tx.send(*event);
    });

    let mut arena = Arena::new(seed, agent.config().team, settings);
    let mut commands = Vec::with_capacity(max_ticks as usize);
    let mut touches = 0u32;
    let mut first_touch_s = None;
    let mut closest_approach = arena.car_ball_distance();

    for tick in 0..max_ticks {
        let snapshot = arena.snapshot();
        let forecast = arena
            .forecast(settings.forecast_horizon_s)
            .with_context(|| format!("ball forecast rejected at tick {tick} (seed={seed:#x})"))?;
        let command = agent.next_command(&snapshot, &forecast);
        if arena.step(&command) {
            touches += 1;
            if first_touch_s.is_none() {
                first_touch_s = Some(arena.time());
            }
        }
        closest_approach = closest_approach.min(arena.car_ball_distance());
        commands.push(command);
    }

    let events: Vec<ManeuverEvent> = rx.try_iter().collect();

    let metrics = RunMetrics {
        config_id: agent.config().id.clone(),
        seed,
        max_ticks,
        ticks: commands.len() as u32,
        touches,
        first_touch_s,
        closest_approach,
        boost_ticks: commands.iter().filter(|c| c.boost).count() as u32,
        jump_ticks: commands.iter().filter(|c| c.jump).count() as u32,
        dodges: count_events(&events, |e| matches!(e, ManeuverEvent::DodgeCommitted { .. })),
        aerials: count_events(&events, |e| matches!(e, ManeuverEvent::AerialLaunched { .. })),
        double_jumps: count_events(&events, |e| matches!(e, ManeuverEvent::DoubleJump { .. })),
    };

    tracing::info!(
        config = %metrics.config_id,
        seed = %seed_to_hex(seed),
        ticks = metrics.ticks,
        touches = metrics.touches,
        closest = metrics.closest_approach,
        "run finished"
    );

    Ok(RunArtifact {
        metrics,
        commands,
        events,
    })
}

fn count_events(events: &[ManeuverEvent], pred: impl Fn(&ManeuverEvent) -> bool) -> u32 {
    events.iter().filter(|event| pred(event)).count() as u32
}

pub fn write_artifact(path: &Path, artifact: &RunArtifact) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    let encoded = serde_json::to_vec_pretty(artifact).context("failed to serialize run artifact")?;
    fs::write(path, encoded).with_context(|| format!("failed writing {}", path.display()))
}
