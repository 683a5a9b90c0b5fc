use anarchy_autopilot::config::{preset_or_err, HarnessSettings};
use anarchy_autopilot::runner::{run_agent, run_agent_instance};
use anarchy_core::{Agent, AgentConfig, ManeuverEvent};
use anyhow::Result;

#[test]
fn every_preset_runs_and_stays_in_bounds() -> Result<()> {
    let settings = HarnessSettings::default();
    for name in AgentConfig::PRESETS {
        let config = preset_or_err(name)?;
        let artifact = run_agent(&config, 0xDEAD_BEEF, 360, &settings)?;
        assert_eq!(artifact.metrics.ticks, 360, "preset={name}");
        assert_eq!(artifact.commands.len(), 360);
        assert!(artifact.commands.iter().all(|c| c.is_within_bounds()), "preset={name}");
        let launched = artifact
            .events
            .iter()
            .filter(|e| matches!(e, ManeuverEvent::AerialLaunched { .. }))
            .count() as u32;
        assert_eq!(launched, artifact.metrics.aerials);
        if !config.aerials {
            assert_eq!(artifact.metrics.aerials, 0);
        }
    }
    Ok(())
}

#[test]
fn same_seed_replays_identically() -> Result<()> {
    let settings = HarnessSettings::default();
    let config = AgentConfig::default();
    let a = run_agent(&config, 77, 480, &settings)?;
    let b = run_agent(&config, 77, 480, &settings)?;
    assert_eq!(a.commands, b.commands);
    assert_eq!(a.events, b.events);
    assert_eq!(a.metrics.closest_approach, b.metrics.closest_approach);
    Ok(())
}

#[test]
fn the_car_closes_in_on_the_ball() -> Result<()> {
    let settings = HarnessSettings::default();
    let mut agent = Agent::new(AgentConfig::default());
    let mut closed_in = 0;
    let mut boost_ticks = 0;
    for seed in [1u32, 2, 3, 4] {
        let artifact = run_agent_instance(&mut agent, seed, 1_200, &settings)?;
        let metrics = &artifact.metrics;
        if metrics.touches > 0 || metrics.closest_approach < 1_000.0 {
            closed_in += 1;
        }
        boost_ticks += metrics.boost_ticks;
    }
    assert!(closed_in >= 1, "closed_in={closed_in}");
    assert!(boost_ticks > 0);
    Ok(())
}

#[test]
fn zero_ticks_is_rejected() {
    let settings = HarnessSettings::default();
    assert!(run_agent(&AgentConfig::default(), 1, 0, &settings).is_err());
}
