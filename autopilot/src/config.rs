use anarchy_core::AgentConfig;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::env;
use std::fs;
use std::path::Path;

pub const DEFAULT_TICK_RATE: u32 = 120;
pub const DEFAULT_FORECAST_HORIZON_S: f32 = 6.0;
/// Forecast sample spacing, independent of the control tick rate.
pub const FORECAST_RATE: u32 = 60;

/// Simulation knobs read from the environment once per process.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HarnessSettings {
    pub tick_rate: u32,
    pub forecast_horizon_s: f32,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            forecast_horizon_s: DEFAULT_FORECAST_HORIZON_S,
        }
    }
}

impl HarnessSettings {
    pub fn from_env() -> Self {
        Self {
            tick_rate: read_env_u32("ANARCHY_TICK_RATE", DEFAULT_TICK_RATE),
            forecast_horizon_s: read_env_f32("ANARCHY_FORECAST_HORIZON", DEFAULT_FORECAST_HORIZON_S),
        }
    }

    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

/// Samples needed to cover `horizon_s` at the forecast rate, at least one.
pub fn forecast_sample_count(horizon_s: f32) -> usize {
    ((horizon_s * FORECAST_RATE as f32).ceil() as usize).max(1)
}

pub(crate) fn read_env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

pub(crate) fn read_env_f32(name: &str, default: f32) -> f32 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<f32>().ok())
        .filter(|value| value.is_finite() && *value > 0.0)
        .unwrap_or(default)
}

/// Resolve the agent profile from a JSON file or a named preset (not both).
/// Falls back to the stock profile when neither is given.
pub fn load_agent_config(path: Option<&Path>, preset: Option<&str>) -> Result<AgentConfig> {
    let config = match (path, preset) {
        (Some(_), Some(_)) => return Err(anyhow!("--config and --preset are mutually exclusive")),
        (Some(path), None) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed reading config {}", path.display()))?;
            serde_json::from_str::<AgentConfig>(&raw)
                .with_context(|| format!("failed parsing config {}", path.display()))?
        }
        (None, Some(name)) => preset_or_err(name)?,
        (None, None) => AgentConfig::default(),
    };
    Ok(clamp_with_warning(config))
}

pub fn preset_or_err(name: &str) -> Result<AgentConfig> {
    AgentConfig::preset(name).ok_or_else(|| {
        let available = AgentConfig::PRESETS.join(", ");
        anyhow!("unknown preset '{name}'. available: {available}")
    })
}

pub fn clamp_with_warning(mut config: AgentConfig) -> AgentConfig {
    let before = config.clone();
    config.clamp();
    if config != before {
        tracing::warn!(id = %config.id, "agent config values were out of range and have been clamped");
    }
    config
}

/// Comma-separated preset names, or every preset when absent.
pub fn resolve_presets(input: Option<&str>) -> Result<Vec<AgentConfig>> {
    let Some(raw) = input else {
        return AgentConfig::PRESETS.iter().map(|name| preset_or_err(name)).collect();
    };
    let mut configs = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        configs.push(preset_or_err(token)?);
    }
    if configs.is_empty() {
        return Err(anyhow!("--presets resolved to empty list"));
    }
    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_sample_count_covers_horizon() {
        let settings = HarnessSettings::default();
        assert_eq!(forecast_sample_count(settings.forecast_horizon_s), 360);
        assert_eq!(forecast_sample_count(0.0), 1);
        assert!((settings.tick_dt() - 1.0 / 120.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_preset_lists_alternatives() {
        let err = preset_or_err("zoom").unwrap_err().to_string();
        assert!(err.contains("anarchy"));
        assert!(err.contains("aerial"));
    }

    #[test]
    fn preset_list_parses_and_rejects_empty() {
        let configs = resolve_presets(Some("aerial, anarchy")).unwrap();
        assert_eq!(configs.len(), 2);
        assert!(configs[0].aerials);
        assert!(resolve_presets(Some(" , ")).is_err());
        assert_eq!(resolve_presets(None).unwrap().len(), AgentConfig::PRESETS.len());
    }

    #[test]
    fn config_and_preset_together_is_an_error() {
        assert!(load_agent_config(Some(Path::new("x.json")), Some("anarchy")).is_err());
        assert_eq!(load_agent_config(None, None).unwrap(), AgentConfig::default());
    }
}
