use serde::{Deserialize, Serialize};

use crate::constants::{DODGE_MAX_BALL_HEIGHT, DODGE_TRIGGER_DISTANCE, DODGE_TRIGGER_SPEED};
use crate::state::Team;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub id: String,
    #[serde(default)]
    pub team: Team,

    // Aerials are off in the stock profile.
    #[serde(default)]
    pub aerials: bool,

    // Dodge gate
    #[serde(default = "default_dodge_distance")]
    pub dodge_distance: f32,
    #[serde(default = "default_dodge_min_speed")]
    pub dodge_min_speed: f32,
    #[serde(default = "default_dodge_max_ball_height")]
    pub dodge_max_ball_height: f32,

    // Aerial trigger
    #[serde(default = "default_aerial_min_height")]
    pub aerial_min_height: f32,
    #[serde(default = "default_aerial_max_distance")]
    pub aerial_max_distance: f32,
}

fn default_dodge_distance() -> f32 {
    DODGE_TRIGGER_DISTANCE
}

fn default_dodge_min_speed() -> f32 {
    DODGE_TRIGGER_SPEED
}

fn default_dodge_max_ball_height() -> f32 {
    DODGE_MAX_BALL_HEIGHT
}

fn default_aerial_min_height() -> f32 {
    300.0
}

fn default_aerial_max_distance() -> f32 {
    2_000.0
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            id: "anarchy".to_string(),
            team: Team::Blue,
            aerials: false,
            dodge_distance: default_dodge_distance(),
            dodge_min_speed: default_dodge_min_speed(),
            dodge_max_ball_height: default_dodge_max_ball_height(),
            aerial_min_height: default_aerial_min_height(),
            aerial_max_distance: default_aerial_max_distance(),
        }
    }
}

impl AgentConfig {
    pub const PRESETS: [&'static str; 2] = ["anarchy", "aerial"];

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "anarchy" => Some(Self::default()),
            "aerial" => Some(Self {
                id: "aerial".to_string(),
                aerials: true,
                ..Self::default()
            }),
            _ => None,
        }
    }

    pub fn clamp(&mut self) {
        self.dodge_distance = self.dodge_distance.clamp(0.0, 2_000.0);
        self.dodge_min_speed = self.dodge_min_speed.clamp(0.0, 2_300.0);
        self.dodge_max_ball_height = self.dodge_max_ball_height.clamp(0.0, 2_000.0);
        self.aerial_min_height = self.aerial_min_height.clamp(150.0, 2_000.0);
        self.aerial_max_distance = self.aerial_max_distance.clamp(0.0, 6_000.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_named_preset_resolves() {
        for name in AgentConfig::PRESETS {
            let cfg = AgentConfig::preset(name).expect("preset");
            assert_eq!(cfg.id, name);
        }
        assert!(AgentConfig::preset("turbo").is_none());
        assert!(AgentConfig::preset("aerial").unwrap().aerials);
    }

    #[test]
    fn defaults_are_already_in_range() {
        let mut cfg = AgentConfig::default();
        cfg.clamp();
        assert_eq!(cfg, AgentConfig::default());
    }

    #[test]
    fn clamp_pulls_wild_values_back() {
        let mut cfg = AgentConfig {
            dodge_distance: -5.0,
            aerial_min_height: 10.0,
            aerial_max_distance: 1e9,
            ..AgentConfig::default()
        };
        cfg.clamp();
        assert_eq!(cfg.dodge_distance, 0.0);
        assert_eq!(cfg.aerial_min_height, 150.0);
        assert_eq!(cfg.aerial_max_distance, 6_000.0);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: AgentConfig =
            serde_json::from_str(r#"{"id":"custom","team":"orange","aerials":true}"#).unwrap();
        assert_eq!(cfg.team, Team::Orange);
        assert!(cfg.aerials);
        assert_eq!(cfg.dodge_distance, DODGE_TRIGGER_DISTANCE);
        assert_eq!(cfg.aerial_max_distance, 2_000.0);
    }
}
