//! Simulation configuration
//!
//! Every tunable the actors read lives here and is handed to them at
//! construction. Files may be RON or JSON; missing fields fall back to the
//! defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ai::NpcConfig;
use crate::animation::AnimationConfig;
use crate::physics::{CapsuleConfig, MovementConfig, SweepSettings};

/// Errors raised while loading or saving a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid RON config: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("could not write RON config: {0}")]
    RonSerialize(#[from] ron::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

/// All actor tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed simulation rate (ticks per second)
    pub tick_rate: u32,
    pub animation: AnimationConfig,
    pub movement: MovementConfig,
    pub capsule: CapsuleConfig,
    pub sweep: SweepSettings,
    pub npc: NpcConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            animation: AnimationConfig::default(),
            movement: MovementConfig::default(),
            capsule: CapsuleConfig::default(),
            sweep: SweepSettings::default(),
            npc: NpcConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Seconds per tick
    #[must_use]
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Set the fixed tick rate
    pub fn with_tick_rate(mut self, tick_rate: u32) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }

    pub fn with_movement(mut self, movement: MovementConfig) -> Self {
        self.movement = movement;
        self
    }

    pub fn with_capsule(mut self, capsule: CapsuleConfig) -> Self {
        self.capsule = capsule;
        self
    }

    pub fn with_sweep(mut self, sweep: SweepSettings) -> Self {
        self.sweep = sweep;
        self
    }

    pub fn with_npc(mut self, npc: NpcConfig) -> Self {
        self.npc = npc;
        self
    }

    /// Parse from a RON string
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Parse from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize to pretty RON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Load a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_ron_str(&fs::read_to_string(path)?)
    }

    /// Load a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Load a file, picking the format from its extension (`.json` or RON)
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = if path.extension().is_some_and(|ext| ext == "json") {
            Self::load_json(path)?
        } else {
            Self::load_ron(path)?
        };
        log::info!("loaded simulation config from {}", path.display());
        Ok(config)
    }

    /// Save as a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.animation.crossfade_duration, 0.5);
        assert_eq!(config.animation.attack_playback_speed, 1.5);
        assert_eq!(config.npc.rotation_deadzone, 0.6);
        assert_eq!(config.movement.fall_threshold, -5.0);
        assert!((config.dt() - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = SimulationConfig::default()
            .with_tick_rate(30)
            .with_npc(NpcConfig::default().with_detection_range(40.0));

        let text = config.to_ron_string().unwrap();
        let loaded = SimulationConfig::from_ron_str(&text).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let loaded = SimulationConfig::from_ron_str(
            "(npc: (attack_range: 6.0, attack_cooldown: 3.0), movement: (run_speed: 12.0))",
        )
        .unwrap();

        assert_eq!(loaded.npc.attack_range, 6.0);
        assert_eq!(loaded.npc.attack_cooldown, 3.0);
        assert_eq!(loaded.npc.detection_range, 20.0);
        assert_eq!(loaded.movement.run_speed, 12.0);
        assert_eq!(loaded.movement.move_speed, 5.0);
        assert_eq!(loaded.tick_rate, 60);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let loaded =
            SimulationConfig::from_json_str(r#"{"sweep": {"max_slope_climb_angle": 50.0}}"#)
                .unwrap();
        assert_eq!(loaded.sweep.max_slope_climb_angle, 50.0);
        assert_eq!(loaded.sweep.offset, 0.01);
    }

    #[test]
    fn test_invalid_ron_is_reported() {
        let err = SimulationConfig::from_ron_str("(tick_rate: \"fast\")").unwrap_err();
        assert!(matches!(err, ConfigError::Ron(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SimulationConfig::load("/nonexistent/simulation.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
