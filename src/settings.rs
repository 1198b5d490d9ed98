//! Gameplay settings
//!
//! Loaded from a JSON file by the host. Every field falls back to the
//! matching constant in [`crate::consts`], so a file only needs the values
//! it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Tunable gameplay values
///
/// Deserializing always validates, so a loaded `Settings` is runnable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SettingsFile")]
pub struct Settings {
    /// Bullet speed for both player and enemies (units/s)
    pub bullet_speed: f64,
    /// Player walk distance per frame
    pub walk_speed: f64,
    /// Mouse look sensitivity
    pub look_speed: f64,
    /// Hits the player can take
    pub player_health: u8,
    /// Body hits an enemy can take
    pub enemy_health: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bullet_speed: BULLET_SPEED,
            walk_speed: WALK_SPEED,
            look_speed: LOOK_AROUND_SPEED,
            player_health: PLAYER_START_HEALTH,
            enemy_health: ENEMY_START_HEALTH,
        }
    }
}

/// On-disk form: every field optional, checked before it becomes `Settings`
#[derive(Deserialize)]
#[serde(default)]
struct SettingsFile {
    bullet_speed: f64,
    walk_speed: f64,
    look_speed: f64,
    player_health: u8,
    enemy_health: u8,
}

impl Default for SettingsFile {
    fn default() -> Self {
        let d = Settings::default();
        Self {
            bullet_speed: d.bullet_speed,
            walk_speed: d.walk_speed,
            look_speed: d.look_speed,
            player_health: d.player_health,
            enemy_health: d.enemy_health,
        }
    }
}

impl TryFrom<SettingsFile> for Settings {
    type Error = ConfigError;

    fn try_from(file: SettingsFile) -> Result<Self, Self::Error> {
        let settings = Settings {
            bullet_speed: file.bullet_speed,
            walk_speed: file.walk_speed,
            look_speed: file.look_speed,
            player_health: file.player_health,
            enemy_health: file.enemy_health,
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl Settings {
    /// Parse settings from JSON text and validate them
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let file: SettingsFile = serde_json::from_str(json)?;
        Settings::try_from(file)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write a settings file that [`Settings::load`] reads back
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Wrote settings to {}", path.display());
        Ok(())
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.bullet_speed) {
            return Err(ConfigError::Invalid {
                field: "bullet_speed",
                reason: "must be finite and greater than zero",
            });
        }
        if !positive(self.walk_speed) {
            return Err(ConfigError::Invalid {
                field: "walk_speed",
                reason: "must be finite and greater than zero",
            });
        }
        if !positive(self.look_speed) {
            return Err(ConfigError::Invalid {
                field: "look_speed",
                reason: "must be finite and greater than zero",
            });
        }
        if self.player_health == 0 {
            return Err(ConfigError::Invalid {
                field: "player_health",
                reason: "must be at least 1",
            });
        }
        if self.enemy_health == 0 {
            return Err(ConfigError::Invalid {
                field: "enemy_health",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}
