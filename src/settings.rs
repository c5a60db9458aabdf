//! Difficulty presets and tunable balance constants
//!
//! Difficulty profiles are fixed per level. Everything else lives in
//! `Settings`, which can be loaded from a JSON file with missing fields
//! falling back to defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment difficulty, chosen before play begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Spawn, adversary and ability parameters for this level
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                spawn_base: 120,
                spawn_floor: 60,
                spawn_divisor: 20,
                speed_min: 0.5,
                speed_max: 1.2,
                health_min: 1,
                health_max: 2,
                empowered_chance: 0.05,
                special_cooldown: 180,
            },
            Difficulty::Medium => DifficultyProfile {
                spawn_base: 90,
                spawn_floor: 45,
                spawn_divisor: 15,
                speed_min: 0.8,
                speed_max: 1.8,
                health_min: 1,
                health_max: 2,
                empowered_chance: 0.15,
                special_cooldown: 240,
            },
            Difficulty::Hard => DifficultyProfile {
                spawn_base: 60,
                spawn_floor: 30,
                spawn_divisor: 10,
                speed_min: 1.0,
                speed_max: 2.2,
                health_min: 1,
                health_max: 3,
                empowered_chance: 0.25,
                special_cooldown: 300,
            },
        }
    }
}

/// Per-difficulty numbers consumed by the spawner and the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Spawn interval before any score (ticks)
    pub spawn_base: u32,
    /// Spawn interval never drops below this (ticks)
    pub spawn_floor: u32,
    /// Score points per tick of interval reduction
    pub spawn_divisor: u32,
    /// Adversary speed range (pixels/tick)
    pub speed_min: f32,
    pub speed_max: f32,
    /// Base adversary health range (inclusive)
    pub health_min: u32,
    pub health_max: u32,
    /// Probability that a spawn is an empowered variant
    pub empowered_chance: f32,
    /// Player special ability cooldown (ticks)
    pub special_cooldown: u32,
}

impl DifficultyProfile {
    /// Spawn interval for the given score
    pub fn spawn_interval(&self, score: u32) -> u32 {
        self.spawn_base
            .saturating_sub(score / self.spawn_divisor.max(1))
            .max(self.spawn_floor)
    }
}

/// Tunable balance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty used when a session starts without an explicit choice
    pub difficulty: Difficulty,
    /// Chance that a defeated adversary drops a power-up
    pub power_up_drop_chance: f64,
    /// Damage the power field deals per tick to an overlapping adversary
    pub field_damage_per_tick: f32,
    /// A boss appears whenever score reaches a positive multiple of this
    pub boss_score_interval: u32,
    /// Score awarded for defeating a boss
    pub boss_defeat_bonus: u32,
    /// Duration of power mode (ticks)
    pub power_mode_ticks: u32,
    /// Bonus-score power-up range (inclusive)
    pub bonus_score_min: u32,
    pub bonus_score_max: u32,
    /// Score granted by a crew-unlock power-up when everyone is unlocked
    pub crew_unlock_fallback_bonus: u32,
    /// Below this score only one empowered adversary may be live at a time
    pub empowered_guard_score: u32,
    /// Opt-in: boss body and boss attacks also end the match on contact
    pub boss_contact_lethal: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            power_up_drop_chance: 0.1,
            field_damage_per_tick: 0.05,
            boss_score_interval: 50,
            boss_defeat_bonus: 20,
            power_mode_ticks: 600,
            bonus_score_min: 5,
            bonus_score_max: 15,
            crew_unlock_fallback_bonus: 10,
            empowered_guard_score: 10,
            boss_contact_lethal: false,
        }
    }
}

impl Settings {
    /// Settings with a specific difficulty and default tunables
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.power_up_drop_chance) {
            return Err(ConfigError::Invalid {
                field: "power_up_drop_chance",
                reason: format!("{} is not a probability", self.power_up_drop_chance),
            });
        }
        if !self.field_damage_per_tick.is_finite() || self.field_damage_per_tick < 0.0 {
            return Err(ConfigError::Invalid {
                field: "field_damage_per_tick",
                reason: format!("{} must be a non-negative number", self.field_damage_per_tick),
            });
        }
        // Health is tracked in hundredths; the rate must be a whole, nonzero count of them
        let hundredths = f64::from(self.field_damage_per_tick) * 100.0;
        if hundredths.round() < 1.0 || (hundredths - hundredths.round()).abs() > 1e-3 {
            return Err(ConfigError::Invalid {
                field: "field_damage_per_tick",
                reason: format!(
                    "{} must be a positive multiple of 0.01",
                    self.field_damage_per_tick
                ),
            });
        }
        if self.boss_score_interval == 0 {
            return Err(ConfigError::Invalid {
                field: "boss_score_interval",
                reason: "must be positive".to_string(),
            });
        }
        if self.bonus_score_min > self.bonus_score_max {
            return Err(ConfigError::Invalid {
                field: "bonus_score_min",
                reason: format!(
                    "{} exceeds bonus_score_max {}",
                    self.bonus_score_min, self.bonus_score_max
                ),
            });
        }
        Ok(())
    }

    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults (with a warning) on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({e})");
                Self::default()
            }
        }
    }
}
