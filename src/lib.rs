//! Tideclash - an arcade brawler simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, combat, bosses, game phases)
//! - `settings`: Difficulty presets and data-driven balance
//! - `audio`: Abstract sound cues emitted by the simulation
//! - `platform`: Renderer/audio seams and their headless implementations
//! - `error`: Configuration errors

pub mod audio;
pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{Difficulty, DifficultyProfile, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per rendered frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Field dimensions (pixels, origin top-left, y down)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 35.0;
    pub const PLAYER_MOVE_SPEED: f32 = 4.0;
    pub const BASIC_ATTACK_COOLDOWN: u32 = 8;
    pub const COMBO_WINDOW_TICKS: u32 = 60;

    /// Power-ups
    pub const POWER_UP_RADIUS: f32 = 15.0;
    pub const POWER_UP_LIFETIME_TICKS: u32 = 600;

    /// Bosses spawn here when a boss battle begins
    pub const BOSS_SPAWN_X: f32 = FIELD_WIDTH / 2.0;
    pub const BOSS_SPAWN_Y: f32 = FIELD_HEIGHT / 4.0;
    pub const BOSS_SEEK_SPEED: f32 = 1.0;

    /// Beams reach past any edge of the field
    pub const BEAM_REACH: f32 = 1000.0;
}

/// Center of the playing field; adversaries spawn aimed at it
#[inline]
pub fn field_center() -> Vec2 {
    Vec2::new(consts::FIELD_WIDTH / 2.0, consts::FIELD_HEIGHT / 2.0)
}

/// True when the point lies inside the field (edges inclusive)
#[inline]
pub fn in_field(pos: Vec2) -> bool {
    pos.x >= 0.0 && pos.x <= consts::FIELD_WIDTH && pos.y >= 0.0 && pos.y <= consts::FIELD_HEIGHT
}

/// Clamp a point to the field
#[inline]
pub fn clamp_to_field(pos: Vec2) -> Vec2 {
    Vec2::new(
        pos.x.clamp(0.0, consts::FIELD_WIDTH),
        pos.y.clamp(0.0, consts::FIELD_HEIGHT),
    )
}

/// Unit vector for an angle measured from +x toward +y
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
