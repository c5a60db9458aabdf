//! Simulation state and entity types
//!
//! Everything the frame driver mutates lives in `SimulationState`. Randomness
//! comes only from its seeded `Pcg32`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cooldown::Cooldown;
use super::crew::CrewRoster;
use super::events::{EventQueue, GameEvent};
use super::geometry::{circles_overlap, seek};
use super::phase::GamePhase;
use super::progression::Progression;
use super::registry::EntityRegistry;
use super::spawner::Spawner;
use crate::audio::SoundCue;
use crate::consts::*;
use crate::settings::{Difficulty, DifficultyProfile, Settings};
use crate::{clamp_to_field, field_center};

/// Fixed-point hit points, stored in hundredths
///
/// Whole-number health and fractional per-tick damage stay exact. Damage
/// saturates at zero.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Hp(u32);

impl Hp {
    pub const ZERO: Hp = Hp(0);

    pub const fn whole(points: u32) -> Self {
        Hp(points.saturating_mul(100))
    }

    /// Round a fractional amount to the nearest hundredth (negative or NaN is zero)
    pub fn from_points(points: f32) -> Self {
        if points.is_nan() || points <= 0.0 {
            return Hp::ZERO;
        }
        Hp((points * 100.0).round().min(u32::MAX as f32) as u32)
    }

    pub const fn hundredths(self) -> u32 {
        self.0
    }

    pub fn as_points(self) -> f32 {
        self.0 as f32 / 100.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Subtract damage; returns true when this depleted the pool
    pub fn take(&mut self, damage: Hp) -> bool {
        self.0 = self.0.saturating_sub(damage.0);
        self.0 == 0
    }
}

/// The player avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Basic attack (punch) cooldown
    pub basic: Cooldown,
    /// Special ability (power field) cooldown
    pub special: Cooldown,
    /// Power mode expiry; running means active
    pub power_mode: Cooldown,
    pub combo: u32,
    /// Combo resets when this lapses
    pub combo_timer: Cooldown,
    /// Point the avatar walks toward, if any
    pub move_target: Option<Vec2>,
    /// Unit direction of the last press or step; starts facing up
    pub facing: Vec2,
}

impl Player {
    pub fn new(special_cooldown: u32) -> Self {
        Self {
            pos: field_center(),
            radius: PLAYER_RADIUS,
            basic: Cooldown::ready_at(BASIC_ATTACK_COOLDOWN),
            special: Cooldown::ready_at(special_cooldown),
            power_mode: Cooldown::default(),
            combo: 0,
            combo_timer: Cooldown::ready_at(COMBO_WINDOW_TICKS),
            move_target: None,
            facing: Vec2::NEG_Y,
        }
    }

    /// Turn toward a point; a point on the avatar keeps the old facing
    pub fn face(&mut self, point: Vec2) {
        if let Some(dir) = (point - self.pos).try_normalize() {
            self.facing = dir;
        }
    }

    /// Where an ability aims when no pointer is given
    pub fn facing_point(&self) -> Vec2 {
        self.pos + self.facing * BEAM_REACH
    }

    /// Advance every player timer by one frame
    pub fn tick_timers(&mut self) {
        self.basic.tick();
        self.special.tick();
        self.power_mode.tick();
        if self.combo_timer.is_running() {
            self.combo_timer.tick();
            if self.combo_timer.ready() {
                self.combo = 0;
            }
        }
    }

    pub fn register_defeat(&mut self) {
        self.combo += 1;
        self.combo_timer.start();
    }

    pub fn power_mode_active(&self) -> bool {
        self.power_mode.is_running()
    }

    pub fn activate_power_mode(&mut self, ticks: u32) {
        self.power_mode.start_for(ticks);
    }

    /// Walk toward the move target, clearing it on arrival
    pub fn step_movement(&mut self) {
        let Some(target) = self.move_target else {
            return;
        };
        let target = clamp_to_field(target);
        self.face(target);
        let to_target = target - self.pos;
        if to_target.length() <= PLAYER_MOVE_SPEED {
            self.pos = target;
            self.move_target = None;
        } else {
            self.pos = clamp_to_field(self.pos + seek(self.pos, target, PLAYER_MOVE_SPEED));
        }
    }
}

/// Adversary variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdversaryKind {
    Grunt,
    /// Tougher (+1 health)
    Blazer,
    /// Faster (speed x1.2)
    Sprinter,
    /// Bigger and tougher (size +10, +1 health)
    Brute,
}

impl AdversaryKind {
    pub const EMPOWERED: [AdversaryKind; 3] = [
        AdversaryKind::Blazer,
        AdversaryKind::Sprinter,
        AdversaryKind::Brute,
    ];

    pub fn is_empowered(&self) -> bool {
        !matches!(self, AdversaryKind::Grunt)
    }

    pub fn health_bonus(&self) -> u32 {
        match self {
            AdversaryKind::Blazer | AdversaryKind::Brute => 1,
            AdversaryKind::Grunt | AdversaryKind::Sprinter => 0,
        }
    }

    pub fn speed_multiplier(&self) -> f32 {
        match self {
            AdversaryKind::Sprinter => 1.2,
            _ => 1.0,
        }
    }

    pub fn size_bonus(&self) -> f32 {
        match self {
            AdversaryKind::Brute => 10.0,
            _ => 0.0,
        }
    }

    /// Base RGB tint for renderers
    pub fn tint(&self) -> [u8; 3] {
        match self {
            AdversaryKind::Grunt => [200, 60, 60],
            AdversaryKind::Blazer => [255, 140, 0],
            AdversaryKind::Sprinter => [80, 160, 255],
            AdversaryKind::Brute => [90, 90, 90],
        }
    }
}

/// Where an adversary came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnOrigin {
    /// Regular spawner, entered from a screen edge
    Edge,
    /// Called in by a boss
    Summoned,
}

/// A regular enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adversary {
    pub id: u32,
    pub kind: AdversaryKind,
    pub origin: SpawnOrigin,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub health: Hp,
    pub speed: f32,
    pub immobilized: Cooldown,
    pub frozen: Cooldown,
}

impl Adversary {
    /// Build an adversary from base rolls, applying the kind's modifiers
    pub fn new(kind: AdversaryKind, pos: Vec2, base_size: f32, base_health: u32, base_speed: f32) -> Self {
        Self {
            id: 0,
            kind,
            origin: SpawnOrigin::Edge,
            pos,
            vel: Vec2::ZERO,
            size: base_size + kind.size_bonus(),
            health: Hp::whole(base_health + kind.health_bonus()),
            speed: base_speed * kind.speed_multiplier(),
            immobilized: Cooldown::default(),
            frozen: Cooldown::default(),
        }
    }

    pub fn immobilize(&mut self, ticks: u32) {
        self.immobilized.start_for(ticks);
    }

    pub fn freeze(&mut self, ticks: u32) {
        self.frozen.start_for(ticks);
    }

    /// Under a status effect that suspends movement
    pub fn is_held(&self) -> bool {
        self.immobilized.is_running() || self.frozen.is_running()
    }

    /// One frame of movement toward `target`
    ///
    /// A held adversary only counts its status timers down; the frame its
    /// last timer lapses it still stands still.
    pub fn advance(&mut self, target: Vec2) {
        if self.is_held() {
            self.immobilized.tick();
            self.frozen.tick();
            self.vel = Vec2::ZERO;
            return;
        }
        self.vel = seek(self.pos, target, self.speed);
        self.pos += self.vel;
    }

    /// Apply damage; returns true when this defeated the adversary
    pub fn take_damage(&mut self, damage: Hp) -> bool {
        self.health.take(damage)
    }

    pub fn touches(&self, center: Vec2, radius: f32) -> bool {
        circles_overlap(self.pos, self.size, center, radius)
    }
}

/// Power-up variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Remove every live adversary
    AreaClear,
    /// Timed power mode
    PowerMode,
    /// Move to the next stage and call its boss
    StageAdvance,
    /// Flat score bonus
    BonusScore,
    /// Unlock a random locked crew unit
    CrewUnlock,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::AreaClear,
        PowerUpKind::PowerMode,
        PowerUpKind::StageAdvance,
        PowerUpKind::BonusScore,
        PowerUpKind::CrewUnlock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::AreaClear => "Area Clear",
            PowerUpKind::PowerMode => "Power Mode",
            PowerUpKind::StageAdvance => "Stage Advance",
            PowerUpKind::BonusScore => "Bonus Score",
            PowerUpKind::CrewUnlock => "Crew Unlock",
        }
    }
}

/// A collectible dropped by a defeated adversary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub radius: f32,
    /// Set on pickup or expiry; removed the same frame
    pub collected: bool,
    pub lifetime: Cooldown,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, pos: Vec2) -> Self {
        Self {
            id: 0,
            kind,
            pos,
            radius: POWER_UP_RADIUS,
            collected: false,
            lifetime: Cooldown::running(POWER_UP_LIFETIME_TICKS),
        }
    }

    pub fn update(&mut self) {
        self.lifetime.tick();
        if self.lifetime.ready() {
            self.collected = true;
        }
    }

    pub fn is_live(&self) -> bool {
        !self.collected
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub settings: Settings,
    pub difficulty: Difficulty,
    pub profile: DifficultyProfile,
    pub phase: GamePhase,
    /// Frames simulated while playing
    pub time_ticks: u64,
    pub player: Player,
    pub registry: EntityRegistry,
    pub spawner: Spawner,
    pub progression: Progression,
    pub crew: CrewRoster,
    pub events: EventQueue,
}

impl SimulationState {
    /// Fresh state sitting in the menu
    pub fn new(seed: u64, settings: Settings) -> Self {
        let difficulty = settings.difficulty;
        let profile = difficulty.profile();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            difficulty,
            profile,
            phase: GamePhase::Menu,
            time_ticks: 0,
            player: Player::new(profile.special_cooldown),
            registry: EntityRegistry::default(),
            spawner: Spawner::new(&profile),
            progression: Progression::default(),
            crew: CrewRoster::default(),
            events: EventQueue::default(),
        }
    }

    pub fn score(&self) -> u32 {
        self.progression.score
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.profile = difficulty.profile();
    }

    /// Clear everything a new match must not inherit
    ///
    /// Unlocked crew and the active crew selection survive.
    pub fn reset_session(&mut self) {
        self.time_ticks = 0;
        self.player = Player::new(self.profile.special_cooldown);
        self.registry.clear();
        self.spawner = Spawner::new(&self.profile);
        self.progression.reset();
        self.crew.reset_cooldowns();
    }

    /// Add score, then unlock any crew whose threshold was reached
    pub fn award_score(&mut self, points: u32) {
        if points == 0 {
            return;
        }
        self.progression.add_score(points);
        self.check_crew_unlocks();
    }

    pub fn check_crew_unlocks(&mut self) {
        for index in self.crew.unlock_for_score(self.progression.score) {
            self.announce_unlock(index);
        }
    }

    pub(crate) fn announce_unlock(&mut self, index: usize) {
        let name = self.crew.units[index].name;
        log::info!("{name} joined the crew");
        self.events.emit(GameEvent::CrewUnlocked { index, name });
        self.events.cue(SoundCue::CrewUnlocked);
    }

    /// Keep entity order stable across removals
    pub fn normalize_order(&mut self) {
        self.registry.normalize_order();
    }
}
