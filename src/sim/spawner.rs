//! Adversary spawning
//!
//! A frame counter runs while no boss battle is in progress. When it reaches
//! the current interval one adversary enters from a random screen edge and
//! the interval is recomputed from the score.

use glam::Vec2;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use super::geometry::seek;
use super::registry::EntityRegistry;
use super::state::{Adversary, AdversaryKind};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::field_center;
use crate::settings::DifficultyProfile;

pub const SIZE_MIN: u32 = 15;
pub const SIZE_MAX: u32 = 25;

/// Spawn timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawner {
    pub timer: u32,
    pub interval: u32,
}

impl Spawner {
    pub fn new(profile: &DifficultyProfile) -> Self {
        Self {
            timer: 0,
            interval: profile.spawn_base,
        }
    }

    /// Advance one frame; returns the new adversary's id when one spawned
    ///
    /// `guard_score` keeps a second empowered adversary out while the score
    /// is below it.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        profile: &DifficultyProfile,
        score: u32,
        guard_score: u32,
        registry: &mut EntityRegistry,
    ) -> Option<u32> {
        self.timer += 1;
        if self.timer < self.interval {
            return None;
        }
        self.timer = 0;

        let empowered_live = registry.adversaries.iter().any(|a| a.kind.is_empowered());
        let force_grunt = empowered_live && score < guard_score;
        let kind = choose_kind(rng, profile.empowered_chance, force_grunt);
        let at = edge_point(rng);
        let adversary = roll_adversary(rng, profile, kind, at);
        let id = registry.add_adversary(adversary);

        self.interval = profile.spawn_interval(score);
        log::debug!("Spawned {kind:?} #{id}, next in {} ticks", self.interval);
        Some(id)
    }
}

/// Pick a kind: grunt with probability `1 - chance`, else an empowered kind
pub fn choose_kind<R: Rng + ?Sized>(rng: &mut R, chance: f32, force_grunt: bool) -> AdversaryKind {
    if force_grunt {
        return AdversaryKind::Grunt;
    }
    let p = chance.clamp(0.0, 1.0);
    let weights = [1.0 - p, p * 0.33, p * 0.33, p * 0.34];
    match WeightedIndex::new(weights) {
        Ok(dist) => match dist.sample(rng) {
            0 => AdversaryKind::Grunt,
            i => AdversaryKind::EMPOWERED[i - 1],
        },
        Err(_) => AdversaryKind::Grunt,
    }
}

/// Uniform point on a uniformly chosen screen edge
pub fn edge_point<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    match rng.random_range(0..4) {
        0 => Vec2::new(rng.random_range(0.0..=FIELD_WIDTH), 0.0),
        1 => Vec2::new(FIELD_WIDTH, rng.random_range(0.0..=FIELD_HEIGHT)),
        2 => Vec2::new(rng.random_range(0.0..=FIELD_WIDTH), FIELD_HEIGHT),
        _ => Vec2::new(0.0, rng.random_range(0.0..=FIELD_HEIGHT)),
    }
}

/// Roll size, health and speed from the profile and aim at the field center
pub fn roll_adversary<R: Rng + ?Sized>(
    rng: &mut R,
    profile: &DifficultyProfile,
    kind: AdversaryKind,
    pos: Vec2,
) -> Adversary {
    let size = rng.random_range(SIZE_MIN..=SIZE_MAX) as f32;
    let health = rng.random_range(profile.health_min..=profile.health_max.max(profile.health_min));
    let speed = if profile.speed_max > profile.speed_min {
        rng.random_range(profile.speed_min..profile.speed_max)
    } else {
        profile.speed_min
    };
    let mut adversary = Adversary::new(kind, pos, size, health, speed);
    adversary.vel = seek(pos, field_center(), adversary.speed);
    adversary
}
