//! Crew roster and crew abilities
//!
//! Crew units unlock at score thresholds (or from a power-up). The active
//! unit's ability fires on the activation key when its cooldown triggers.
//! Abilities see the world only through `AbilityContext`.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;

use super::attack::{Attack, AttackOwner, SLASH_REACH};
use super::cooldown::Cooldown;
use super::registry::EntityIds;
use super::state::{Adversary, Hp};
use crate::direction_from_angle;

pub const BIND_TICKS: u32 = 180;
pub const FREEZE_TICKS: u32 = 120;

/// Crew ability variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CrewAbility {
    /// Three slashes fanned a third of a turn apart
    TripleSlash,
    /// A strike on every live adversary
    ChainLightning,
    /// Five stars fanned upward
    SpreadShot,
    /// Expanding fire circle around the player
    FlameSpin,
    /// Remove every adversary, one point each
    Remedy,
    /// Immobilize every adversary
    Bind,
    /// Beam toward the pointer
    CannonBeam,
    /// Freeze every adversary
    SoulFreeze,
    /// Expanding ring that shoves adversaries away
    TidalWave,
}

impl CrewAbility {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrewAbility::TripleSlash => "Triple Slash",
            CrewAbility::ChainLightning => "Chain Lightning",
            CrewAbility::SpreadShot => "Spread Shot",
            CrewAbility::FlameSpin => "Flame Spin",
            CrewAbility::Remedy => "Remedy",
            CrewAbility::Bind => "Bind",
            CrewAbility::CannonBeam => "Cannon Beam",
            CrewAbility::SoulFreeze => "Soul Freeze",
            CrewAbility::TidalWave => "Tidal Wave",
        }
    }

    /// Produce the ability's effect
    pub fn cast(self, ctx: &mut AbilityContext<'_>) {
        let from = ctx.player_pos;
        match self {
            CrewAbility::TripleSlash => {
                for angle in [0.0, TAU / 3.0, 2.0 * TAU / 3.0] {
                    let end = from + direction_from_angle(angle) * SLASH_REACH;
                    ctx.spawn_attack(Attack::slash(from, end));
                }
            }
            CrewAbility::ChainLightning => {
                let targets: Vec<Vec2> = ctx.adversaries.iter().map(|a| a.pos).collect();
                for at in targets {
                    ctx.spawn_attack(Attack::strike(AttackOwner::Crew, at, 30.0, 0, 30, Hp::whole(3)));
                }
            }
            CrewAbility::SpreadShot => {
                for i in 0..5 {
                    let angle = PI / 2.0 - PI / 6.0 * (i as f32 - 2.0);
                    // fan opens upward (screen y grows down)
                    let dir = Vec2::new(angle.cos(), -angle.sin());
                    ctx.spawn_attack(Attack::projectile(
                        AttackOwner::Crew,
                        from,
                        dir,
                        10.0,
                        8.0,
                        Hp::whole(1),
                    ));
                }
            }
            CrewAbility::FlameSpin => {
                ctx.spawn_attack(Attack::area(
                    AttackOwner::Crew,
                    from,
                    0.0,
                    150.0,
                    10.0,
                    None,
                    0.0,
                    Hp::whole(2),
                ));
            }
            CrewAbility::Remedy => {
                let cleared = ctx.adversaries.len() as u32;
                ctx.adversaries.clear();
                *ctx.score = ctx.score.saturating_add(cleared);
            }
            CrewAbility::Bind => {
                for adversary in ctx.adversaries.iter_mut() {
                    adversary.immobilize(BIND_TICKS);
                }
            }
            CrewAbility::CannonBeam => ctx.spawn_attack(Attack::beam(from, ctx.aim)),
            CrewAbility::SoulFreeze => {
                for adversary in ctx.adversaries.iter_mut() {
                    adversary.freeze(FREEZE_TICKS);
                }
            }
            CrewAbility::TidalWave => {
                ctx.spawn_attack(Attack::ring(from, 200.0, 8.0, 20.0, 10.0, Hp::whole(1)));
            }
        }
    }
}

/// Narrow view of the world handed to abilities
pub struct AbilityContext<'a> {
    pub player_pos: Vec2,
    /// Pointer position, used by aimed abilities
    pub aim: Vec2,
    pub attacks: &'a mut Vec<Attack>,
    pub adversaries: &'a mut Vec<Adversary>,
    pub ids: &'a mut EntityIds,
    pub score: &'a mut u32,
}

impl AbilityContext<'_> {
    pub fn spawn_attack(&mut self, mut attack: Attack) {
        attack.id = self.ids.next();
        self.attacks.push(attack);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CrewUnit {
    pub name: &'static str,
    pub ability: CrewAbility,
    pub cooldown: Cooldown,
    pub unlocked: bool,
    pub unlock_score: u32,
}

impl CrewUnit {
    fn new(name: &'static str, ability: CrewAbility, cooldown: u32, unlock_score: u32) -> Self {
        Self {
            name,
            ability,
            cooldown: Cooldown::ready_at(cooldown),
            unlocked: false,
            unlock_score,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrewRoster {
    pub units: Vec<CrewUnit>,
    /// Index of the selected unit; always an unlocked one
    pub active: Option<usize>,
}

impl Default for CrewRoster {
    fn default() -> Self {
        Self {
            units: vec![
                CrewUnit::new("Swordsman", CrewAbility::TripleSlash, 900, 10),
                CrewUnit::new("Navigator", CrewAbility::ChainLightning, 800, 20),
                CrewUnit::new("Sniper", CrewAbility::SpreadShot, 600, 30),
                CrewUnit::new("Cook", CrewAbility::FlameSpin, 750, 40),
                CrewUnit::new("Doctor", CrewAbility::Remedy, 1000, 50),
                CrewUnit::new("Archaeologist", CrewAbility::Bind, 700, 60),
                CrewUnit::new("Shipwright", CrewAbility::CannonBeam, 850, 70),
                CrewUnit::new("Musician", CrewAbility::SoulFreeze, 800, 80),
                CrewUnit::new("Helmsman", CrewAbility::TidalWave, 900, 90),
            ],
            active: None,
        }
    }
}

impl CrewRoster {
    pub fn tick_cooldowns(&mut self) {
        for unit in &mut self.units {
            unit.cooldown.tick();
        }
    }

    pub fn reset_cooldowns(&mut self) {
        for unit in &mut self.units {
            unit.cooldown.reset();
        }
    }

    pub fn active_unit(&self) -> Option<&CrewUnit> {
        self.active.and_then(|i| self.units.get(i))
    }

    /// Select an unlocked unit; locked or unknown indices are refused
    pub fn select(&mut self, index: usize) -> bool {
        match self.units.get(index) {
            Some(unit) if unit.unlocked => {
                self.active = Some(index);
                true
            }
            _ => false,
        }
    }

    fn unlock(&mut self, index: usize) {
        self.units[index].unlocked = true;
        if self.active.is_none() {
            self.active = Some(index);
        }
    }

    /// Unlock every unit whose threshold `score` has reached; returns the new ones
    pub fn unlock_for_score(&mut self, score: u32) -> Vec<usize> {
        let newly: Vec<usize> = self
            .units
            .iter()
            .enumerate()
            .filter(|(_, u)| !u.unlocked && score >= u.unlock_score)
            .map(|(i, _)| i)
            .collect();
        for &i in &newly {
            self.unlock(i);
        }
        newly
    }

    /// Unlock a uniformly random locked unit, if any remain
    pub fn unlock_random<R: Rng>(&mut self, rng: &mut R) -> Option<usize> {
        let locked: Vec<usize> = self
            .units
            .iter()
            .enumerate()
            .filter(|(_, u)| !u.unlocked)
            .map(|(i, _)| i)
            .collect();
        let index = *locked.choose(rng)?;
        self.unlock(index);
        Some(index)
    }

    pub fn unlocked_count(&self) -> usize {
        self.units.iter().filter(|u| u.unlocked).count()
    }

    /// Fire the active unit's ability if it is ready; returns the unit index
    pub fn use_active(&mut self, ctx: &mut AbilityContext<'_>) -> Option<usize> {
        let index = self.active?;
        let unit = self.units.get_mut(index)?;
        if !unit.unlocked || !unit.cooldown.trigger() {
            return None;
        }
        unit.ability.cast(ctx);
        Some(index)
    }
}
