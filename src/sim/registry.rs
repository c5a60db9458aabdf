//! Live entity collections
//!
//! Each entity lives in exactly one collection. Ids are allocated here so
//! every spawn path (spawner, abilities, boss patterns, drops) agrees.

use super::attack::Attack;
use super::boss::Boss;
use super::state::{Adversary, PowerUp};

/// Monotonic entity id allocator
#[derive(Debug, Clone)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    pub adversaries: Vec<Adversary>,
    pub attacks: Vec<Attack>,
    pub power_ups: Vec<PowerUp>,
    boss: Option<Boss>,
    pub ids: EntityIds,
}

impl EntityRegistry {
    pub fn add_adversary(&mut self, mut adversary: Adversary) -> u32 {
        adversary.id = self.ids.next();
        let id = adversary.id;
        self.adversaries.push(adversary);
        id
    }

    pub fn add_attack(&mut self, mut attack: Attack) -> u32 {
        attack.id = self.ids.next();
        let id = attack.id;
        self.attacks.push(attack);
        id
    }

    pub fn add_power_up(&mut self, mut power_up: PowerUp) -> u32 {
        power_up.id = self.ids.next();
        let id = power_up.id;
        self.power_ups.push(power_up);
        id
    }

    /// Remove matching adversaries, returning how many went
    pub fn remove_adversaries_where(&mut self, mut pred: impl FnMut(&Adversary) -> bool) -> usize {
        let before = self.adversaries.len();
        self.adversaries.retain(|a| !pred(a));
        before - self.adversaries.len()
    }

    pub fn remove_attacks_where(&mut self, mut pred: impl FnMut(&Attack) -> bool) -> usize {
        let before = self.attacks.len();
        self.attacks.retain(|a| !pred(a));
        before - self.attacks.len()
    }

    pub fn remove_power_ups_where(&mut self, mut pred: impl FnMut(&PowerUp) -> bool) -> usize {
        let before = self.power_ups.len();
        self.power_ups.retain(|p| !pred(p));
        before - self.power_ups.len()
    }

    /// Install a boss; refused (returns false) while one is live
    pub fn install_boss(&mut self, mut boss: Boss) -> bool {
        if self.boss.is_some() {
            log::debug!("Boss slot occupied, refusing {:?}", boss.kind);
            return false;
        }
        boss.id = self.ids.next();
        self.boss = Some(boss);
        true
    }

    pub fn boss(&self) -> Option<&Boss> {
        self.boss.as_ref()
    }

    pub fn boss_mut(&mut self) -> Option<&mut Boss> {
        self.boss.as_mut()
    }

    /// The boss alongside the collections its patterns and hit checks touch
    pub fn boss_parts(
        &mut self,
    ) -> Option<(&mut Boss, &mut Vec<Attack>, &mut Vec<Adversary>, &mut EntityIds)> {
        let boss = self.boss.as_mut()?;
        Some((boss, &mut self.attacks, &mut self.adversaries, &mut self.ids))
    }

    pub fn take_boss(&mut self) -> Option<Boss> {
        self.boss.take()
    }

    pub fn has_boss(&self) -> bool {
        self.boss.is_some()
    }

    pub fn entity_count(&self) -> usize {
        self.adversaries.len()
            + self.attacks.len()
            + self.power_ups.len()
            + usize::from(self.boss.is_some())
    }

    /// Drop every entity; ids keep counting up
    pub fn clear(&mut self) {
        self.adversaries.clear();
        self.attacks.clear();
        self.power_ups.clear();
        self.boss = None;
    }

    /// Sort by id for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.adversaries.sort_by_key(|a| a.id);
        self.attacks.sort_by_key(|a| a.id);
        self.power_ups.sort_by_key(|p| p.id);
    }
}
