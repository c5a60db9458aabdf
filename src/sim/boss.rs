//! Bosses: movement modes and attack-pattern cycles
//!
//! Each boss cycles through three patterns on its attack cooldown. The index
//! advances before the pattern runs, so the first attack uses pattern 1.

use std::f32::consts::FRAC_PI_4;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::attack::{Attack, AttackOwner};
use super::cooldown::Cooldown;
use super::geometry::{circles_overlap, seek};
use super::registry::EntityIds;
use super::spawner::roll_adversary;
use super::state::{Adversary, AdversaryKind, Hp, SpawnOrigin};
use crate::clamp_to_field;
use crate::consts::BOSS_SEEK_SPEED;
use crate::direction_from_angle;
use crate::settings::DifficultyProfile;

pub const PATTERN_COUNT: usize = 3;
pub const SCATTER_TICKS: u32 = 180;
pub const SCATTER_STEP: f32 = 3.0;
pub const TELEPORT_TICKS: u32 = 180;
pub const SUMMON_COUNT: usize = 2;
pub const SUMMON_HEALTH: u32 = 2;
pub const BOLT_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossKind {
    /// Water shots, summons, thrown tooth
    Tidecaller,
    /// Vortex, scatter form, quake
    Sandstorm,
    /// Great strike, thundercloud, bolts; teleports
    Stormlord,
}

impl BossKind {
    pub fn name(&self) -> &'static str {
        match self {
            BossKind::Tidecaller => "Tidecaller",
            BossKind::Sandstorm => "Sandstorm",
            BossKind::Stormlord => "Stormlord",
        }
    }

    pub fn max_health(&self) -> u32 {
        match self {
            BossKind::Tidecaller => 15,
            BossKind::Sandstorm => 25,
            BossKind::Stormlord => 30,
        }
    }

    pub fn size(&self) -> f32 {
        match self {
            BossKind::Sandstorm => 45.0,
            BossKind::Tidecaller | BossKind::Stormlord => 40.0,
        }
    }

    pub fn attack_cooldown(&self) -> u32 {
        match self {
            BossKind::Tidecaller => 120,
            BossKind::Sandstorm => 150,
            BossKind::Stormlord => 90,
        }
    }

    pub fn teleports(&self) -> bool {
        matches!(self, BossKind::Stormlord)
    }
}

/// How the boss moves this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossMotion {
    Seeking,
    /// Random walk that suspends seeking until the countdown ends
    Scattered { remaining: u32 },
}

/// What a boss pattern may touch
pub struct BossContext<'a> {
    pub player_pos: Vec2,
    pub attacks: &'a mut Vec<Attack>,
    pub adversaries: &'a mut Vec<Adversary>,
    pub ids: &'a mut EntityIds,
    pub profile: &'a DifficultyProfile,
}

impl BossContext<'_> {
    fn spawn_attack(&mut self, mut attack: Attack) {
        attack.id = self.ids.next();
        self.attacks.push(attack);
    }

    fn summon(&mut self, mut adversary: Adversary) {
        adversary.id = self.ids.next();
        self.adversaries.push(adversary);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub id: u32,
    pub kind: BossKind,
    pub pos: Vec2,
    pub size: f32,
    pub health: Hp,
    pub max_health: Hp,
    pub speed: f32,
    pub attack: Cooldown,
    /// Index of the last pattern run
    pub pattern: usize,
    pub motion: BossMotion,
    pub teleport: Option<Cooldown>,
    pub defeated: bool,
}

impl Boss {
    pub fn new(kind: BossKind, pos: Vec2) -> Self {
        let max_health = Hp::whole(kind.max_health());
        Self {
            id: 0,
            kind,
            pos,
            size: kind.size(),
            health: max_health,
            max_health,
            speed: BOSS_SEEK_SPEED,
            attack: Cooldown::ready_at(kind.attack_cooldown()),
            pattern: 0,
            motion: BossMotion::Seeking,
            teleport: kind.teleports().then(|| Cooldown::ready_at(TELEPORT_TICKS)),
            defeated: false,
        }
    }

    pub fn is_scattered(&self) -> bool {
        matches!(self.motion, BossMotion::Scattered { .. })
    }

    /// Timers the resolver counts down with the other cooldowns
    pub fn tick_timers(&mut self) {
        self.attack.tick();
        if let Some(teleport) = &mut self.teleport {
            teleport.tick();
        }
    }

    /// Movement then attack; returns the pattern index when one ran
    pub fn update<R: Rng>(&mut self, ctx: &mut BossContext<'_>, rng: &mut R) -> Option<usize> {
        self.step_movement(ctx.player_pos, rng);
        if !self.attack.trigger() {
            return None;
        }
        self.pattern = (self.pattern + 1) % PATTERN_COUNT;
        self.run_pattern(ctx, rng);
        Some(self.pattern)
    }

    fn step_movement<R: Rng>(&mut self, player_pos: Vec2, rng: &mut R) {
        let teleported = match &mut self.teleport {
            Some(timer) => timer.trigger(),
            None => false,
        };
        if teleported {
            self.pos = Vec2::new(rng.random_range(100.0..=700.0), rng.random_range(100.0..=500.0));
            log::debug!("{} teleported to {:?}", self.kind.name(), self.pos);
            return;
        }

        match &mut self.motion {
            BossMotion::Scattered { remaining } => {
                self.pos += Vec2::new(
                    rng.random_range(-SCATTER_STEP..=SCATTER_STEP),
                    rng.random_range(-SCATTER_STEP..=SCATTER_STEP),
                );
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    self.motion = BossMotion::Seeking;
                }
            }
            BossMotion::Seeking => self.pos += seek(self.pos, player_pos, self.speed),
        }
        self.pos = clamp_to_field(self.pos);
    }

    fn run_pattern<R: Rng>(&mut self, ctx: &mut BossContext<'_>, rng: &mut R) {
        let at = self.pos;
        match (self.kind, self.pattern) {
            (BossKind::Tidecaller, 0) => {
                for i in 0..3 {
                    let dir = direction_from_angle(FRAC_PI_4 * (i as f32 - 1.0));
                    ctx.spawn_attack(Attack::projectile(AttackOwner::Boss, at, dir, 8.0, 10.0, Hp::whole(1)));
                }
            }
            (BossKind::Tidecaller, 1) => {
                for _ in 0..SUMMON_COUNT {
                    let mut minion = roll_adversary(rng, ctx.profile, AdversaryKind::Grunt, at);
                    minion.health = Hp::whole(SUMMON_HEALTH);
                    minion.origin = SpawnOrigin::Summoned;
                    ctx.summon(minion);
                }
            }
            (BossKind::Tidecaller, _) => {
                let dir = ctx.player_pos - at;
                ctx.spawn_attack(Attack::projectile(AttackOwner::Boss, at, dir, 10.0, 15.0, Hp::whole(2)));
            }
            (BossKind::Sandstorm, 0) => {
                ctx.spawn_attack(Attack::area(AttackOwner::Boss, at, 0.0, 100.0, 2.0, Some(180), 0.0, Hp::whole(1)));
            }
            (BossKind::Sandstorm, 1) => {
                self.motion = BossMotion::Scattered {
                    remaining: SCATTER_TICKS,
                };
            }
            (BossKind::Sandstorm, _) => {
                ctx.spawn_attack(Attack::area(AttackOwner::Boss, at, 0.0, 150.0, 5.0, None, 0.0, Hp::whole(1)));
            }
            (BossKind::Stormlord, 0) => {
                ctx.spawn_attack(Attack::strike(AttackOwner::Boss, ctx.player_pos, 50.0, 30, 60, Hp::whole(3)));
            }
            (BossKind::Stormlord, 1) => {
                ctx.spawn_attack(Attack::area(AttackOwner::Boss, at, 40.0, 80.0, 0.5, Some(180), 1.0, Hp::whole(2)));
            }
            (BossKind::Stormlord, _) => {
                for _ in 0..BOLT_COUNT {
                    let bolt_at = Vec2::new(rng.random_range(100.0..=700.0), rng.random_range(100.0..=500.0));
                    ctx.spawn_attack(Attack::strike(AttackOwner::Boss, bolt_at, 20.0, 15, 20, Hp::whole(1)));
                }
            }
        }
    }

    /// Apply damage; sets and returns `defeated` once health runs out
    pub fn take_damage(&mut self, damage: Hp) -> bool {
        if self.health.take(damage) {
            self.defeated = true;
        }
        self.defeated
    }

    pub fn touches(&self, center: Vec2, radius: f32) -> bool {
        circles_overlap(self.pos, self.size, center, radius)
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health.is_zero() {
            0.0
        } else {
            self.health.hundredths() as f32 / self.max_health.hundredths() as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::consts::{BOSS_SPAWN_X, BOSS_SPAWN_Y};
    use crate::field_center;
    use crate::in_field;
    use crate::settings::Difficulty;
    use crate::sim::attack::AttackKind;

    struct Arena {
        attacks: Vec<Attack>,
        adversaries: Vec<Adversary>,
        ids: EntityIds,
        profile: DifficultyProfile,
        rng: Pcg32,
    }

    impl Arena {
        fn new() -> Self {
            Self {
                attacks: Vec::new(),
                adversaries: Vec::new(),
                ids: EntityIds::default(),
                profile: Difficulty::Medium.profile(),
                rng: Pcg32::seed_from_u64(11),
            }
        }

        fn step(&mut self, boss: &mut Boss) -> Option<usize> {
            let mut ctx = BossContext {
                player_pos: field_center(),
                attacks: &mut self.attacks,
                adversaries: &mut self.adversaries,
                ids: &mut self.ids,
                profile: &self.profile,
            };
            boss.tick_timers();
            boss.update(&mut ctx, &mut self.rng)
        }
    }

    fn spawn(kind: BossKind) -> Boss {
        Boss::new(kind, Vec2::new(BOSS_SPAWN_X, BOSS_SPAWN_Y))
    }

    #[test]
    fn test_pattern_order_starts_at_one() {
        let mut arena = Arena::new();
        let mut boss = spawn(BossKind::Tidecaller);
        let mut fired = Vec::new();
        for _ in 0..(3 * 120 + 1) {
            if let Some(p) = arena.step(&mut boss) {
                fired.push(p);
            }
        }
        assert_eq!(fired, vec![1, 2, 0, 1]);
    }

    #[test]
    fn test_tidecaller_patterns() {
        let mut arena = Arena::new();
        let mut boss = spawn(BossKind::Tidecaller);

        arena.step(&mut boss);
        assert_eq!(arena.adversaries.len(), SUMMON_COUNT);
        for minion in &arena.adversaries {
            assert_eq!(minion.health, Hp::whole(SUMMON_HEALTH));
            assert_eq!(minion.origin, SpawnOrigin::Summoned);
            assert_eq!(minion.pos, boss.pos);
        }

        for _ in 0..120 {
            arena.step(&mut boss);
        }
        assert_eq!(arena.attacks.len(), 1, "tooth");
        assert_eq!(arena.attacks[0].damage, Hp::whole(2));

        for _ in 0..120 {
            arena.step(&mut boss);
        }
        assert_eq!(arena.attacks.len(), 4, "tooth + three water shots");
        assert!(arena.attacks.iter().all(|a| a.owner == AttackOwner::Boss));
    }

    #[test]
    fn test_scattered_boss_does_not_seek() {
        let mut arena = Arena::new();
        let mut boss = spawn(BossKind::Sandstorm);
        arena.step(&mut boss);
        assert!(boss.is_scattered());

        let before = boss.pos;
        let mut max_jump = 0.0f32;
        for _ in 0..SCATTER_TICKS {
            let prev = boss.pos;
            arena.step(&mut boss);
            let jump = boss.pos - prev;
            max_jump = max_jump.max(jump.x.abs()).max(jump.y.abs());
        }
        assert!(max_jump <= SCATTER_STEP);
        assert_ne!(boss.pos, before);
        assert!(!boss.is_scattered());
    }

    #[test]
    fn test_sandstorm_areas() {
        let mut arena = Arena::new();
        let mut boss = spawn(BossKind::Sandstorm);
        for _ in 0..(150 * 2 + 1) {
            arena.step(&mut boss);
        }
        // quake (pattern 2) then vortex (pattern 0)
        assert_eq!(arena.attacks.len(), 2);
        assert!(matches!(arena.attacks[0].kind, AttackKind::Area { life: None, .. }));
        assert!(matches!(arena.attacks[1].kind, AttackKind::Area { life: Some(180), .. }));
    }

    #[test]
    fn test_teleport_keeps_boss_in_bounds() {
        let mut arena = Arena::new();
        let mut boss = spawn(BossKind::Stormlord);
        for _ in 0..2000 {
            arena.step(&mut boss);
            assert!(in_field(boss.pos));
        }
        let mut fresh = spawn(BossKind::Stormlord);
        arena.step(&mut fresh);
        assert!((100.0..=700.0).contains(&fresh.pos.x));
        assert!((100.0..=500.0).contains(&fresh.pos.y));
    }

    #[test]
    fn test_stormlord_bolts_warm_up() {
        let mut arena = Arena::new();
        let mut boss = spawn(BossKind::Stormlord);
        arena.step(&mut boss);
        assert_eq!(arena.attacks.len(), 1, "thundercloud");
        for _ in 0..90 {
            arena.step(&mut boss);
        }
        let bolts: Vec<_> = arena.attacks.iter().filter(|a| a.is_warming_up()).collect();
        assert_eq!(bolts.len(), BOLT_COUNT);
    }

    #[test]
    fn test_defeat_sets_flag() {
        let mut boss = spawn(BossKind::Tidecaller);
        assert!(!boss.take_damage(Hp::whole(14)));
        assert!(boss.take_damage(Hp::whole(1)));
        assert!(boss.defeated);
        assert_eq!(boss.health_fraction(), 0.0);
    }

    #[test]
    fn test_seeking_moves_toward_player() {
        let mut arena = Arena::new();
        let mut boss = spawn(BossKind::Tidecaller);
        let before = boss.pos.distance(field_center());
        arena.step(&mut boss);
        let after = boss.pos.distance(field_center());
        assert!((before - after - BOSS_SEEK_SPEED).abs() < 1e-4);
    }
}
