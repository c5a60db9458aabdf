//! Combat resolver: the per-frame pass while playing
//!
//! Order within a frame:
//! 0. spawner (only outside boss battles)
//! 1. cooldowns and timers, then the boss controller
//! 2. attacks and power-ups advance; spent ones are dropped
//! 3. player and adversaries move
//! 4. lethal contact with the player ends the run
//! 5. adversaries take at most one hit each: punch, crew attack, power field
//! 6. the boss takes at most one hit: punch, crew attack
//! 7. power-ups touching the player are applied
//! 8. boss trigger
//!
//! All movement happens before any cross-entity collision test.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::attack::{Attack, AttackOwner};
use super::boss::{Boss, BossContext};
use super::events::GameEvent;
use super::geometry::{circles_overlap, push_away};
use super::state::{Adversary, Hp, PowerUp, PowerUpKind, SimulationState};
use crate::audio::SoundCue;
use crate::consts::{BOSS_SPAWN_X, BOSS_SPAWN_Y};

/// Damage landed on a target, plus an optional shove (origin, strength)
#[derive(Debug, Clone, Copy, PartialEq)]
struct Hit {
    damage: Hp,
    push: Option<(Vec2, f32)>,
    /// Came from the power field (no hit cue, it lands every frame)
    sustained: bool,
}

/// Run one playing frame
pub fn resolve_frame(state: &mut SimulationState) {
    run_spawner(state);
    tick_timers(state);
    run_boss(state);
    advance_entities(state);
    move_actors(state);

    if player_struck(state) {
        state.enter_game_over();
        return;
    }

    resolve_adversary_hits(state);
    resolve_boss_hits(state);
    state.registry.remove_attacks_where(|a| !a.active);
    collect_power_ups(state);
    maybe_spawn_boss(state);
}

fn run_spawner(state: &mut SimulationState) {
    if state.progression.boss_battle {
        return;
    }
    state.spawner.advance(
        &mut state.rng,
        &state.profile,
        state.progression.score,
        state.settings.empowered_guard_score,
        &mut state.registry,
    );
}

fn tick_timers(state: &mut SimulationState) {
    state.player.tick_timers();
    state.crew.tick_cooldowns();
    if let Some(boss) = state.registry.boss_mut() {
        boss.tick_timers();
    }
}

fn run_boss(state: &mut SimulationState) {
    let player_pos = state.player.pos;
    let Some((boss, attacks, adversaries, ids)) = state.registry.boss_parts() else {
        return;
    };
    let mut ctx = BossContext {
        player_pos,
        attacks,
        adversaries,
        ids,
        profile: &state.profile,
    };
    if let Some(pattern) = boss.update(&mut ctx, &mut state.rng) {
        log::debug!("{} used pattern {pattern}", boss.kind.name());
    }
}

fn advance_entities(state: &mut SimulationState) {
    let registry = &mut state.registry;
    for attack in &mut registry.attacks {
        attack.update(&mut state.rng);
    }
    registry.remove_attacks_where(|a| !a.active);

    for power_up in &mut registry.power_ups {
        power_up.update();
    }
    registry.remove_power_ups_where(|p| !p.is_live());
}

fn move_actors(state: &mut SimulationState) {
    state.player.step_movement();
    let target = state.player.pos;
    for adversary in &mut state.registry.adversaries {
        adversary.advance(target);
    }
}

/// Anything lethal touching the player?
fn player_struck(state: &mut SimulationState) -> bool {
    let (pos, radius) = (state.player.pos, state.player.radius);
    if state.registry.adversaries.iter().any(|a| a.touches(pos, radius)) {
        return true;
    }
    if !state.settings.boss_contact_lethal {
        return false;
    }
    if state.registry.boss().is_some_and(|b| b.touches(pos, radius)) {
        return true;
    }
    state
        .registry
        .attacks
        .iter_mut()
        .filter(|a| a.owner == AttackOwner::Boss)
        .any(|a| a.check_collision(pos, radius))
}

/// First attack to land on a circle, in priority order
///
/// Punches first, then crew attacks, then (for adversaries) the power field.
/// Only the first hit counts, so a target takes at most one hit per frame.
fn first_hit(attacks: &mut [Attack], center: Vec2, radius: f32, include_field: bool) -> Option<Hit> {
    for attack in attacks.iter_mut().filter(|a| a.owner == AttackOwner::Player && a.is_punch()) {
        if attack.check_collision(center, radius) {
            return Some(Hit {
                damage: attack.damage,
                push: None,
                sustained: false,
            });
        }
    }
    for attack in attacks.iter_mut().filter(|a| a.owner == AttackOwner::Crew) {
        if attack.check_collision(center, radius) {
            return Some(Hit {
                damage: attack.damage,
                push: attack.push_strength().map(|s| (attack.origin, s)),
                sustained: false,
            });
        }
    }
    if include_field {
        for attack in attacks.iter_mut().filter(|a| a.owner == AttackOwner::Player && a.is_power_field()) {
            if attack.check_collision(center, radius) {
                return Some(Hit {
                    damage: attack.damage,
                    push: None,
                    sustained: true,
                });
            }
        }
    }
    None
}

fn resolve_adversary_hits(state: &mut SimulationState) {
    let registry = &mut state.registry;
    let mut defeated_ids = Vec::new();
    let mut struck = false;

    for adversary in &mut registry.adversaries {
        let Some(hit) = first_hit(&mut registry.attacks, adversary.pos, adversary.size, true) else {
            continue;
        };
        struck |= !hit.sustained;
        if let Some((from, strength)) = hit.push {
            adversary.pos += push_away(from, adversary.pos, strength);
        }
        if adversary.take_damage(hit.damage) {
            defeated_ids.push(adversary.id);
        }
    }

    if struck {
        state.events.cue(SoundCue::Hit);
    }
    if defeated_ids.is_empty() {
        return;
    }

    let mut defeated: Vec<Adversary> = Vec::with_capacity(defeated_ids.len());
    registry.adversaries.retain(|a| {
        if defeated_ids.contains(&a.id) {
            defeated.push(a.clone());
            false
        } else {
            true
        }
    });
    for adversary in defeated {
        on_adversary_defeated(state, &adversary);
    }
}

/// Score, combo, drop roll and unlock check for one defeated adversary
fn on_adversary_defeated(state: &mut SimulationState, adversary: &Adversary) {
    state.player.register_defeat();
    state.events.emit(GameEvent::AdversaryDefeated {
        id: adversary.id,
        kind: adversary.kind,
        pos: adversary.pos,
    });
    state.events.cue(SoundCue::Defeat);
    state.award_score(1);

    if state.rng.random::<f64>() < state.settings.power_up_drop_chance {
        let Some(&kind) = PowerUpKind::ALL.choose(&mut state.rng) else {
            return;
        };
        state.registry.add_power_up(PowerUp::new(kind, adversary.pos));
        state.events.emit(GameEvent::PowerUpDropped {
            kind,
            pos: adversary.pos,
        });
    }
}

fn resolve_boss_hits(state: &mut SimulationState) {
    let defeated = {
        let Some((boss, attacks, _, _)) = state.registry.boss_parts() else {
            return;
        };
        let Some(hit) = first_hit(attacks, boss.pos, boss.size, false) else {
            return;
        };
        state.events.cue(SoundCue::Hit);
        boss.take_damage(hit.damage)
    };
    if !defeated {
        return;
    }

    let Some(boss) = state.registry.take_boss() else {
        return;
    };
    log::info!("{} defeated", boss.kind.name());
    state.progression.boss_defeated(state.settings.boss_defeat_bonus);
    state.check_crew_unlocks();
    state.events.emit(GameEvent::BossDefeated { kind: boss.kind });
    state.events.cue(SoundCue::BossDefeated);
}

fn collect_power_ups(state: &mut SimulationState) {
    let (pos, radius) = (state.player.pos, state.player.radius);
    let mut collected = Vec::new();
    for power_up in &mut state.registry.power_ups {
        if power_up.is_live() && circles_overlap(power_up.pos, power_up.radius, pos, radius) {
            power_up.collected = true;
            collected.push(power_up.kind);
        }
    }
    state.registry.remove_power_ups_where(|p| p.collected);
    for kind in collected {
        apply_power_up(state, kind);
    }
}

/// Apply a collected power-up's effect exactly once
pub fn apply_power_up(state: &mut SimulationState, kind: PowerUpKind) {
    state.events.emit(GameEvent::PowerUpCollected { kind });
    state.events.cue(SoundCue::PowerUpCollected);

    match kind {
        PowerUpKind::AreaClear => {
            let count = state.registry.remove_adversaries_where(|_| true) as u32;
            state.events.emit(GameEvent::AreaCleared { count });
            state.award_score(count);
        }
        PowerUpKind::PowerMode => {
            let ticks = state.settings.power_mode_ticks;
            state.player.activate_power_mode(ticks);
            state.events.emit(GameEvent::PowerModeActivated { ticks });
            state.events.cue(SoundCue::PowerModeActivated);
        }
        PowerUpKind::StageAdvance => {
            let boss_live = state.registry.has_boss();
            let name = state.progression.advance_stage(boss_live).name;
            let stage = state.progression.stage;
            log::info!("Sailing on to {name}");
            state.events.emit(GameEvent::StageAdvanced { stage, name });
            state.events.cue(SoundCue::StageAdvanced);
        }
        PowerUpKind::BonusScore => {
            let (min, max) = (state.settings.bonus_score_min, state.settings.bonus_score_max);
            let amount = state.rng.random_range(min..=max.max(min));
            state.events.emit(GameEvent::BonusScore { amount });
            state.award_score(amount);
        }
        PowerUpKind::CrewUnlock => match state.crew.unlock_random(&mut state.rng) {
            Some(index) => state.announce_unlock(index),
            None => {
                let amount = state.settings.crew_unlock_fallback_bonus;
                state.events.emit(GameEvent::BonusScore { amount });
                state.award_score(amount);
            }
        },
    }
}

fn maybe_spawn_boss(state: &mut SimulationState) {
    let should = state.progression.should_spawn_boss(
        state.settings.boss_score_interval,
        state.registry.has_boss(),
        state.registry.adversaries.len(),
    );
    if !should {
        return;
    }
    let kind = state.progression.stage_boss();
    if state
        .registry
        .install_boss(Boss::new(kind, Vec2::new(BOSS_SPAWN_X, BOSS_SPAWN_Y)))
    {
        state.progression.boss_spawned();
        log::info!(
            "{} appears at {} (score {})",
            kind.name(),
            state.progression.current_stage().name,
            state.progression.score
        );
        state.events.emit(GameEvent::BossAppeared { kind });
        state.events.cue(SoundCue::BossAppeared);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_center;
    use crate::settings::Settings;
    use crate::sim::attack::AttackKind;
    use crate::sim::boss::BossKind;
    use crate::sim::phase::{GamePhase, PhaseCommand};
    use crate::sim::state::AdversaryKind;

    fn playing(settings: Settings) -> SimulationState {
        let mut s = SimulationState::new(5, settings);
        s.request(PhaseCommand::Advance);
        s.request(PhaseCommand::Start);
        assert_eq!(s.phase, GamePhase::Playing);
        // keep the spawner out of the way
        s.spawner.interval = u32::MAX;
        s
    }

    fn quiet() -> Settings {
        Settings {
            power_up_drop_chance: 0.0,
            ..Settings::default()
        }
    }

    /// Stationary grunt of size 20
    fn grunt_at(pos: Vec2, health: u32) -> Adversary {
        Adversary::new(AdversaryKind::Grunt, pos, 20.0, health, 0.0)
    }

    #[test]
    fn test_contact_ends_run_before_hits() {
        let mut s = playing(quiet());
        let pos = s.player.pos + Vec2::new(40.0, 0.0);
        s.registry.add_adversary(grunt_at(pos, 1));
        s.registry.add_attack(Attack::power_field(s.player.pos, Hp::whole(5)));
        resolve_frame(&mut s);
        assert_eq!(s.phase, GamePhase::GameOver);
        assert_eq!(s.score(), 0);
        assert_eq!(s.registry.adversaries.len(), 1);
    }

    #[test]
    fn test_punch_kills_and_scores() {
        let mut s = playing(quiet());
        let target = s.player.pos + Vec2::new(100.0, 0.0);
        s.registry.add_adversary(grunt_at(target, 1));
        s.registry.add_attack(Attack::punch(s.player.pos, target));
        for _ in 0..4 {
            resolve_frame(&mut s);
        }
        assert!(s.registry.adversaries.is_empty());
        assert_eq!(s.score(), 1);
        assert_eq!(s.player.combo, 1);
        assert!(s.registry.attacks.is_empty(), "punch consumed");
    }

    #[test]
    fn test_one_hit_per_frame() {
        let mut s = playing(quiet());
        let at = s.player.pos + Vec2::new(120.0, 0.0);
        s.registry.add_adversary(grunt_at(at, 3));
        for _ in 0..3 {
            s.registry.add_attack(Attack::area(
                AttackOwner::Crew,
                at,
                50.0,
                100.0,
                0.0,
                Some(100),
                0.0,
                Hp::whole(1),
            ));
        }
        resolve_frame(&mut s);
        assert_eq!(s.registry.adversaries[0].health, Hp::whole(2));
    }

    #[test]
    fn test_field_damage_is_fractional() {
        let mut s = playing(quiet());
        let at = s.player.pos + Vec2::new(150.0, 0.0);
        s.registry.add_adversary(grunt_at(at, 1));
        s.registry.add_attack(Attack::power_field(s.player.pos, Hp::from_points(0.05)));
        for _ in 0..19 {
            resolve_frame(&mut s);
        }
        assert_eq!(s.registry.adversaries[0].health.hundredths(), 5);
        resolve_frame(&mut s);
        assert!(s.registry.adversaries.is_empty());
        assert_eq!(s.score(), 1);
        assert_eq!(s.registry.attacks.len(), 1, "field is never consumed");
    }

    #[test]
    fn test_boss_defeat() {
        let mut s = playing(quiet());
        s.progression.score = 50;
        s.progression.boss_spawned();
        let mut boss = Boss::new(BossKind::Tidecaller, Vec2::new(650.0, 300.0));
        boss.health = Hp::whole(1);
        boss.attack.start();
        s.registry.install_boss(boss);
        s.registry.add_attack(Attack::area(
            AttackOwner::Crew,
            Vec2::new(650.0, 300.0),
            30.0,
            60.0,
            0.0,
            Some(10),
            0.0,
            Hp::whole(2),
        ));
        resolve_frame(&mut s);
        assert!(!s.registry.has_boss());
        assert_eq!(s.score(), 70);
        assert!(!s.progression.boss_battle);
    }

    #[test]
    fn test_stage_advance_during_boss_keeps_next_boss() {
        let mut s = playing(quiet());
        s.progression.score = 50;
        s.progression.boss_spawned();
        let mut boss = Boss::new(BossKind::Tidecaller, Vec2::new(650.0, 300.0));
        boss.health = Hp::whole(1);
        boss.attack.start();
        s.registry.install_boss(boss);
        apply_power_up(&mut s, PowerUpKind::StageAdvance);
        assert_eq!(s.progression.stage, 1);

        s.registry.add_attack(Attack::area(
            AttackOwner::Crew,
            Vec2::new(650.0, 300.0),
            30.0,
            60.0,
            0.0,
            Some(10),
            0.0,
            Hp::whole(2),
        ));
        resolve_frame(&mut s);
        assert_eq!(s.progression.bosses_defeated, 1);
        assert!(s.progression.boss_battle);
        assert_eq!(s.registry.boss().map(|b| b.kind), Some(BossKind::Sandstorm));
    }

    #[test]
    fn test_boss_triggers_on_empty_field() {
        let mut s = playing(quiet());
        s.progression.score = 50;
        resolve_frame(&mut s);
        assert_eq!(s.registry.boss().map(|b| b.kind), Some(BossKind::Tidecaller));
        assert!(s.progression.boss_battle);
        assert!(s
            .events
            .events()
            .iter()
            .any(|e| matches!(e, GameEvent::BossAppeared { .. })));
    }

    #[test]
    fn test_boss_waits_for_adversaries() {
        let mut s = playing(quiet());
        s.progression.score = 50;
        s.registry.add_adversary(grunt_at(Vec2::new(50.0, 50.0), 1));
        resolve_frame(&mut s);
        assert!(!s.registry.has_boss());
    }

    #[test]
    fn test_boss_contact_lethal_is_opt_in() {
        let mut s = playing(quiet());
        let mut boss = Boss::new(BossKind::Tidecaller, s.player.pos + Vec2::new(60.0, 0.0));
        boss.attack.start();
        s.registry.install_boss(boss);
        s.progression.boss_battle = true;
        resolve_frame(&mut s);
        assert_eq!(s.phase, GamePhase::Playing);

        let mut s = playing(Settings {
            boss_contact_lethal: true,
            ..quiet()
        });
        let mut boss = Boss::new(BossKind::Tidecaller, s.player.pos + Vec2::new(60.0, 0.0));
        boss.attack.start();
        s.registry.install_boss(boss);
        s.progression.boss_battle = true;
        resolve_frame(&mut s);
        assert_eq!(s.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_ring_pushes_target() {
        let mut s = playing(quiet());
        let origin = field_center();
        let at = origin + Vec2::new(150.0, 0.0);
        s.registry.add_adversary(grunt_at(at, 5));
        let mut ring = Attack::ring(origin, 200.0, 8.0, 20.0, 10.0, Hp::whole(1));
        if let AttackKind::Ring { radius, .. } = &mut ring.kind {
            *radius = 150.0;
        }
        s.registry.add_attack(ring);
        resolve_frame(&mut s);
        let adv = &s.registry.adversaries[0];
        assert_eq!(adv.health, Hp::whole(4));
        assert!((adv.pos.x - (at.x + 10.0)).abs() < 1e-3);
    }

    #[test]
    fn test_power_ups() {
        let mut s = playing(quiet());
        s.registry.add_adversary(grunt_at(Vec2::new(50.0, 50.0), 1));
        s.registry.add_adversary(grunt_at(Vec2::new(750.0, 50.0), 1));
        apply_power_up(&mut s, PowerUpKind::AreaClear);
        assert!(s.registry.adversaries.is_empty());
        assert_eq!(s.score(), 2);

        apply_power_up(&mut s, PowerUpKind::PowerMode);
        assert!(s.player.power_mode_active());
        assert_eq!(s.player.power_mode.remaining, 600);

        let stage = s.progression.stage;
        apply_power_up(&mut s, PowerUpKind::StageAdvance);
        assert_eq!(s.progression.stage, stage + 1);
        assert!(s.progression.boss_battle);

        let before = s.score();
        apply_power_up(&mut s, PowerUpKind::BonusScore);
        let gained = s.score() - before;
        assert!((5..=15).contains(&gained));
    }

    #[test]
    fn test_crew_unlock_power_up_falls_back_to_score() {
        let mut s = playing(quiet());
        s.crew.unlock_for_score(u32::MAX);
        let before = s.score();
        apply_power_up(&mut s, PowerUpKind::CrewUnlock);
        assert_eq!(s.score(), before + 10);

        let mut s = playing(quiet());
        apply_power_up(&mut s, PowerUpKind::CrewUnlock);
        assert_eq!(s.crew.unlocked_count(), 1);
    }

    #[test]
    fn test_power_up_collected_on_touch() {
        let mut s = playing(quiet());
        let pos = s.player.pos + Vec2::new(20.0, 0.0);
        s.registry.add_power_up(PowerUp::new(PowerUpKind::PowerMode, pos));
        resolve_frame(&mut s);
        assert!(s.registry.power_ups.is_empty());
        assert!(s.player.power_mode_active());
    }

    #[test]
    fn test_kill_drops_power_up() {
        let mut s = playing(Settings {
            power_up_drop_chance: 1.0,
            ..Settings::default()
        });
        let at = s.player.pos + Vec2::new(150.0, 0.0);
        s.registry.add_adversary(grunt_at(at, 1));
        s.registry.add_attack(Attack::area(
            AttackOwner::Crew,
            at,
            30.0,
            60.0,
            0.0,
            Some(10),
            0.0,
            Hp::whole(2),
        ));
        resolve_frame(&mut s);
        assert_eq!(s.registry.power_ups.len(), 1);
        assert_eq!(s.registry.power_ups[0].pos, at);
    }
}
