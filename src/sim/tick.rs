//! Fixed timestep simulation tick
//!
//! One call advances one frame: the event queue is reset, phase commands
//! run, then (only while playing) player actions and the combat resolver.

use glam::Vec2;

use super::attack::Attack;
use super::autopilot;
use super::combat::resolve_frame;
use super::crew::AbilityContext;
use super::events::GameEvent;
use super::phase::PhaseCommand;
use super::state::{Hp, SimulationState};
use crate::audio::SoundCue;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Primary press point: throw a punch toward it
    pub primary: Option<Vec2>,
    /// Secondary press point: unleash the power field and turn toward it
    pub secondary: Option<Vec2>,
    /// Pointer position (aims crew abilities); falls back to facing
    pub pointer: Option<Vec2>,
    /// Crew ability key
    pub crew_ability: bool,
    /// Walk toward this point
    pub move_to: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
    /// Explicit phase transition request
    pub command: Option<PhaseCommand>,
    /// Idle/demo mode - the autopilot plays
    pub idle_mode: bool,
}

/// Advance the simulation by one frame
pub fn tick(state: &mut SimulationState, input: &TickInput) {
    state.events.clear();
    if let Some(command) = input.command {
        state.request(command);
    }
    if input.pause {
        state.request(PhaseCommand::TogglePause);
    }

    // Don't simulate outside play
    if !state.phase.is_simulating() {
        return;
    }

    let input = if input.idle_mode {
        autopilot::drive(state, input)
    } else {
        input.clone()
    };

    apply_actions(state, &input);
    resolve_frame(state);
    state.time_ticks += 1;
    state.normalize_order();
}

/// Player movement target, basic attack, special and crew ability
fn apply_actions(state: &mut SimulationState, input: &TickInput) {
    if let Some(target) = input.move_to {
        state.player.move_target = Some(target);
    }

    if let Some(target) = input.primary {
        state.player.face(target);
        if state.player.basic.trigger() {
            state.registry.add_attack(Attack::punch(state.player.pos, target));
            state.events.cue(SoundCue::Punch);
        }
    }

    if let Some(point) = input.secondary {
        state.player.face(point);
    }
    if input.secondary.is_some() && state.player.special.trigger() {
        let rate = Hp::from_points(state.settings.field_damage_per_tick);
        state.registry.add_attack(Attack::power_field(state.player.pos, rate));
        state.events.cue(SoundCue::PowerField);
    }

    if input.crew_ability {
        let aim = input.pointer.unwrap_or_else(|| state.player.facing_point());
        use_crew_ability(state, aim);
    }
}

fn use_crew_ability(state: &mut SimulationState, aim: Vec2) {
    let registry = &mut state.registry;
    let mut ctx = AbilityContext {
        player_pos: state.player.pos,
        aim,
        attacks: &mut registry.attacks,
        adversaries: &mut registry.adversaries,
        ids: &mut registry.ids,
        score: &mut state.progression.score,
    };
    let Some(index) = state.crew.use_active(&mut ctx) else {
        return;
    };
    let unit = &state.crew.units[index];
    log::debug!("{} used {}", unit.name, unit.ability.as_str());
    state.events.emit(GameEvent::CrewAbilityUsed {
        index,
        name: unit.name,
    });
    state.events.cue(SoundCue::CrewAbility);
    state.check_crew_unlocks();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BEAM_REACH;
    use crate::settings::{Difficulty, Settings};
    use crate::sim::phase::GamePhase;
    use crate::sim::state::{Adversary, AdversaryKind};

    fn playing(seed: u64) -> SimulationState {
        let mut state = SimulationState::new(seed, Settings::default());
        let go = TickInput {
            command: Some(PhaseCommand::Advance),
            ..Default::default()
        };
        tick(&mut state, &go);
        let pick = TickInput {
            command: Some(PhaseCommand::SelectDifficulty(Difficulty::Medium)),
            ..Default::default()
        };
        tick(&mut state, &pick);
        state
    }

    #[test]
    fn test_menu_does_not_simulate() {
        let mut state = SimulationState::new(1, Settings::default());
        for _ in 0..100 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.registry.entity_count(), 0);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = playing(12345);
        assert_eq!(state.phase, GamePhase::Playing);
        let ticks = state.time_ticks;

        let input = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Paused);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.time_ticks, ticks);

        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, ticks + 1);
    }

    #[test]
    fn test_basic_attack_cooldown() {
        let mut state = playing(3);
        let press = TickInput {
            primary: Some(Vec2::new(700.0, 300.0)),
            ..Default::default()
        };
        let mut punches = 0;
        for _ in 0..16 {
            tick(&mut state, &press);
            punches += state
                .events
                .drain_cues()
                .iter()
                .filter(|c| **c == SoundCue::Punch)
                .count();
        }
        assert_eq!(punches, 2);
    }

    #[test]
    fn test_special_needs_full_cooldown() {
        let mut state = playing(4);
        let pos = state.player.pos;
        let press = TickInput {
            secondary: Some(pos + Vec2::new(-50.0, 0.0)),
            ..Default::default()
        };
        tick(&mut state, &press);
        assert_eq!(state.registry.attacks.iter().filter(|a| a.is_power_field()).count(), 1);
        assert_eq!(state.player.facing, Vec2::NEG_X);
        tick(&mut state, &press);
        assert_eq!(state.registry.attacks.iter().filter(|a| a.is_power_field()).count(), 1);
        assert_eq!(state.player.special.remaining, 240 - 2);
    }

    #[test]
    fn test_crew_ability_requires_unlock() {
        let mut state = playing(5);
        let key = TickInput {
            crew_ability: true,
            ..Default::default()
        };
        tick(&mut state, &key);
        assert!(state.registry.attacks.is_empty());

        state.crew.unlock_for_score(10);
        tick(&mut state, &key);
        assert_eq!(state.registry.attacks.len(), 3, "three slashes");
    }

    fn beam_end(state: &SimulationState) -> Vec2 {
        let beam = state
            .registry
            .attacks
            .iter()
            .find(|a| a.segment_end().is_some())
            .expect("beam fired");
        beam.segment_end().expect("beam has an end")
    }

    #[test]
    fn test_beam_without_pointer_follows_facing() {
        let mut state = playing(7);
        state.crew.unlock_for_score(70);
        assert!(state.crew.select(6));
        let pos = state.player.pos;
        let key = TickInput {
            crew_ability: true,
            ..Default::default()
        };
        tick(&mut state, &key);
        assert_eq!(beam_end(&state), pos + Vec2::new(0.0, -BEAM_REACH));

        let mut state = playing(7);
        state.crew.unlock_for_score(70);
        assert!(state.crew.select(6));
        tick(
            &mut state,
            &TickInput {
                primary: Some(pos + Vec2::new(100.0, 0.0)),
                ..Default::default()
            },
        );
        tick(&mut state, &key);
        assert_eq!(beam_end(&state), pos + Vec2::new(BEAM_REACH, 0.0));
    }

    #[test]
    fn test_event_queue_holds_one_frame() {
        let mut state = playing(8);
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..3000 {
            tick(&mut state, &idle);
            assert!(state.events.events().len() < 64);
            assert!(state.events.cues().len() < 64);
            if state.phase == GamePhase::GameOver {
                tick(
                    &mut state,
                    &TickInput {
                        command: Some(PhaseCommand::Restart),
                        ..Default::default()
                    },
                );
            }
        }

        tick(
            &mut state,
            &TickInput {
                pause: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(!state.events.events().is_empty());
        tick(&mut state, &TickInput::default());
        assert!(state.events.events().is_empty());
        assert!(state.events.cues().is_empty());
    }

    #[test]
    fn test_remedy_score_unlocks_crew() {
        let mut state = playing(6);
        state.crew.unlock_for_score(50);
        state.crew.select(4);
        state.progression.score = 58;
        for i in 0..3 {
            state.registry.add_adversary(Adversary::new(
                AdversaryKind::Grunt,
                Vec2::new(10.0 + 10.0 * i as f32, 10.0),
                15.0,
                1,
                0.0,
            ));
        }
        tick(
            &mut state,
            &TickInput {
                crew_ability: true,
                ..Default::default()
            },
        );
        assert_eq!(state.score(), 61);
        assert!(state.crew.units[5].unlocked);
    }

    #[test]
    fn test_determinism() {
        let mut a = playing(99999);
        let mut b = playing(99999);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.score(), b.score());
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.player.pos, b.player.pos);
        let ids_a: Vec<u32> = a.registry.adversaries.iter().map(|x| x.id).collect();
        let ids_b: Vec<u32> = b.registry.adversaries.iter().map(|x| x.id).collect();
        assert_eq!(ids_a, ids_b);
    }
}
