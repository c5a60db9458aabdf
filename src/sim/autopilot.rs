//! Idle/demo mode
//!
//! Synthesizes a frame of input from the current state: punch the nearest
//! threat, unleash the field when crowded, use the crew when it pays off,
//! keep away from bosses and pick up power-ups when it is safe.

use glam::Vec2;

use super::geometry::distance;
use super::state::SimulationState;
use super::tick::TickInput;
use crate::{clamp_to_field, field_center};

/// Adversaries closer than this count as crowding the player
const CROWD_RADIUS: f32 = 180.0;
const CROWD_SIZE: usize = 3;
/// Power-ups are only chased when nothing is this close
const SAFE_RADIUS: f32 = 150.0;
/// Distance the player tries to keep from a boss
const BOSS_KEEP_AWAY: f32 = 220.0;

/// Build the autopilot's input for this frame, keeping any explicit command
pub fn drive(state: &SimulationState, input: &TickInput) -> TickInput {
    let player = state.player.pos;
    let nearest = state
        .registry
        .adversaries
        .iter()
        .min_by(|a, b| {
            distance(a.pos, player)
                .partial_cmp(&distance(b.pos, player))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|a| (a.pos, distance(a.pos, player)));
    let boss = state.registry.boss().map(|b| b.pos);

    // Bosses outrank adversaries unless one is about to reach us
    let target = match (nearest, boss) {
        (Some((pos, d)), _) if d < SAFE_RADIUS => Some(pos),
        (_, Some(boss_pos)) => Some(boss_pos),
        (Some((pos, _)), None) => Some(pos),
        (None, None) => None,
    };

    let crowded = state
        .registry
        .adversaries
        .iter()
        .filter(|a| distance(a.pos, player) < CROWD_RADIUS)
        .count()
        >= CROWD_SIZE;

    let crew_ready = state
        .crew
        .active_unit()
        .is_some_and(|unit| unit.cooldown.ready());
    let worth_crew = boss.is_some() || state.registry.adversaries.len() >= 2;

    TickInput {
        primary: target,
        secondary: crowded.then(|| target.unwrap_or(player)),
        pointer: target,
        crew_ability: crew_ready && worth_crew,
        move_to: Some(choose_position(state, nearest.map(|(_, d)| d))),
        pause: false,
        command: input.command,
        idle_mode: true,
    }
}

fn choose_position(state: &SimulationState, nearest_threat: Option<f32>) -> Vec2 {
    let player = state.player.pos;

    if let Some(boss) = state.registry.boss() {
        let away = (player - boss.pos).normalize_or_zero();
        let away = if away == Vec2::ZERO { Vec2::Y } else { away };
        if distance(player, boss.pos) < BOSS_KEEP_AWAY + boss.size {
            let flee = clamp_to_field(player + away * BOSS_KEEP_AWAY);
            // cornered: slide along the wall instead
            if distance(flee, player) < 1.0 {
                return clamp_to_field(player + away.perp() * BOSS_KEEP_AWAY);
            }
            return flee;
        }
        return player;
    }

    let safe = nearest_threat.is_none_or(|d| d > SAFE_RADIUS);
    if safe {
        if let Some(power_up) = state
            .registry
            .power_ups
            .iter()
            .filter(|p| p.is_live())
            .min_by(|a, b| {
                distance(a.pos, player)
                    .partial_cmp(&distance(b.pos, player))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        {
            return power_up.pos;
        }
    }
    field_center()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::boss::{Boss, BossKind};
    use crate::sim::phase::PhaseCommand;
    use crate::sim::state::{Adversary, AdversaryKind, PowerUp, PowerUpKind};

    fn state() -> SimulationState {
        let mut s = SimulationState::new(8, Settings::default());
        s.request(PhaseCommand::Advance);
        s.request(PhaseCommand::Start);
        s
    }

    fn grunt(pos: Vec2) -> Adversary {
        Adversary::new(AdversaryKind::Grunt, pos, 20.0, 1, 1.0)
    }

    #[test]
    fn test_targets_nearest_adversary() {
        let mut s = state();
        s.registry.add_adversary(grunt(Vec2::new(50.0, 50.0)));
        s.registry.add_adversary(grunt(Vec2::new(500.0, 300.0)));
        let input = drive(&s, &TickInput::default());
        assert_eq!(input.primary, Some(Vec2::new(500.0, 300.0)));
        assert!(input.secondary.is_none());
        assert!(input.idle_mode);
    }

    #[test]
    fn test_field_when_crowded() {
        let mut s = state();
        for i in 0..3 {
            s.registry
                .add_adversary(grunt(s.player.pos + Vec2::new(100.0, 30.0 * i as f32)));
        }
        let input = drive(&s, &TickInput::default());
        assert_eq!(input.secondary, Some(s.player.pos + Vec2::new(100.0, 0.0)));
    }

    #[test]
    fn test_flees_boss() {
        let mut s = state();
        let boss_pos = s.player.pos - Vec2::new(0.0, 150.0);
        s.registry.install_boss(Boss::new(BossKind::Tidecaller, boss_pos));
        let input = drive(&s, &TickInput::default());
        let dest = input.move_to.expect("moves");
        assert!(distance(dest, boss_pos) > distance(s.player.pos, boss_pos));
        assert_eq!(input.primary, Some(boss_pos));
    }

    #[test]
    fn test_fetches_power_up_when_safe() {
        let mut s = state();
        let pos = Vec2::new(600.0, 100.0);
        s.registry.add_power_up(PowerUp::new(PowerUpKind::BonusScore, pos));
        assert_eq!(drive(&s, &TickInput::default()).move_to, Some(pos));

        s.registry.add_adversary(grunt(s.player.pos + Vec2::new(90.0, 0.0)));
        assert_eq!(drive(&s, &TickInput::default()).move_to, Some(field_center()));
    }

    #[test]
    fn test_keeps_explicit_command() {
        let s = state();
        let input = TickInput {
            command: Some(PhaseCommand::TogglePause),
            ..Default::default()
        };
        assert_eq!(drive(&s, &input).command, Some(PhaseCommand::TogglePause));
    }
}
