//! Read-only view of a frame for renderers

use glam::Vec2;
use serde::Serialize;

use super::attack::AttackOwner;
use super::boss::BossKind;
use super::events::GameEvent;
use super::phase::GamePhase;
use super::state::{AdversaryKind, PowerUpKind, SimulationState};
use crate::settings::Difficulty;

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub radius: f32,
    pub facing: Vec2,
    pub combo: u32,
    pub power_mode: bool,
    /// Remaining share of each cooldown (0 = ready)
    pub basic_cooldown: f32,
    pub special_cooldown: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdversaryView {
    pub id: u32,
    pub kind: AdversaryKind,
    pub pos: Vec2,
    pub size: f32,
    pub health: f32,
    pub tint: [u8; 3],
    pub immobilized: bool,
    pub frozen: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttackView {
    pub id: u32,
    pub kind: &'static str,
    pub owner: AttackOwner,
    pub pos: Vec2,
    /// Far end for slashes and beams
    pub end: Option<Vec2>,
    pub extent: f32,
    pub warming_up: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PowerUpView {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BossView {
    pub id: u32,
    pub kind: BossKind,
    pub name: &'static str,
    pub pos: Vec2,
    pub size: f32,
    pub health_fraction: f32,
    pub scattered: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrewView {
    pub name: &'static str,
    pub ability: &'static str,
    pub unlocked: bool,
    pub active: bool,
    pub unlock_score: u32,
    pub cooldown: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot<'a> {
    pub frame: u64,
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    pub score: u32,
    pub stage: &'static str,
    pub stage_index: usize,
    pub boss_battle: bool,
    pub player: PlayerView,
    pub adversaries: Vec<AdversaryView>,
    pub attacks: Vec<AttackView>,
    pub power_ups: Vec<PowerUpView>,
    pub boss: Option<BossView>,
    pub crew: Vec<CrewView>,
    /// Events raised by the most recent tick
    pub events: &'a [GameEvent],
}

impl<'a> FrameSnapshot<'a> {
    pub fn capture(state: &'a SimulationState) -> Self {
        let player = &state.player;
        let registry = &state.registry;
        Self {
            frame: state.time_ticks,
            phase: state.phase,
            difficulty: state.difficulty,
            score: state.progression.score,
            stage: state.progression.current_stage().name,
            stage_index: state.progression.stage,
            boss_battle: state.progression.boss_battle,
            player: PlayerView {
                pos: player.pos,
                radius: player.radius,
                facing: player.facing,
                combo: player.combo,
                power_mode: player.power_mode_active(),
                basic_cooldown: player.basic.fraction(),
                special_cooldown: player.special.fraction(),
            },
            adversaries: registry
                .adversaries
                .iter()
                .map(|a| AdversaryView {
                    id: a.id,
                    kind: a.kind,
                    pos: a.pos,
                    size: a.size,
                    health: a.health.as_points(),
                    tint: a.kind.tint(),
                    immobilized: a.immobilized.is_running(),
                    frozen: a.frozen.is_running(),
                })
                .collect(),
            attacks: registry
                .attacks
                .iter()
                .filter(|a| a.active)
                .map(|a| AttackView {
                    id: a.id,
                    kind: a.kind_name(),
                    owner: a.owner,
                    pos: a.position(),
                    end: a.segment_end(),
                    extent: a.extent(),
                    warming_up: a.is_warming_up(),
                })
                .collect(),
            power_ups: registry
                .power_ups
                .iter()
                .filter(|p| p.is_live())
                .map(|p| PowerUpView {
                    id: p.id,
                    kind: p.kind,
                    pos: p.pos,
                    radius: p.radius,
                })
                .collect(),
            boss: registry.boss().map(|b| BossView {
                id: b.id,
                kind: b.kind,
                name: b.kind.name(),
                pos: b.pos,
                size: b.size,
                health_fraction: b.health_fraction(),
                scattered: b.is_scattered(),
            }),
            crew: state
                .crew
                .units
                .iter()
                .enumerate()
                .map(|(i, u)| CrewView {
                    name: u.name,
                    ability: u.ability.as_str(),
                    unlocked: u.unlocked,
                    active: state.crew.active == Some(i),
                    unlock_score: u.unlock_score,
                    cooldown: u.cooldown.fraction(),
                })
                .collect(),
            events: state.events.events(),
        }
    }

    /// Live entity count drawn this frame
    pub fn entity_count(&self) -> usize {
        self.adversaries.len() + self.attacks.len() + self.power_ups.len() + usize::from(self.boss.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::phase::PhaseCommand;
    use crate::sim::state::Adversary;

    #[test]
    fn test_snapshot_serializes() {
        let mut state = SimulationState::new(3, Settings::default());
        state.request(PhaseCommand::Advance);
        state.request(PhaseCommand::Start);
        let mut adv = Adversary::new(AdversaryKind::Brute, Vec2::new(10.0, 20.0), 15.0, 1, 1.0);
        adv.freeze(10);
        state.registry.add_adversary(adv);

        let snapshot = FrameSnapshot::capture(&state);
        assert_eq!(snapshot.entity_count(), 1);
        assert_eq!(snapshot.crew.len(), 9);

        let json = serde_json::to_value(&snapshot).expect("serializes");
        assert_eq!(json["phase"], "Playing");
        assert_eq!(json["adversaries"][0]["kind"], "Brute");
        assert_eq!(json["adversaries"][0]["size"], 25.0);
        assert_eq!(json["adversaries"][0]["frozen"], true);
        assert_eq!(json["stage"], "Harbor Village");
        assert!(json["events"].as_array().is_some_and(|e| !e.is_empty()));
    }
}
