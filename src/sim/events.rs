//! One-shot events emitted during a frame
//!
//! `tick` clears the queue before it runs, so it only ever holds the output
//! of the latest frame. Hosts read or drain it after every tick: events feed
//! HUD messages and logs, cues feed the audio sink.

use glam::Vec2;
use serde::Serialize;

use super::boss::BossKind;
use super::phase::GamePhase;
use super::state::{AdversaryKind, PowerUpKind};
use crate::audio::SoundCue;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    AdversaryDefeated {
        id: u32,
        kind: AdversaryKind,
        pos: Vec2,
    },
    PowerUpDropped {
        kind: PowerUpKind,
        pos: Vec2,
    },
    PowerUpCollected {
        kind: PowerUpKind,
    },
    AreaCleared {
        count: u32,
    },
    PowerModeActivated {
        ticks: u32,
    },
    StageAdvanced {
        stage: usize,
        name: &'static str,
    },
    BonusScore {
        amount: u32,
    },
    CrewUnlocked {
        index: usize,
        name: &'static str,
    },
    CrewAbilityUsed {
        index: usize,
        name: &'static str,
    },
    BossAppeared {
        kind: BossKind,
    },
    BossDefeated {
        kind: BossKind,
    },
    PhaseChanged {
        from: GamePhase,
        to: GamePhase,
    },
    GameOver {
        score: u32,
    },
}

/// Outbox of events and sound cues for the latest frame
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
    cues: Vec<SoundCue>,
}

impl EventQueue {
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn cue(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }

    /// Pending events, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn cues(&self) -> &[SoundCue] {
        &self.cues
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.cues.clear();
    }
}
