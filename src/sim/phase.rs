//! Top-level game phase machine
//!
//! Hosts request transitions with a `PhaseCommand`; the machine checks the
//! command is legal from the current phase and performs the reset side
//! effects. `GameOver` is only entered by the combat resolver.

use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::state::SimulationState;
use crate::audio::SoundCue;
use crate::settings::Difficulty;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen
    Menu,
    /// Choosing Easy/Medium/Hard
    DifficultySelect,
    /// Active gameplay; the only phase in which the simulation advances
    Playing,
    /// Simulation frozen, last frame still rendered
    Paused,
    /// Picking the active crew unit (simulation frozen)
    CrewManagement,
    /// Run ended
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::DifficultySelect => "difficulty_select",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::CrewManagement => "crew_management",
            GamePhase::GameOver => "game_over",
        }
    }

    pub fn is_simulating(&self) -> bool {
        matches!(self, GamePhase::Playing)
    }
}

/// Transition requests routed from input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseCommand {
    /// Leave the title screen
    Advance,
    /// Pick a difficulty and start playing
    SelectDifficulty(Difficulty),
    /// Start playing with the current difficulty
    Start,
    TogglePause,
    OpenCrew,
    /// Make an unlocked crew unit the active one
    SelectCrew(usize),
    CloseCrew,
    /// Start a fresh match from game over or pause
    Restart,
    QuitToMenu,
}

impl SimulationState {
    /// Apply a phase command; returns false (and changes nothing) when illegal
    pub fn request(&mut self, command: PhaseCommand) -> bool {
        use GamePhase::*;
        use PhaseCommand::*;

        let next = match (self.phase, command) {
            (Menu, Advance) => DifficultySelect,
            (DifficultySelect, SelectDifficulty(difficulty)) => {
                self.set_difficulty(difficulty);
                self.reset_session();
                Playing
            }
            (DifficultySelect, Start) | (GameOver, Restart) | (Paused, Restart) => {
                self.reset_session();
                Playing
            }
            (DifficultySelect, QuitToMenu) | (Paused, QuitToMenu) | (GameOver, QuitToMenu) => Menu,
            (Playing, TogglePause) => Paused,
            (Paused, TogglePause) => Playing,
            (Playing, OpenCrew) | (Paused, OpenCrew) => CrewManagement,
            (CrewManagement, CloseCrew) => Paused,
            (CrewManagement, SelectCrew(index)) => {
                if !self.crew.select(index) {
                    log::debug!("Crew unit {index} is not selectable");
                    return false;
                }
                log::info!("Active crew: {}", self.crew.units[index].name);
                return true;
            }
            (phase, command) => {
                log::debug!("Ignoring {command:?} in {}", phase.as_str());
                return false;
            }
        };
        self.change_phase(next);
        true
    }

    /// End the run; called by the resolver on a lethal contact
    pub(crate) fn enter_game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        let score = self.progression.score;
        self.change_phase(GamePhase::GameOver);
        self.events.emit(GameEvent::GameOver { score });
        self.events.cue(SoundCue::GameOver);
    }

    fn change_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        self.phase = to;
        if from != to {
            log::info!("Phase {} -> {}", from.as_str(), to.as_str());
            self.events.emit(GameEvent::PhaseChanged { from, to });
        }
    }
}
