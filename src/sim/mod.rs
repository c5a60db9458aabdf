//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per frame)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod attack;
pub mod autopilot;
pub mod boss;
pub mod combat;
pub mod cooldown;
pub mod crew;
pub mod events;
pub mod geometry;
pub mod phase;
pub mod progression;
pub mod registry;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use attack::{Attack, AttackKind, AttackOwner};
pub use boss::{Boss, BossKind, BossMotion};
pub use cooldown::Cooldown;
pub use crew::{AbilityContext, CrewAbility, CrewRoster, CrewUnit};
pub use events::{EventQueue, GameEvent};
pub use phase::{GamePhase, PhaseCommand};
pub use progression::{Progression, STAGES, Stage};
pub use registry::EntityRegistry;
pub use snapshot::FrameSnapshot;
pub use spawner::Spawner;
pub use state::{
    Adversary, AdversaryKind, Hp, Player, PowerUp, PowerUpKind, SimulationState, SpawnOrigin,
};
pub use tick::{TickInput, tick};
