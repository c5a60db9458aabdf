//! Score, stages and boss triggers

use serde::Serialize;

use super::boss::BossKind;

/// A themed stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub name: &'static str,
    pub theme: &'static str,
}

/// Cyclic stage sequence
pub const STAGES: [Stage; 6] = [
    Stage {
        name: "Harbor Village",
        theme: "shore",
    },
    Stage {
        name: "Dune Kingdom",
        theme: "desert",
    },
    Stage {
        name: "Cloud Isle",
        theme: "sky",
    },
    Stage {
        name: "Canal City",
        theme: "water",
    },
    Stage {
        name: "Coral Reef",
        theme: "undersea",
    },
    Stage {
        name: "Frost Cape",
        theme: "ice",
    },
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progression {
    pub score: u32,
    /// Index into `STAGES`
    pub stage: usize,
    /// A boss fight is underway or pending; pauses the spawner
    pub boss_battle: bool,
    /// A stage boss was flagged while another boss was still live
    pub boss_queued: bool,
    /// Score at which the last boss was called in
    pub last_boss_trigger: Option<u32>,
    pub bosses_defeated: u32,
}

impl Progression {
    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn current_stage(&self) -> &'static Stage {
        &STAGES[self.stage % STAGES.len()]
    }

    /// Move to the next stage (wrapping) and flag a boss battle
    ///
    /// With a boss still live the flag is queued until that boss falls.
    pub fn advance_stage(&mut self, boss_live: bool) -> &'static Stage {
        self.stage = (self.stage + 1) % STAGES.len();
        if boss_live {
            self.boss_queued = true;
        }
        self.boss_battle = true;
        self.current_stage()
    }

    /// Boss guarding the current stage
    pub fn stage_boss(&self) -> BossKind {
        match self.stage {
            0 => BossKind::Tidecaller,
            1 => BossKind::Sandstorm,
            _ => BossKind::Stormlord,
        }
    }

    /// Should a boss be installed this frame?
    ///
    /// Never while a boss is live or adversaries remain. Otherwise on a
    /// flagged battle, or when the score sits on a fresh positive multiple of
    /// `interval`.
    pub fn should_spawn_boss(&self, interval: u32, boss_live: bool, adversaries_left: usize) -> bool {
        if boss_live || adversaries_left > 0 {
            return false;
        }
        if self.boss_battle {
            return true;
        }
        interval > 0
            && self.score > 0
            && self.score % interval == 0
            && self.last_boss_trigger != Some(self.score)
    }

    pub fn boss_spawned(&mut self) {
        self.boss_battle = true;
        self.last_boss_trigger = Some(self.score);
    }

    pub fn boss_defeated(&mut self, bonus: u32) {
        self.add_score(bonus);
        self.boss_battle = std::mem::take(&mut self.boss_queued);
        self.bosses_defeated += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
