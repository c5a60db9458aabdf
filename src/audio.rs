//! Abstract sound cues
//!
//! The simulation only names the cue; playback belongs to whatever
//! `AudioSink` the host plugs into the `AudioManager`.

use serde::{Deserialize, Serialize};

use crate::platform::AudioSink;

/// Sound cue identifiers emitted by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Basic attack thrown
    Punch,
    /// An attack connected
    Hit,
    /// Adversary defeated
    Defeat,
    /// Power field unleashed
    PowerField,
    /// Power mode switched on
    PowerModeActivated,
    /// Power-up picked up
    PowerUpCollected,
    /// Crew ability used
    CrewAbility,
    /// Crew member joined
    CrewUnlocked,
    /// Boss entered the field
    BossAppeared,
    /// Boss went down
    BossDefeated,
    /// Moved on to the next stage
    StageAdvanced,
    /// Run ended
    GameOver,
}

impl SoundCue {
    /// Stable identifier for asset lookup on the host side
    pub fn id(&self) -> &'static str {
        match self {
            SoundCue::Punch => "punch",
            SoundCue::Hit => "hit",
            SoundCue::Defeat => "defeat",
            SoundCue::PowerField => "power-field",
            SoundCue::PowerModeActivated => "power-mode-activated",
            SoundCue::PowerUpCollected => "power-up",
            SoundCue::CrewAbility => "crew-ability",
            SoundCue::CrewUnlocked => "crew-unlocked",
            SoundCue::BossAppeared => "boss-appeared",
            SoundCue::BossDefeated => "boss-defeated",
            SoundCue::StageAdvanced => "stage-advanced",
            SoundCue::GameOver => "game-over",
        }
    }

    /// Relative loudness of the cue before user volume
    pub fn base_gain(&self) -> f32 {
        match self {
            SoundCue::Punch | SoundCue::Hit | SoundCue::Defeat => 0.5,
            SoundCue::GameOver | SoundCue::PowerField | SoundCue::BossAppeared => 0.7,
            _ => 0.6,
        }
    }
}

/// Volume handling in front of an `AudioSink`
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Forward a cue to the sink, skipping silent ones
    pub fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume() * cue.base_gain();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(cue, vol);
    }

    /// Play every cue drained from a frame
    pub fn play_all(&mut self, cues: impl IntoIterator<Item = SoundCue>) {
        for cue in cues {
            self.play(cue);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
