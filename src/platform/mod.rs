//! Platform abstraction layer
//!
//! The simulation never draws or plays anything itself. Hosts plug in:
//! - `Renderer`: consumes a read-only `FrameSnapshot` once per rendered frame
//! - `AudioSink`: plays abstract `SoundCue`s at a given volume
//!
//! Headless implementations are provided for the native runner and tests.

use std::io::Write;

use crate::audio::SoundCue;
use crate::sim::snapshot::FrameSnapshot;

/// Draws a frame from the simulation's read-only view
pub trait Renderer {
    fn render(&mut self, snapshot: &FrameSnapshot<'_>);
}

/// Plays sound cues
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue, volume: f32);
}

/// Renderer that writes each snapshot as one JSON line
pub struct JsonLinesRenderer<W: Write> {
    out: W,
    frames_written: u64,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            frames_written: 0,
        }
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn render(&mut self, snapshot: &FrameSnapshot<'_>) {
        let written = serde_json::to_writer(&mut self.out, snapshot)
            .map_err(std::io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"));
        match written {
            Ok(()) => self.frames_written += 1,
            Err(e) => log::warn!("Dropped snapshot for frame {}: {e}", snapshot.frame),
        }
    }
}

/// Renderer that discards every frame
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _snapshot: &FrameSnapshot<'_>) {}
}

/// Audio sink that logs cues instead of playing them
#[derive(Debug, Default)]
pub struct LogAudioSink {
    played: u64,
}

impl LogAudioSink {
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for LogAudioSink {
    fn play(&mut self, cue: SoundCue, volume: f32) {
        self.played += 1;
        log::trace!("sfx {} @ {volume:.2}", cue.id());
    }
}
