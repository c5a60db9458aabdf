//! Tideclash headless runner
//!
//! Plays the game with the autopilot at a fixed timestep and streams frame
//! snapshots as JSON lines in place of a renderer.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use tideclash::audio::AudioManager;
use tideclash::consts::{MAX_SUBSTEPS, SIM_DT};
use tideclash::platform::{AudioSink, JsonLinesRenderer, LogAudioSink, NullRenderer, Renderer};
use tideclash::sim::{
    FrameSnapshot, GameEvent, GamePhase, PhaseCommand, SimulationState, TickInput, tick,
};
use tideclash::{ConfigError, Difficulty, Settings};

#[derive(Parser, Debug)]
#[command(name = "tideclash", version, about = "Headless autopilot run of the brawler core")]
struct Cli {
    /// Difficulty: easy, medium or hard (defaults to the settings file)
    #[arg(short, long)]
    difficulty: Option<String>,

    /// RNG seed
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Rendered frames to run
    #[arg(short, long, default_value_t = 3600)]
    frames: u64,

    /// Display refresh rate the runner pretends to render at
    #[arg(long, default_value_t = 60.0)]
    render_hz: f32,

    /// Settings JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write snapshots here (`-` for stdout)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Only emit every Nth rendered frame
    #[arg(long, default_value_t = 1)]
    snapshot_every: u64,

    /// Start a new session after game over instead of stopping
    #[arg(long)]
    restart: bool,

    /// Master volume for the logged audio sink
    #[arg(long, default_value_t = 0.8)]
    volume: f32,

    #[arg(long)]
    mute: bool,
}

#[derive(Debug, Default)]
struct RunSummary {
    rendered: u64,
    sessions: u32,
    best_score: u32,
    bosses_defeated: u32,
    events: u64,
    cues: u64,
}

fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from_file(path)
            .with_context(|| format!("failed to load settings: {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(name) = &cli.difficulty {
        settings.difficulty = Difficulty::from_str(name)
            .ok_or_else(|| ConfigError::UnknownDifficulty(name.clone()))?;
    }
    Ok(settings)
}

fn run<R: Renderer>(cli: &Cli, state: &mut SimulationState, renderer: &mut R) -> RunSummary {
    let mut audio = AudioManager::new(LogAudioSink::default());
    audio.set_master_volume(cli.volume);
    audio.set_muted(cli.mute);

    let frame_dt = 1.0 / cli.render_hz.max(1.0);
    let every = cli.snapshot_every.max(1);
    let mut summary = RunSummary {
        sessions: 1,
        ..Default::default()
    };
    let mut input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut accumulator = 0.0f32;

    for frame in 0..cli.frames {
        accumulator += frame_dt.min(0.1);

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, &input);
            accumulator -= SIM_DT;
            substeps += 1;

            // Commands are one-shot
            input.command = None;
            record_tick(state, &mut summary, &mut audio);
        }

        if frame % every == 0 {
            renderer.render(&FrameSnapshot::capture(state));
            summary.rendered += 1;
        }

        if state.phase == GamePhase::GameOver {
            if !cli.restart {
                break;
            }
            if input.command.is_none() {
                summary.sessions += 1;
                input.command = Some(PhaseCommand::Restart);
            }
        }
    }

    summary.best_score = summary.best_score.max(state.score());
    log::info!("Played {} sound cues", audio.sink().played());
    summary
}

/// Play the latest tick's cues and tally its events; the next tick clears them
fn record_tick<S: AudioSink>(
    state: &mut SimulationState,
    summary: &mut RunSummary,
    audio: &mut AudioManager<S>,
) {
    let cues = state.events.drain_cues();
    summary.cues += cues.len() as u64;
    audio.play_all(cues);

    for event in state.events.events() {
        summary.events += 1;
        match event {
            GameEvent::BossDefeated { .. } => summary.bosses_defeated += 1,
            GameEvent::GameOver { score } => {
                summary.best_score = summary.best_score.max(*score);
            }
            other => log::debug!("{other:?}"),
        }
    }
}

fn open_output(path: &Path) -> Result<Box<dyn Write>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }
    let file = File::create(path)
        .with_context(|| format!("failed to create snapshot file: {}", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    let difficulty = settings.difficulty;

    log::info!(
        "Tideclash starting: seed {}, difficulty {}, {} frames",
        cli.seed,
        difficulty.as_str(),
        cli.frames
    );

    let mut state = SimulationState::new(cli.seed, settings);
    state.request(PhaseCommand::Advance);
    state.request(PhaseCommand::SelectDifficulty(difficulty));

    let summary = match &cli.out {
        Some(path) => {
            let mut renderer = JsonLinesRenderer::new(open_output(path)?);
            let summary = run(&cli, &mut state, &mut renderer);
            log::info!("Wrote {} snapshots", renderer.frames_written());
            renderer
                .into_inner()
                .flush()
                .context("failed to flush snapshots")?;
            summary
        }
        None => run(&cli, &mut state, &mut NullRenderer),
    };

    eprintln!("Run complete.");
    eprintln!("  Seed:            {}", cli.seed);
    eprintln!("  Difficulty:      {}", difficulty.as_str());
    eprintln!("  Ticks:           {}", state.time_ticks);
    eprintln!("  Phase:           {}", state.phase.as_str());
    eprintln!("  Sessions:        {}", summary.sessions);
    eprintln!("  Best score:      {}", summary.best_score);
    eprintln!("  Stage:           {}", state.progression.current_stage().name);
    eprintln!("  Bosses defeated: {}", summary.bosses_defeated);
    eprintln!("  Crew unlocked:   {}", state.crew.unlocked_count());
    eprintln!("  Frames rendered: {}", summary.rendered);
    eprintln!("  Events / cues:   {} / {}", summary.events, summary.cues);
    Ok(())
}
