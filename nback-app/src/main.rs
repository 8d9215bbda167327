//! N-back session runner: training demos, pre-test, break, post-test.

mod app;
mod audio;
mod bridge;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use nback_core::{Condition, TrialRecord};
use nback_experiment::{
    AbortToken, BreakScreen, ExperimentConfig, ExperimentError, ExportFormat, Session, export,
};
use nback_render::SkiaRenderer;
use nback_timing::HighPrecisionTimer;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

use crate::app::App;
use crate::audio::{CommandAudio, DEFAULT_PLAYER};
use crate::bridge::{ChannelDisplay, ChannelInput, UiCommand};

/// Letter-memory training and test session
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Participant number; selects the condition
    #[arg(short, long)]
    participant: u32,

    /// JSON file overriding the default experiment settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the record file is written to
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory holding <LETTER>.wav clips for the auditory conditions
    #[arg(long, default_value = "audio")]
    audio_dir: PathBuf,

    /// Program used to play clips
    #[arg(long, default_value = DEFAULT_PLAYER)]
    audio_player: String,

    /// TrueType/OpenType font for all on-screen text
    #[arg(long)]
    font: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Set the log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Seed for the sequence generator
    #[arg(long)]
    seed: Option<u64>,

    /// Run in a 1280x720 window instead of fullscreen
    #[arg(long)]
    windowed: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

impl From<Format> for ExportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Csv => ExportFormat::Csv,
            Format::Json => ExportFormat::Json,
        }
    }
}

type SessionOutcome = (Vec<TrialRecord>, Result<(), ExperimentError>);

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_level).context("invalid --log-level")?)
        .with_target(false)
        .init();

    let condition = Condition::assign(cli.participant);
    if condition.is_folded() {
        warn!(
            participant = cli.participant,
            condition = condition.label(),
            "participant number is a multiple of 4, assigned to the fourth condition"
        );
    }
    let config = load_config(cli.config.as_deref())?;
    config.validate().context("invalid experiment settings")?;
    let font = SkiaRenderer::load_font(&cli.font)?;

    info!(
        participant = condition.participant_id,
        condition = condition.label(),
        platform = std::env::consts::OS,
        "starting session"
    );

    let event_loop = EventLoop::<UiCommand>::with_user_event().build()?;
    let proxy = event_loop.create_proxy();
    let (key_tx, key_rx) = mpsc::channel();
    let (shown_tx, shown_rx) = mpsc::channel();
    let abort = AbortToken::new();

    let worker = {
        let display = ChannelDisplay::new(proxy.clone(), shown_rx, abort.clone());
        let input = ChannelInput::new(key_rx, config.keys.abort, abort.clone());
        let audio = CommandAudio::new(&cli.audio_dir, cli.audio_player.clone());
        let rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let config = config.clone();
        thread::Builder::new()
            .name("session".into())
            .spawn(move || -> SessionOutcome {
                let outcome = match Session::new(
                    config,
                    condition,
                    display,
                    audio,
                    input,
                    HighPrecisionTimer::new(),
                    rng,
                ) {
                    Ok(mut session) => {
                        let result = session.run(&mut BreakScreen);
                        (session.into_recorder().into_records(), result)
                    }
                    Err(e) => (Vec::new(), Err(e)),
                };
                let _ = proxy.send_event(UiCommand::Exit);
                outcome
            })?
    };

    let mut app = App::new(font, shown_tx, key_tx, abort.clone(), !cli.windowed);
    let ui_result = event_loop.run_app(&mut app);
    abort.abort();
    drop(app);

    let (records, result) = worker
        .join()
        .map_err(|_| anyhow!("session thread panicked"))?;

    match &result {
        Ok(()) => info!(records = records.len(), "session finished"),
        Err(ExperimentError::Aborted) => {
            warn!(records = records.len(), "session aborted, saving partial records")
        }
        Err(e) => error!(error = %e, records = records.len(), "session failed, saving partial records"),
    }
    save(&cli, &condition, &records)?;

    ui_result?;
    match result {
        Ok(()) | Err(ExperimentError::Aborted) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn load_config(path: Option<&Path>) -> Result<ExperimentConfig> {
    let Some(path) = path else {
        return Ok(ExperimentConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    ExperimentConfig::from_json(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

fn save(cli: &Cli, condition: &Condition, records: &[TrialRecord]) -> Result<()> {
    if records.is_empty() {
        warn!("no trials were completed, nothing to save");
        return Ok(());
    }
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    export::write_records(&cli.data_dir, condition, &date, cli.format.into(), records)
        .context("failed to write records")?;
    Ok(())
}
