//! Headless SortScope viewer
//!
//! Plays one trace through the full viewer loop with in-memory backends and
//! logs every step it shows:
//!
//! ```text
//! RUST_LOG=info sortscope-headless bubble "5, 1, 8, 4, 2, 7, 3, 6"
//! ```
//!
//! `SORTSCOPE_CONFIG` may name a JSON file with viewer configuration.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::env;
use std::fs;
use std::sync::Arc;

use log::{info, warn};
use thiserror::Error;
use tokio::sync::{mpsc, watch};

use sortscope_core::algorithm::state::Value;
use sortscope_core::algorithm::{ParseAlgorithmError, SortAlgorithm};
use sortscope_core::input::{format_values, parse_values, InputError};
use sortscope_core::temporal::playback::PlaybackPhase;
use sortscope_core::validation::correctness::{validate_trace, TraceViolation};
use sortscope_visualization::engine::{HeadlessOverlay, HeadlessRenderer, Viewport};
use sortscope_visualization::perspective::{run_viewer, ConfigError, ViewerCommand, ViewerConfig};
use sortscope_visualization::shell::{ShellError, VisualizationShell};
use sortscope_visualization::view::CodePanel;

const CONFIG_VAR: &str = "SORTSCOPE_CONFIG";

#[derive(Debug, Error)]
enum HeadlessError {
    #[error("usage: sortscope-headless <algorithm> <comma-separated values>")]
    Usage,

    #[error(transparent)]
    Algorithm(#[from] ParseAlgorithmError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("failed to read {path}: {source}")]
    ConfigRead {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("generated trace is invalid: {0}")]
    Trace(#[from] TraceViolation),

    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error("viewer loop stopped unexpectedly")]
    Disconnected,

    #[error("viewer task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

fn load_config() -> Result<ViewerConfig, HeadlessError> {
    let Ok(path) = env::var(CONFIG_VAR) else {
        return Ok(ViewerConfig::default());
    };
    let json = fs::read_to_string(&path).map_err(|source| HeadlessError::ConfigRead {
        path: path.clone(),
        source,
    })?;
    info!("Loaded viewer configuration from {}", path);
    Ok(ViewerConfig::from_json_str(&json)?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), HeadlessError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let (Some(name), Some(text)) = (args.next(), args.next()) else {
        return Err(HeadlessError::Usage);
    };
    let algorithm: SortAlgorithm = name.parse()?;
    let input: Arc<[Value]> = Arc::from(parse_values(&text)?);
    let config = load_config()?;

    let trace = algorithm.generate(Arc::clone(&input));
    let metrics = validate_trace(&trace)?;
    info!(
        "{} over [{}]: {} steps, {} comparisons, {} swaps, {} passes",
        algorithm.title(),
        format_values(&input),
        metrics.steps,
        metrics.comparisons,
        metrics.swaps,
        metrics.passes
    );

    let renderer = HeadlessRenderer::new();
    let overlay = HeadlessOverlay::new();
    let code = CodePanel::new();
    let mut shell = VisualizationShell::new(
        renderer.clone(),
        overlay.clone(),
        code.clone(),
        config.playback.clone(),
        config.scene.clone(),
        input,
    );
    shell.select_algorithm(algorithm)?;
    shell.mount(Viewport::default())?;
    info!("Pseudocode:\n{}", code.render_text());

    let (commands, receiver) = mpsc::unbounded_channel();
    let (status_tx, mut status) = watch::channel(shell.status());
    let viewer = tokio::spawn(run_viewer(
        shell,
        receiver,
        status_tx,
        config.frame_interval(),
    ));
    commands
        .send(ViewerCommand::Start)
        .map_err(|_| HeadlessError::Disconnected)?;

    // Very short step delays can coalesce status updates; only shown steps are logged.
    let mut shown = None;
    loop {
        status
            .changed()
            .await
            .map_err(|_| HeadlessError::Disconnected)?;
        let current = *status.borrow_and_update();
        if current.current_index != shown {
            shown = current.current_index;
            if let Some((index, step)) = shown.and_then(|i| trace.step(i).map(|step| (i, step))) {
                info!(
                    "step {:>3}/{}  [{}]  lines {}  {}",
                    index,
                    trace.last_index(),
                    format_values(&step.array),
                    step.highlighted_lines,
                    code.highlighted_text().join(" | ")
                );
            }
        }
        if current.phase == PlaybackPhase::Finished {
            break;
        }
    }

    commands
        .send(ViewerCommand::Shutdown)
        .map_err(|_| HeadlessError::Disconnected)?;
    viewer.await?;

    info!("Final array [{}]", format_values(trace.final_array()));
    match serde_json::to_string(&renderer.journal()) {
        Ok(journal) => info!("Renderer journal {}", journal),
        Err(err) => warn!("Failed to serialize renderer journal: {}", err),
    }
    match serde_json::to_string(&overlay.journal()) {
        Ok(journal) => info!("Overlay journal {}", journal),
        Err(err) => warn!("Failed to serialize overlay journal: {}", err),
    }
    Ok(())
}
