//! Headless driver for the graph viewport and LOD core.
//!
//! Builds a seeded random graph, runs it through the engine for a number of
//! frames against the in-memory backend while a script moves the camera, and
//! prints the final diagnostics as JSON.

mod script;
mod sim;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use rand::Rng;
use scene::backend::HeadlessBackend;
use scene::config::{ConfigError, SceneConfig};
use scene::diagnostics::Diagnostics;
use scene::engine::{EngineCore, Event, FrameReport};
use scene::graph::NodeId;
use scene::input::{Button, WheelDelta};
use scene::viewport::Point;
use serde::Serialize;

use crate::script::{Script, Step};
use crate::sim::Simulation;

const FRAME_DT: f64 = 1.0 / 60.0;
const SUMMARY_EVERY: u64 = 60;
const FIT_PADDING_PX: f64 = 40.0;

#[derive(Debug, thiserror::Error)]
enum DriverError {
    #[error("failed to read config {path}: {source}")]
    ReadConfig { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

#[derive(Parser, Debug)]
#[command(name = "graphview", about = "Headless frame-loop driver for the graph viewport and LOD core")]
struct Cli {
    /// Number of nodes to generate.
    #[arg(long, default_value_t = 430)]
    nodes: usize,

    /// Number of edges to generate.
    #[arg(long, default_value_t = 1549)]
    edges: usize,

    /// Frames to run.
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Surface width in device pixels.
    #[arg(long, default_value_t = 1390.0)]
    width: f64,

    /// Surface height in device pixels.
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Rng seed; random when omitted.
    #[arg(long, env = "GRAPHVIEW_SEED")]
    seed: Option<u64>,

    /// JSON scene config; falls back to `GRAPHVIEW_*` variables.
    #[arg(long, env = "GRAPHVIEW_CONFIG")]
    config: Option<PathBuf>,

    /// Pace frames at 60 Hz instead of running flat out.
    #[arg(long)]
    realtime: bool,

    /// Simulate GPU context loss at this frame.
    #[arg(long)]
    lose_context_at: Option<u64>,
}

/// Counters accumulated over the run.
#[derive(Debug, Default, Serialize)]
struct RunTotals {
    frames: u64,
    submitted: u64,
    skipped: u64,
    created: usize,
    destroyed: usize,
    detail_changes: usize,
    visibility_changes: usize,
    position_updates: usize,
    selection_changes: usize,
    context_events: usize,
}

impl RunTotals {
    fn record(&mut self, report: &FrameReport) {
        self.frames += 1;
        if report.submitted {
            self.submitted += 1;
        } else {
            self.skipped += 1;
        }
        self.created += report.sync.created;
        self.destroyed += report.sync.destroyed;
        self.detail_changes += report.sync.detail_changes;
        self.visibility_changes += report.sync.visibility_changes;
        self.position_updates += report.sync.position_updates;
        for event in &report.events {
            match event {
                Event::SelectionChanged { selected } => {
                    tracing::info!(frame = report.frame, ?selected, "selection changed");
                    self.selection_changes += 1;
                }
                Event::ContextStatusChanged { status } => {
                    tracing::info!(frame = report.frame, ?status, "context status changed");
                    self.context_events += 1;
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct RunReport {
    seed: u64,
    totals: RunTotals,
    diagnostics: Diagnostics,
}

#[tokio::main]
async fn main() -> Result<(), DriverError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if !(cli.width.is_finite() && cli.height.is_finite() && cli.width > 0.0 && cli.height > 0.0) {
        return Err(DriverError::InvalidArgs(format!("surface size must be positive, got {}x{}", cli.width, cli.height)));
    }
    let config = load_config(cli.config.as_deref())?;
    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());

    tracing::info!(seed, nodes = cli.nodes, edges = cli.edges, frames = cli.frames, "starting run");
    let report = run(&cli, config, seed).await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SceneConfig, DriverError> {
    let Some(path) = path else {
        return Ok(SceneConfig::from_env()?);
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|source| DriverError::ReadConfig { path: path.to_path_buf(), source })?;
    Ok(SceneConfig::from_json(&raw)?)
}

async fn run(cli: &Cli, config: SceneConfig, seed: u64) -> RunReport {
    let mut sim = Simulation::new(seed);
    let (nodes, edges) = sim.generate(cli.nodes, cli.edges);

    let mut engine = EngineCore::with_size(config, cli.width, cli.height);
    engine.load_snapshot(nodes, edges);
    let mut backend = HeadlessBackend::new();
    let script = Script::new(cli.frames, cli.lose_context_at);
    tracing::debug!(steps = script.step_count(), "script ready");
    let mut totals = RunTotals::default();
    let mut ticker = cli.realtime.then(|| tokio::time::interval(Duration::from_secs_f64(FRAME_DT)));

    for frame in 1..=cli.frames {
        if let Some(ticker) = ticker.as_mut() {
            ticker.tick().await;
        }

        // Input first, then the simulation step, then the frame.
        for step in script.steps_at(frame) {
            apply_step(step, &mut engine, &mut backend, &mut sim);
        }
        let moved = sim.jitter(engine.graph().nodes());
        engine.apply_positions(moved);

        let report = engine.frame(FRAME_DT, &mut backend);
        totals.record(&report);

        if frame % SUMMARY_EVERY == 0 || frame == cli.frames {
            log_summary(&engine.diagnostics());
        }
    }

    RunReport { seed, totals, diagnostics: engine.diagnostics() }
}

fn apply_step(step: Step, engine: &mut EngineCore, backend: &mut HeadlessBackend, sim: &mut Simulation) {
    tracing::debug!(?step, "scripted step");
    let center = engine.viewport().screen_center();
    match step {
        Step::FitGraph => engine.fit_to_graph(FIT_PADDING_PX),
        Step::ZoomBy(factor) => engine.zoom_by(factor, center),
        Step::SelectRandomNode => {
            let mut ids: Vec<NodeId> = engine.graph().nodes().map(|n| n.id).collect();
            ids.sort_unstable();
            if let Some(i) = sim.pick(ids.len()) {
                engine.select(ids[i]);
            }
        }
        Step::Drag { dx, dy } => {
            engine.on_pointer_down(center, Button::Primary);
            engine.on_pointer_move(Point::new(center.x + dx / 2.0, center.y + dy / 2.0));
            let end = Point::new(center.x + dx, center.y + dy);
            engine.on_pointer_move(end);
            engine.on_pointer_up(end, Button::Primary);
        }
        Step::Wheel { dy } => engine.on_wheel(center, WheelDelta::new(0.0, dy)),
        Step::ResetView => engine.reset_view(),
        Step::LoseContext => {
            backend.lose_context();
            engine.on_context_lost();
        }
        Step::RestoreContext => {
            backend.restore_context();
            engine.on_context_restored();
        }
    }
}

fn log_summary(d: &Diagnostics) {
    tracing::info!(
        frame = d.frames,
        zoom = d.viewport.zoom,
        visible_nodes = d.renderables.visible_nodes,
        visible_edges = d.renderables.visible_edges,
        full = d.nodes.full,
        medium = d.nodes.medium,
        low = d.nodes.low,
        culled = d.nodes.culled,
        failed = d.renderables.failed,
        skipped_frames = d.skipped_frames,
        context = ?d.context,
        "frame summary"
    );
}
