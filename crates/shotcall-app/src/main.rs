//! ShotCall - headless shoot schedule runner
//!
//! Replays a JSON script of edit commands and grid gestures against a fresh
//! schedule and prints every change notification as a JSON line on stdout.
//!
//! Usage: `shotcall [--config <file>] [--out <file>] <script.json>`

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use shotcall_core::{ShotCallConfig, ShotId, Vec2};
use shotcall_grid::{GridGeometry, GridMode, GridSyncEngine};
use shotcall_timeline::{CommitOutcome, ScheduleCommand, ShotSchedule};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Counts shown on each grid.
const GRID_COUNTS: u32 = 512;

/// One entry of a script.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Step {
    Command(ScheduleCommand),
    Gesture(Gesture),
}

/// A full press/drag/release gesture on one of the grids, in scene pixels.
#[derive(Debug, Deserialize)]
struct Gesture {
    grid: GridMode,
    shot: ShotId,
    press: [f64; 2],
    #[serde(default)]
    drag: Vec<[f64; 2]>,
    release: [f64; 2],
}

struct Args {
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    script: PathBuf,
}

fn parse_args() -> Result<Args> {
    let mut config = None;
    let mut out = None;
    let mut script = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(args.next().context("--config needs a path")?.into()),
            "--out" => out = Some(args.next().context("--out needs a path")?.into()),
            _ if script.is_none() => script = Some(PathBuf::from(&arg)),
            _ => bail!("unexpected argument {arg:?}"),
        }
    }
    Ok(Args {
        config,
        out,
        script: script.context("usage: shotcall [--config <file>] [--out <file>] <script.json>")?,
    })
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => ShotCallConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ShotCallConfig::default(),
    };

    let data = std::fs::read(&args.script)
        .with_context(|| format!("reading script {}", args.script.display()))?;
    let steps: Vec<Step> = serde_json::from_slice(&data).context("parsing script")?;
    info!(steps = steps.len(), script = %args.script.display(), "ShotCall starting");

    let mut schedule = ShotSchedule::new(&config);
    emit_events(&mut schedule)?;

    let rows = GRID_COUNTS * config.grid.cells_per_count;
    let mut director_grid = GridSyncEngine::new(
        GridGeometry::new(Vec2::ZERO, 1, rows, config.grid),
        GridMode::Director,
    );
    let mut camera_grid = GridSyncEngine::new(
        GridGeometry::new(Vec2::ZERO, schedule.camera_count(), rows, config.grid),
        GridMode::Camera,
    );

    let mut rejected = 0usize;
    for step in steps {
        match step {
            Step::Command(command) => {
                if let CommitOutcome::Rejected { restore, .. } = schedule.dispatch(command) {
                    rejected += 1;
                    info!(?restore, "Restoring previous values");
                }
            }
            Step::Gesture(gesture) => {
                let grid = match gesture.grid {
                    GridMode::Director => &mut director_grid,
                    GridMode::Camera => &mut camera_grid,
                };
                if let Err(e) = run_gesture(grid, &mut schedule, &gesture) {
                    rejected += 1;
                    warn!(shot = %gesture.shot, error = %e, "Gesture not applied");
                }
            }
        }
        emit_events(&mut schedule)?;
    }

    schedule.check_invariants().context("schedule invariants")?;
    info!(shots = schedule.len(), rejected, "Script finished");

    if let Some(path) = &args.out {
        schedule
            .snapshot()
            .save_to_file(path)
            .with_context(|| format!("saving schedule {}", path.display()))?;
        info!(path = %path.display(), "Saved schedule");
    }
    Ok(())
}

fn run_gesture(
    grid: &mut GridSyncEngine,
    schedule: &mut ShotSchedule,
    gesture: &Gesture,
) -> Result<()> {
    let placement = grid
        .placement_of(schedule, gesture.shot)
        .with_context(|| format!("shot {} is not on the schedule", gesture.shot))?;

    let point = |[x, y]: [f64; 2]| Vec2::new(x, y);
    grid.press(gesture.shot, placement, point(gesture.press));
    for &pointer in &gesture.drag {
        grid.drag(point(pointer));
    }
    if let Some(commit) = grid.release(point(gesture.release)) {
        commit.apply(schedule)?;
    }
    Ok(())
}

fn emit_events(schedule: &mut ShotSchedule) -> Result<()> {
    for event in schedule.take_events() {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}
