//! Maze Shooter headless runner
//!
//! Loads a level and settings, then drives the frame loop with scripted
//! input and a draw-call counter in place of a graphics backend.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use maze_shooter::Settings;
use maze_shooter::renderer::{Renderer, draw_world};
use maze_shooter::sim::{
    BoxObstacle, Camera, FrameInput, FrameOutcome, GameEvent, GridMap, Sphere, WorldState, tick,
};

/// First-person grid maze shooter (headless simulation)
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level file (square grid of 1/0/F/P/e); built-in level if omitted
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// Settings JSON file; defaults if omitted
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Maximum number of frames to simulate
    #[arg(short, long, default_value_t = 3600)]
    frames: u64,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Hold the fire button every frame
    #[arg(long)]
    fire: bool,

    /// Hold the forward key every frame
    #[arg(long)]
    forward: bool,

    /// Write the effective settings as JSON to this file and exit
    #[arg(long, value_name = "FILE")]
    write_settings: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Counts draw calls instead of rendering them
#[derive(Default)]
struct DrawCounter {
    boxes: usize,
    spheres: usize,
}

impl Renderer for DrawCounter {
    fn set_camera(&mut self, _camera: &Camera) {}

    fn draw_box(&mut self, _obstacle: &BoxObstacle) {
        self.boxes += 1;
    }

    fn draw_sphere(&mut self, _sphere: &Sphere) {
        self.spheres += 1;
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);
    log::info!("Maze Shooter (headless) starting...");

    if !(args.dt.is_finite() && args.dt > 0.0) {
        anyhow::bail!("--dt must be a positive number of seconds, got {}", args.dt);
    }

    let settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(path) = &args.write_settings {
        settings
            .save(path)
            .with_context(|| format!("writing settings to {}", path.display()))?;
        return Ok(ExitCode::SUCCESS);
    }

    let map = match &args.map {
        Some(path) => {
            GridMap::load(path).with_context(|| format!("loading map from {}", path.display()))?
        }
        None => GridMap::default_level().context("building the built-in level")?,
    };

    let mut world = WorldState::new(map, settings);
    let input = FrameInput {
        forward: args.forward,
        fire: args.fire,
        ..Default::default()
    };
    let mut counter = DrawCounter::default();
    let mut outcome = FrameOutcome::Continue;

    for _ in 0..args.frames {
        outcome = tick(&mut world, &input, args.dt);
        for event in &world.events {
            match event {
                GameEvent::PlayerHit { health, .. } => log::info!("Player hit, {health} health left"),
                GameEvent::EnemyKilled { enemy_id, headshot } => {
                    log::info!("Enemy {enemy_id} down (headshot: {headshot})")
                }
                _ => {}
            }
        }
        draw_world(&world, &mut counter);
        if world.is_over() {
            break;
        }
    }

    log::info!(
        "Stopped after {} frames: {:?}, {} of {} enemies alive, {} box and {} sphere draws",
        world.frame,
        outcome,
        world.enemies_alive(),
        world.enemies.len(),
        counter.boxes,
        counter.spheres
    );

    Ok(match outcome {
        FrameOutcome::Lose => ExitCode::from(1),
        FrameOutcome::Win | FrameOutcome::Continue => ExitCode::SUCCESS,
    })
}
