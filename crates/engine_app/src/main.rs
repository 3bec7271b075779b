//! # engine_app: headless runner
//!
//! Loads a scene, builds the game state and drives it through the frame loop
//! on a [`HeadlessScreen`](headless::HeadlessScreen).
//!
//! ## Startup Sequence
//!
//! 1. Initialise logging (`RUST_LOG` overrides the `engine_app=info` default).
//! 2. Load the scene given by `--scene`, or the built-in default level.
//! 3. Register systems and spawn the scene's entities.
//! 4. Run the frame loop until `--frames` frames have run or the screen
//!    closes.

mod controller;
mod headless;
mod player;
mod scene;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use engine_world::GameState;
use tracing::info;
use tracing_subscriber::EnvFilter;

use controller::{Controller, ControllerConfig};
use scene::Scene;

#[derive(Parser)]
#[command(name = "engine_app", about = "Run a 2D engine scene headlessly")]
struct Args {
    /// Path to a JSON scene file; the default level is used if omitted or
    /// unreadable
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Number of frames to run (0 = until the screen closes)
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Minimum wall-clock time between frames, in milliseconds
    #[arg(long)]
    min_frame_ms: Option<u64>,

    /// Simulation step per frame, in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
}

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("engine_app=info".parse()?))
        .init();

    let args = Args::parse();
    info!("engine starting");

    let scene = Scene::load_or_default(args.scene.as_deref());
    let mut state = GameState::new();
    scene.populate(&mut state)?;

    let config = ControllerConfig::default()
        .with_dt(args.dt)
        .with_max_frames(args.frames)
        .with_min_update_interval(args.min_frame_ms.map(Duration::from_millis));

    let mut controller = Controller::new(scene.screen(), state, config);
    let summary = controller.run()?;

    let state = controller.state();
    if let Ok(id) = state.entity_by_type("player")
        && let Some(player) = state.get(id)
    {
        let body = player.body();
        info!(
            position = ?body.transform.translation,
            velocity = ?body.velocity,
            "final player state"
        );
    }

    let last_frame = controller.screen().last_frame();
    info!(
        frames = summary.frames,
        closed = summary.closed,
        presented = controller.screen().frames_presented(),
        rectangles = last_frame.rectangles.len(),
        texts = last_frame.texts.len(),
        entities = state.entity_count(),
        "engine shut down"
    );
    Ok(())
}
