//! The frame loop.
//!
//! Each frame:
//!
//! 1. `start_update` on the screen;
//! 2. wait out the rest of the minimum frame interval, if one is set;
//! 3. poll input (a closed screen ends the loop);
//! 4. dispatch the polled events to the game state;
//! 5. `advance_state(dt)`;
//! 6. clear events, draw, `finish_update`.

use std::time::{Duration, Instant};

use engine_component::Surface;
use engine_world::{Event, GameState, WorldError};
use tracing::{debug, info};

/// Errors reported by the window collaborator.
#[derive(Debug, thiserror::Error)]
#[error("screen error: {0}")]
pub struct ScreenError(pub String);

/// The window and input source.
pub trait Screen: Surface {
    /// Begin a frame.
    fn start_update(&mut self);

    /// Gather pending input. Returns `Ok(false)` once the window is closed.
    fn poll_events(&mut self) -> Result<bool, ScreenError>;

    /// Events gathered by the last poll.
    fn events(&self) -> &[Event];

    fn clear_events(&mut self);

    /// Present the frame.
    fn finish_update(&mut self);
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Screen(#[from] ScreenError),

    #[error(transparent)]
    World(#[from] WorldError),
}

/// Configuration for the frame loop.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Simulation step per frame, in seconds.
    pub dt: f32,
    /// Frames are never started closer together than this.
    pub min_update_interval: Option<Duration>,
    /// Stop after this many frames (0 = until the screen closes).
    pub max_frames: u64,
}

impl ControllerConfig {
    #[must_use]
    pub fn with_dt(mut self, dt: f32) -> Self {
        self.dt = dt;
        self
    }

    #[must_use]
    pub fn with_min_update_interval(mut self, interval: Option<Duration>) -> Self {
        self.min_update_interval = interval;
        self
    }

    #[must_use]
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = max_frames;
        self
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            min_update_interval: None,
            max_frames: 0,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames fully simulated and drawn.
    pub frames: u64,
    /// Whether the screen was closed (as opposed to hitting the frame limit).
    pub closed: bool,
}

/// Owns the screen and the game state and drives them frame by frame.
pub struct Controller<S> {
    screen: S,
    state: GameState,
    config: ControllerConfig,
}

impl<S: Screen> Controller<S> {
    #[must_use]
    pub fn new(screen: S, state: GameState, config: ControllerConfig) -> Self {
        Self { screen, state, config }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn screen(&self) -> &S {
        &self.screen
    }

    /// Run until the screen closes or the frame limit is reached.
    ///
    /// The first error from the screen or the game state ends the run.
    pub fn run(&mut self) -> Result<RunSummary, ControllerError> {
        info!(
            dt = self.config.dt,
            max_frames = self.config.max_frames,
            min_update_interval_ms = self.config.min_update_interval.map(|d| d.as_millis() as u64),
            "starting frame loop"
        );

        let mut frames = 0u64;
        let mut last_update: Option<Instant> = None;
        loop {
            if self.config.max_frames > 0 && frames >= self.config.max_frames {
                info!(frames, "frame limit reached");
                return Ok(RunSummary { frames, closed: false });
            }

            self.screen.start_update();
            if let Some(interval) = self.config.min_update_interval
                && let Some(last) = last_update
            {
                let elapsed = last.elapsed();
                if elapsed < interval {
                    std::thread::sleep(interval - elapsed);
                }
            }

            if !self.screen.poll_events()? {
                info!(frames, "screen closed");
                return Ok(RunSummary { frames, closed: true });
            }
            last_update = Some(Instant::now());

            self.step()?;
            frames += 1;
        }
    }

    /// Dispatch events, simulate, clear events, then draw and present.
    fn step(&mut self) -> Result<(), ControllerError> {
        let events = self.screen.events().to_vec();
        for event in &events {
            self.state.handle_event(event)?;
        }
        if !events.is_empty() {
            debug!(frame = self.state.frame(), count = events.len(), "dispatched events");
        }

        self.state.advance_state(self.config.dt)?;
        self.screen.clear_events();

        self.state.draw(&mut self.screen)?;
        self.screen.finish_update();
        Ok(())
    }
}
