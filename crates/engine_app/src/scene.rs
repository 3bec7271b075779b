//! Scene parameters.
//!
//! A scene file is JSON describing the level geometry, the player and a
//! script of input events. Missing fields take their defaults, and a scene
//! that cannot be read or parsed is replaced by the built-in default level.

use std::path::{Path, PathBuf};

use engine_component::Color;
use engine_math::Vec2;
use engine_system::{CollisionSystem, GridCollisionSystem, GridConfig, GridConfigError};
use engine_world::{Event, GameState, Key, WorldError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::headless::HeadlessScreen;
use crate::player::{self, Player};

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("failed to read scene {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scene {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid grid in scene {path}: {source}")]
    InvalidGrid {
        path: PathBuf,
        #[source]
        source: GridConfigError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerParams {
    pub spawn: Vec2,
    pub size: Vec2,
    pub max_jumps: u32,
    /// Horizontal speed in units per second.
    pub speed: f32,
    /// Vertical speed given by a jump.
    pub jump_speed: f32,
}

impl Default for PlayerParams {
    fn default() -> Self {
        Self {
            spawn: Vec2::new(-3.0, 0.0),
            size: Vec2::new(0.6, 0.9),
            max_jumps: 2,
            speed: 3.0,
            jump_speed: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformParams {
    pub center: Vec2,
    pub size: Vec2,
    #[serde(default = "default_platform_color")]
    pub color: Color,
}

fn default_platform_color() -> Color {
    Color::BLUE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrateParams {
    pub center: Vec2,
    pub size: Vec2,
}

/// An input event delivered on a given frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedEvent {
    pub frame: u64,
    pub event: Event,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub name: String,
    /// Broad-phase layout for box collisions.
    pub grid: GridConfig,
    /// Dimensions of the integer grid for cell colliders, if the scene uses
    /// any.
    pub cell_grid: Option<(usize, usize)>,
    pub player: Option<PlayerParams>,
    pub platforms: Vec<PlatformParams>,
    pub crates: Vec<CrateParams>,
    pub script: Vec<ScriptedEvent>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            name: "empty".to_string(),
            grid: GridConfig::default(),
            cell_grid: None,
            player: None,
            platforms: Vec::new(),
            crates: Vec::new(),
            script: Vec::new(),
        }
    }
}

impl Scene {
    /// The level used when no scene file is given or it cannot be loaded.
    #[must_use]
    pub fn default_level() -> Self {
        let press = |frame, key| ScriptedEvent {
            frame,
            event: Event::KeyPressed(key),
        };
        let release = |frame, key| ScriptedEvent {
            frame,
            event: Event::KeyReleased(key),
        };

        Self {
            name: "default".to_string(),
            player: Some(PlayerParams::default()),
            platforms: vec![
                PlatformParams {
                    center: Vec2::new(0.0, -4.5),
                    size: Vec2::new(10.0, 1.0),
                    color: Color::BLUE,
                },
                PlatformParams {
                    center: Vec2::new(1.5, -1.5),
                    size: Vec2::new(3.0, 0.4),
                    color: Color::rgb(80, 80, 200),
                },
            ],
            crates: vec![CrateParams {
                center: Vec2::new(-1.0, -3.5),
                size: Vec2::new(1.0, 1.0),
            }],
            script: vec![
                press(30, Key::Right),
                press(60, Key::Space),
                release(61, Key::Space),
                release(120, Key::Right),
            ],
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scene: Self = serde_json::from_str(&text).map_err(|source| SceneError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        scene.grid.validate().map_err(|source| SceneError::InvalidGrid {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(scene)
    }

    /// Load `path`, falling back to [`Scene::default_level`] when there is
    /// no path or loading fails.
    #[must_use]
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default_level();
        };
        match Self::load(path) {
            Ok(scene) => {
                info!(path = %path.display(), name = %scene.name, "scene loaded");
                scene
            }
            Err(e) => {
                warn!(error = %e, "using default level");
                Self::default_level()
            }
        }
    }

    /// Register the scene's systems and spawn its entities.
    pub fn populate(&self, state: &mut GameState) -> Result<(), WorldError> {
        state.add_system(CollisionSystem::new(self.grid));
        if let Some((x_dim, y_dim)) = self.cell_grid {
            state.add_system(GridCollisionSystem::new(x_dim, y_dim));
        }

        state.add_entity(player::title(&self.name, Vec2::new(-4.5, 4.5)))?;
        for platform in &self.platforms {
            state.add_entity(player::platform(platform.center, platform.size, platform.color))?;
        }
        for pushable in &self.crates {
            state.add_entity(player::pushable(pushable.center, pushable.size))?;
        }
        if let Some(params) = &self.player {
            let player = Player::new(params.speed, params.jump_speed);
            state.add_entity_and_init(player.entity(params.spawn, params.size, params.max_jumps))?;
        }

        info!(
            scene = %self.name,
            entities = state.entity_count(),
            "scene populated"
        );
        Ok(())
    }

    /// A headless screen playing back the scene's script.
    #[must_use]
    pub fn screen(&self) -> HeadlessScreen {
        self.script
            .iter()
            .fold(HeadlessScreen::new(), |screen, scripted| {
                screen.with_event(scripted.frame, scripted.event)
            })
    }
}
