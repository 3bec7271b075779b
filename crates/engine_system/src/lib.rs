//! # engine_system
//!
//! Whole-world systems for the 2D engine.
//!
//! - [`CollisionSystem`]: per-frame AABB collision: a uniform-grid broad
//!   phase ([`SpatialGrid`]) followed by push-apart resolution and callback
//!   dispatch on every candidate pair.
//! - [`GridCollisionSystem`]: cell-occupancy collision for entities that
//!   live on an integer grid.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use engine_component::Collider;
//! use engine_system::{CollisionSystem, GridConfig};
//! use engine_world::{Entity, GameState};
//!
//! let mut state = GameState::new();
//! state.add_system(CollisionSystem::new(GridConfig::default()));
//! state.add_entity(Entity::new("crate").with_component(Collider::solid())).unwrap();
//! state.advance_state(1.0 / 60.0).unwrap();
//! ```

pub mod collisions;
pub mod config;
pub mod grid;
pub mod grid_collisions;

pub use collisions::{CollisionStats, CollisionSystem};
pub use config::{GridConfig, GridConfigError};
pub use grid::{GridElement, SpatialGrid};
pub use grid_collisions::GridCollisionSystem;
