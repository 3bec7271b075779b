//! # engine_world
//!
//! The entity store and the per-frame update that drives it.
//!
//! - [`Entity`]: owns a [`Body`](engine_component::Body), its components and
//!   an optional [`Behavior`] carrying entity-specific logic.
//! - [`GameState`]: fixed-capacity slot storage for entities, parent/child
//!   links, registered [`System`]s, event dispatch and z-ordered drawing.
//! - [`Commands`]: structural changes (spawn, remove) queued by behaviors
//!   and applied by the store between entity updates.

pub mod behavior;
pub mod commands;
pub mod entity;
pub mod error;
pub mod event;
pub mod game_state;
pub mod system;

pub use behavior::{AsAny, Behavior, EntityContext};
pub use commands::{Command, Commands};
pub use entity::{Entity, MAX_Z_LEVEL};
pub use error::WorldError;
pub use event::{Event, Key, MouseButton};
pub use game_state::{GameState, MAX_ENTITY_COUNT};
pub use system::System;
