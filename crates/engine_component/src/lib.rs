//! # engine_component
//!
//! Entity identity and the component model of the engine.
//!
//! This crate provides:
//!
//! - [`EntityId`]: slot + epoch identifiers, and [`EntityAllocator`] which
//!   hands them out with an epoch bump on every slot reuse.
//! - [`Component`]: the per-frame hook trait, and [`ComponentKind`], the
//!   closed set of components an entity can own.
//! - [`Collider`]: axis-aligned box colliders with deferred push-apart
//!   resolution, plus the [`sensors`] presets built on them.
//! - [`Surface`]: the interface of the render collaborator.

pub mod collider;
pub mod component;
pub mod draw;
pub mod entity;
pub mod error;
pub mod gravity;
pub mod grid_collider;
pub mod interaction;
pub mod jumper;
pub mod kinematic;
pub mod render;
pub mod sensors;

pub use collider::{Collider, ColliderBehavior, CollisionCallback, Resolution, Shape};
pub use component::{Body, Component, ComponentKind, ComponentVariant, Contact, ContactSource};
pub use draw::{DrawRectangle, Label};
pub use entity::{EntityAllocator, EntityId};
pub use error::ComponentError;
pub use gravity::Gravity;
pub use grid_collider::GridCollider;
pub use interaction::{InteractionMask, InteractionType};
pub use jumper::Jumper;
pub use kinematic::Kinematic;
pub use render::{Color, Surface};
