//! World-level error types.

use engine_component::{ComponentError, EntityId};

/// Errors raised by the entity store and entity hooks.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// No live entity has this id.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// The entity exists but is not of the requested type.
    #[error("{id} is not a {expected}, found {found}")]
    UnexpectedType {
        id: EntityId,
        expected: &'static str,
        found: &'static str,
    },

    /// A lookup that expects a unique entity of a type found a different
    /// number of them.
    #[error("expected {expected} entities of type {type_name}, found {found}")]
    TypeCount {
        type_name: String,
        expected: usize,
        found: usize,
    },

    /// Every slot of the store is occupied.
    #[error("entity store is full ({capacity} entities)")]
    CapacityExhausted { capacity: usize },

    /// Entity-specific logic failed.
    #[error("behavior error: {0}")]
    Behavior(String),

    /// A component hook failed.
    #[error(transparent)]
    Component(#[from] ComponentError),
}
