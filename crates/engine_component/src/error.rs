//! Component-level error types.

/// Errors a component hook can report.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// A component produced a non-finite value that would poison later
    /// geometry (broad phase, drawing).
    #[error("{component}: non-finite {quantity}")]
    NonFinite {
        /// Name of the failing component.
        component: &'static str,
        /// The quantity that became non-finite.
        quantity: &'static str,
    },

    /// The render surface rejected a draw call.
    #[error("render error: {0}")]
    Render(String),
}
