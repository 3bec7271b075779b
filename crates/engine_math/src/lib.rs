//! # engine_math
//!
//! Math types for the 2D engine. Re-exports [`glam`] for linear algebra and
//! defines the engine's spatial types: [`Transform2D`] and [`Aabb`].

pub mod aabb;
pub mod transform;

// Re-export glam types for convenience.
pub use glam::{Affine2, IVec2, Vec2};

pub use aabb::Aabb;
pub use transform::Transform2D;
