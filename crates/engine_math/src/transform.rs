//! 2D transform.
//!
//! [`Transform2D`] represents translation and (possibly non-uniform) scale in
//! the plane. Rotation is deliberately absent: every box in the engine is
//! axis-aligned.
//!
//! The unit rectangle spans `[-1, 1]` on both axes, so a transform's scale is
//! the half-extent of the rectangle it describes.

use glam::{Affine2, IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// A 2D transform holding a translation and per-axis scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform2D {
    /// World-space translation (the rectangle's centre).
    pub translation: Vec2,
    /// Per-axis scale (the rectangle's half-extents).
    pub scale: Vec2,
}

impl Transform2D {
    /// The identity transform: origin, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        scale: Vec2::ONE,
    };

    /// Create a transform with the given translation and unit scale.
    #[must_use]
    pub fn from_translation(translation: Vec2) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Create a transform from a translation and a per-axis scale.
    #[must_use]
    pub fn from_translation_and_scale(translation: Vec2, scale: Vec2) -> Self {
        Self { translation, scale }
    }

    /// Create a square centred on `center` with the given side length.
    #[must_use]
    pub fn square(center: Vec2, side_length: f32) -> Self {
        Self::rectangle(center, Vec2::splat(side_length))
    }

    /// Create a rectangle centred on `center` with the given side lengths.
    #[must_use]
    pub fn rectangle(center: Vec2, side_lengths: Vec2) -> Self {
        Self::from_translation_and_scale(center, side_lengths / 2.0)
    }

    /// Transform covering one cell of an integer grid whose cells are
    /// `cell_size` wide, with cell `(0, 0)` centred on the origin.
    #[must_use]
    pub fn from_grid_cell(cell: IVec2, cell_size: Vec2) -> Self {
        Self::from_translation_and_scale(cell.as_vec2() * cell_size, cell_size / 2.0)
    }

    /// The equivalent glam affine matrix.
    #[must_use]
    pub fn to_affine(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(self.scale, 0.0, self.translation)
    }

    /// Map a point from this transform's local frame into the parent frame.
    #[must_use]
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.translation + self.scale * point
    }

    /// Compose `self` with a transform expressed in `self`'s local frame.
    ///
    /// The result maps local points of `local` straight to `self`'s parent
    /// frame, i.e. `self · local`.
    #[must_use]
    pub fn compose(&self, local: &Transform2D) -> Self {
        Self {
            translation: self.transform_point(local.translation),
            scale: self.scale * local.scale,
        }
    }

    /// World position of the local `(-1, -1)` corner.
    #[must_use]
    pub fn bottom_left(&self) -> Vec2 {
        self.transform_point(Vec2::NEG_ONE)
    }

    /// World position of the local `(1, 1)` corner.
    #[must_use]
    pub fn top_right(&self) -> Vec2 {
        self.transform_point(Vec2::ONE)
    }

    /// Returns `true` if `point` lies strictly inside the unit rectangle
    /// mapped by this transform.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        if self.scale.x == 0.0 || self.scale.y == 0.0 {
            return false;
        }
        let local = (point - self.translation) / self.scale;
        local.x > -1.0 && local.x < 1.0 && local.y > -1.0 && local.y < 1.0
    }

    /// Translate the transform by the given offset.
    #[must_use]
    pub fn translated(mut self, offset: Vec2) -> Self {
        self.translation += offset;
        self
    }

    /// Apply a per-axis scale factor.
    #[must_use]
    pub fn scaled(mut self, factor: Vec2) -> Self {
        self.scale *= factor;
        self
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}
