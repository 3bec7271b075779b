//! Render collaborator interface.
//!
//! The engine never talks to a window or graphics API directly. Anything that
//! can draw rectangles and text in world coordinates implements [`Surface`].

use engine_math::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ComponentError;

/// An RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    /// Create a colour from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Drawing primitives offered by the render collaborator.
///
/// All positions are world-space.
pub trait Surface {
    /// Fill the axis-aligned rectangle spanned by the two corners.
    fn draw_rectangle(&mut self, bottom_left: Vec2, top_right: Vec2, color: Color) -> Result<(), ComponentError>;

    /// Draw `text` starting at `location`.
    fn draw_text(&mut self, location: Vec2, font_size: f32, text: &str, color: Color) -> Result<(), ComponentError>;
}
