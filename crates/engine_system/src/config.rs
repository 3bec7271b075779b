//! Broad-phase configuration.

use engine_math::{Aabb, Vec2};
use serde::{Deserialize, Serialize};

/// A grid layout that cannot be bucketed into.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridConfigError {
    #[error("grid needs at least one cell per axis, got {x_dim}x{y_dim}")]
    ZeroDimension { x_dim: usize, y_dim: usize },

    #[error("grid bounds must be finite with a positive extent, got {min} to {max}")]
    InvalidBounds { min: Vec2, max: Vec2 },
}

/// Layout of the broad-phase grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of columns.
    pub x_dim: usize,
    /// Number of rows.
    pub y_dim: usize,
    /// World region covered by the grid. Colliders entirely outside it are
    /// never tested.
    pub bounds: Aabb,
}

impl GridConfig {
    /// Override the grid resolution.
    #[must_use]
    pub fn with_dimensions(mut self, x_dim: usize, y_dim: usize) -> Self {
        self.x_dim = x_dim.max(1);
        self.y_dim = y_dim.max(1);
        self
    }

    /// Override the covered world region.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Aabb) -> Self {
        self.bounds = bounds;
        self
    }

    /// Check a layout that did not come through the builders, such as one
    /// read from a scene file.
    pub fn validate(&self) -> Result<(), GridConfigError> {
        if self.x_dim == 0 || self.y_dim == 0 {
            return Err(GridConfigError::ZeroDimension {
                x_dim: self.x_dim,
                y_dim: self.y_dim,
            });
        }

        let Aabb { min, max } = self.bounds;
        let extent = max - min;
        if !min.is_finite() || !max.is_finite() || extent.x <= 0.0 || extent.y <= 0.0 {
            return Err(GridConfigError::InvalidBounds { min, max });
        }
        Ok(())
    }

    /// World size of a single cell.
    #[must_use]
    pub fn cell_size(&self) -> Vec2 {
        let extent = self.bounds.max - self.bounds.min;
        Vec2::new(extent.x / self.x_dim as f32, extent.y / self.y_dim as f32)
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.x_dim * self.y_dim
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            x_dim: 10,
            y_dim: 10,
            bounds: Aabb::from_corners(Vec2::splat(-5.0), Vec2::splat(5.0)),
        }
    }
}
