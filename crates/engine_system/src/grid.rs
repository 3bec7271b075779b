//! Uniform-grid broad phase.
//!
//! The grid covers a fixed world region split into `x_dim × y_dim` cells.
//! Each inserted element is first tested against the elements already in
//! the cells it overlaps and then appended to those cells, so every
//! overlapping pair is reported exactly once: by whichever element was
//! inserted second.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use engine_component::{EntityId, InteractionType};
use engine_math::Aabb;
use tracing::trace;

use crate::config::GridConfig;

/// One box in the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridElement<K> {
    /// Caller-chosen handle returned for candidate pairs.
    pub key: K,
    /// Entity owning the box; boxes of the same entity never pair up.
    pub owner: EntityId,
    pub bounds: Aabb,
    pub interaction: InteractionType,
}

/// A uniform grid rebuilt every frame.
#[derive(Debug)]
pub struct SpatialGrid<K> {
    config: GridConfig,
    /// Element ordinals per cell, row-major.
    cells: Vec<Vec<usize>>,
    elements: Vec<GridElement<K>>,
}

impl<K: Copy> SpatialGrid<K> {
    /// An empty grid. A zero dimension is treated as one cell.
    #[must_use]
    pub fn new(config: GridConfig) -> Self {
        let config = config.with_dimensions(config.x_dim, config.y_dim);
        Self {
            cells: vec![Vec::new(); config.cell_count()],
            elements: Vec::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Number of elements inserted (outside elements are not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Insert `element`, returning the keys of previously inserted elements
    /// it collides with.
    ///
    /// A candidate must strictly overlap `element`, belong to another
    /// entity, and have an interaction type compatible with it. Each
    /// candidate is reported once even when the two boxes share several
    /// cells. Elements entirely outside the grid are dropped and report
    /// nothing.
    pub fn insert(&mut self, element: GridElement<K>) -> Vec<K> {
        let Some((columns, rows)) = self.cell_range(&element.bounds) else {
            trace!(owner = %element.owner, bounds = ?element.bounds, "element outside grid");
            return Vec::new();
        };

        let ordinal = self.elements.len();
        let mut seen = HashSet::new();
        let mut hits = Vec::new();

        for row in rows {
            for column in columns.clone() {
                let cell = row * self.config.x_dim + column;
                for &other in &self.cells[cell] {
                    let existing = &self.elements[other];
                    if existing.owner != element.owner
                        && existing.interaction.interacts_with(element.interaction)
                        && existing.bounds.overlaps(&element.bounds)
                        && seen.insert(other)
                    {
                        hits.push(existing.key);
                    }
                }
                self.cells[cell].push(ordinal);
            }
        }

        self.elements.push(element);
        hits
    }

    /// Drop every element, keeping the allocation.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.elements.clear();
    }

    /// Column and row ranges overlapped by `bounds`, clamped to the grid.
    fn cell_range(&self, bounds: &Aabb) -> Option<(RangeInclusive<usize>, RangeInclusive<usize>)> {
        let grid = &self.config.bounds;
        if !bounds.overlaps(grid) {
            return None;
        }

        let cell_size = self.config.cell_size();
        let column = |x: f32| ((x - grid.min.x) / cell_size.x).floor().max(0.0) as usize;
        let row = |y: f32| ((y - grid.min.y) / cell_size.y).floor().max(0.0) as usize;

        let last_column = self.config.x_dim - 1;
        let last_row = self.config.y_dim - 1;
        Some((
            column(bounds.min.x).min(last_column)..=column(bounds.max.x).min(last_column),
            row(bounds.min.y).min(last_row)..=row(bounds.max.y).min(last_row),
        ))
    }
}
