//! Integer-cell colliders for grid-based games.

use engine_math::IVec2;

use crate::component::Component;
use crate::entity::EntityId;

/// Occupies a set of integer grid cells.
///
/// The owning entity keeps the cell list current (for example a snake's
/// body segments); the grid collision system records a contact whenever two
/// entities share a cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridCollider {
    cells: Vec<IVec2>,
    contacts: Vec<EntityId>,
}

impl GridCollider {
    #[must_use]
    pub fn new(cells: Vec<IVec2>) -> Self {
        Self {
            cells,
            contacts: Vec::new(),
        }
    }

    #[must_use]
    pub fn cells(&self) -> &[IVec2] {
        &self.cells
    }

    pub fn set_cells(&mut self, cells: Vec<IVec2>) {
        self.cells = cells;
    }

    /// Record a collision with `other`.
    pub fn handle_collision(&mut self, other: EntityId) {
        self.contacts.push(other);
    }

    #[must_use]
    pub fn contacts(&self) -> &[EntityId] {
        &self.contacts
    }

    /// Drain the recorded contacts.
    pub fn take_contacts(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.contacts)
    }
}

impl Component for GridCollider {
    fn type_name(&self) -> &'static str {
        "grid_collider"
    }
}
