//! Collision by shared integer cells.

use engine_component::{EntityId, GridCollider};
use engine_math::IVec2;
use engine_world::{GameState, System, WorldError};
use tracing::{debug, trace};

/// Records a contact whenever a [`GridCollider`] cell is already occupied.
///
/// Cells are indexed from the origin; with an odd dimension the grid is
/// centred on cell `(0, 0)`. Entities are visited in store order and each
/// of their cells is tested against the occupants recorded so far, so only
/// the later entity of a pair records the contact. An entity whose cells
/// overlap each other (a snake biting its tail) collides with itself.
#[derive(Debug, Clone, Copy)]
pub struct GridCollisionSystem {
    x_dim: usize,
    y_dim: usize,
    contacts: usize,
}

impl GridCollisionSystem {
    #[must_use]
    pub fn new(x_dim: usize, y_dim: usize) -> Self {
        Self {
            x_dim: x_dim.max(1),
            y_dim: y_dim.max(1),
            contacts: 0,
        }
    }

    /// Contacts recorded by the most recent pass.
    #[must_use]
    pub fn contacts(&self) -> usize {
        self.contacts
    }

    fn cell_index(&self, cell: IVec2) -> Option<usize> {
        let x = i64::from(cell.x) + (self.x_dim as i64 - 1) / 2;
        let y = i64::from(cell.y) + (self.y_dim as i64 - 1) / 2;
        let x = usize::try_from(x).ok().filter(|&x| x < self.x_dim)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.y_dim)?;
        Some(y * self.x_dim + x)
    }

    /// Run one pass over every entity with a [`GridCollider`].
    pub fn run(&mut self, state: &mut GameState) {
        let mut occupancy: Vec<Vec<EntityId>> = vec![Vec::new(); self.x_dim * self.y_dim];
        let mut contacts = 0;

        for id in state.entities_with_component::<GridCollider>() {
            let Some(entity) = state.get_mut(id).filter(|entity| !entity.is_pending()) else {
                continue;
            };
            for collider in entity.get_components_mut::<GridCollider>() {
                for cell in collider.cells().to_vec() {
                    let Some(index) = self.cell_index(cell) else {
                        trace!(entity = %id, ?cell, "cell outside grid");
                        continue;
                    };
                    for &other in &occupancy[index] {
                        collider.handle_collision(other);
                        contacts += 1;
                    }
                    occupancy[index].push(id);
                }
            }
        }

        debug!(contacts, "grid collision pass");
        self.contacts = contacts;
    }
}

impl Default for GridCollisionSystem {
    fn default() -> Self {
        Self::new(10, 10)
    }
}

impl System for GridCollisionSystem {
    fn name(&self) -> &'static str {
        "grid_collisions"
    }

    fn update(&mut self, state: &mut GameState, _dt: f32) -> Result<(), WorldError> {
        self.run(state);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use engine_world::Entity;

    use super::*;

    fn occupant(cells: &[(i32, i32)]) -> Entity {
        Entity::new("occupant").with_component(GridCollider::new(
            cells.iter().map(|&(x, y)| IVec2::new(x, y)).collect(),
        ))
    }

    fn contacts_of(state: &mut GameState, id: EntityId) -> Vec<EntityId> {
        state
            .get_mut(id)
            .unwrap()
            .get_component_mut::<GridCollider>()
            .unwrap()
            .take_contacts()
    }

    #[test]
    fn test_later_entity_records_the_contact() {
        let mut state = GameState::new();
        let first = state.add_entity(occupant(&[(0, 0), (1, 0)])).unwrap();
        let second = state.add_entity(occupant(&[(1, 0)])).unwrap();
        let apart = state.add_entity(occupant(&[(-3, 2)])).unwrap();

        let mut system = GridCollisionSystem::default();
        system.run(&mut state);

        assert_eq!(system.contacts(), 1);
        assert!(contacts_of(&mut state, first).is_empty());
        assert_eq!(contacts_of(&mut state, second), vec![first]);
        assert!(contacts_of(&mut state, apart).is_empty());
    }

    #[test]
    fn test_entity_overlapping_itself() {
        let mut state = GameState::new();
        let snake = state.add_entity(occupant(&[(0, 0), (0, 1), (0, 0)])).unwrap();

        GridCollisionSystem::default().run(&mut state);
        assert_eq!(contacts_of(&mut state, snake), vec![snake]);
    }

    #[test]
    fn test_cells_outside_the_grid_are_ignored() {
        let mut state = GameState::new();
        state.add_entity(occupant(&[(20, 0)])).unwrap();
        let second = state.add_entity(occupant(&[(20, 0)])).unwrap();

        let mut system = GridCollisionSystem::new(5, 5);
        system.run(&mut state);
        assert_eq!(system.contacts(), 0);
        assert!(contacts_of(&mut state, second).is_empty());
    }

    #[test]
    fn test_grid_is_centred_on_origin() {
        let system = GridCollisionSystem::new(5, 5);
        assert_eq!(system.cell_index(IVec2::new(-2, -2)), Some(0));
        assert_eq!(system.cell_index(IVec2::new(2, 2)), Some(24));
        assert_eq!(system.cell_index(IVec2::new(3, 0)), None);
        assert_eq!(system.cell_index(IVec2::new(0, -3)), None);
    }

    #[test]
    fn test_contacts_reach_the_entity_during_late_update() {
        let mut state = GameState::new();
        state.add_system(GridCollisionSystem::default());
        state.add_entity(occupant(&[(0, 0)])).unwrap();
        let second = state.add_entity(occupant(&[(0, 0)])).unwrap();

        state.advance_state(0.1).unwrap();
        // Drained and delivered during late update.
        assert!(contacts_of(&mut state, second).is_empty());
        assert_eq!(state.get_system::<GridCollisionSystem>().unwrap().contacts(), 1);
    }
}
