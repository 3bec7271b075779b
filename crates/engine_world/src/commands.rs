//! Deferred structural changes.

use std::collections::VecDeque;

use engine_component::EntityId;

use crate::entity::Entity;

/// A structural change to the entity store.
#[derive(Debug)]
pub enum Command {
    /// Add an entity and run its `init`.
    Spawn(Entity),
    /// Add an entity as a child of `parent` and run its `init`.
    SpawnChild { parent: EntityId, entity: Entity },
    /// Remove an entity and all of its descendants.
    Remove(EntityId),
}

/// Queue of [`Command`]s recorded while the store is borrowed.
///
/// The store drains the queue right after the hook that filled it returns,
/// in the order the commands were recorded.
#[derive(Debug, Default)]
pub struct Commands {
    queue: VecDeque<Command>,
}

impl Commands {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, entity: Entity) {
        self.queue.push_back(Command::Spawn(entity));
    }

    pub fn spawn_child(&mut self, parent: EntityId, entity: Entity) {
        self.queue.push_back(Command::SpawnChild { parent, entity });
    }

    pub fn remove(&mut self, id: EntityId) {
        self.queue.push_back(Command::Remove(id));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn pop(&mut self) -> Option<Command> {
        self.queue.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_keep_order() {
        let mut commands = Commands::new();
        commands.remove(EntityId::new(1, 0));
        commands.spawn(Entity::new("a"));
        commands.remove(EntityId::new(2, 0));
        assert_eq!(commands.len(), 3);

        assert!(matches!(commands.pop(), Some(Command::Remove(id)) if id == EntityId::new(1, 0)));
        assert!(matches!(commands.pop(), Some(Command::Spawn(_))));
        assert!(matches!(commands.pop(), Some(Command::Remove(_))));
        assert!(commands.is_empty());
    }
}
