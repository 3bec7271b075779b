//! The entity store.
//!
//! [`GameState`] owns every entity in a fixed-capacity slot array. An
//! entity's slot never moves while it lives; removal empties the slot and
//! bumps its epoch, so ids held elsewhere simply stop resolving.
//!
//! ## Frame
//!
//! [`GameState::advance_state`] runs one simulation step:
//!
//! 1. every entity's `update` (behavior, then components);
//! 2. every registered [`System`], in registration order;
//! 3. every entity's `late_update` (contacts, deferred translations,
//!    behavior).
//!
//! The entities visited in steps 1 and 3 are the ones alive when the frame
//! started. Commands queued by a hook are applied as soon as that hook
//! returns, so entities spawned mid-frame exist immediately but are first
//! updated on the next frame, and entities removed mid-frame are skipped.
//! Until the frame ends such entities report [`Entity::is_pending`], and
//! systems leave them alone too, so nothing resolved for them this frame
//! goes unapplied.

use engine_component::{ComponentVariant, EntityAllocator, EntityId, Surface};
use tracing::{debug, trace, warn};

use crate::behavior::Behavior;
use crate::commands::{Command, Commands};
use crate::entity::{Entity, MAX_Z_LEVEL};
use crate::error::WorldError;
use crate::event::Event;
use crate::system::System;

/// Maximum number of simultaneously live entities.
pub const MAX_ENTITY_COUNT: usize = 4096;

/// Owns all entities and the systems that run over them.
pub struct GameState {
    allocator: EntityAllocator,
    slots: Vec<Option<Entity>>,
    systems: Vec<Box<dyn System>>,
    frame: u64,
    /// Set while [`GameState::advance_state`] runs.
    in_frame: bool,
}

impl GameState {
    /// An empty store with room for [`MAX_ENTITY_COUNT`] entities.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_ENTITY_COUNT)
    }

    /// An empty store with room for `capacity` entities.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            allocator: EntityAllocator::new(capacity),
            slots: Vec::new(),
            systems: Vec::new(),
            frame: 0,
            in_frame: false,
        }
    }

    /// Number of completed [`GameState::advance_state`] calls.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.allocator.count()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.allocator.capacity()
    }

    /// Add an entity without running its `init`.
    pub fn add_entity(&mut self, entity: Entity) -> Result<EntityId, WorldError> {
        self.insert(entity, None)
    }

    /// Add an entity and run its `init`, applying any commands it queues.
    pub fn add_entity_and_init(&mut self, entity: Entity) -> Result<EntityId, WorldError> {
        let id = self.insert(entity, None)?;
        self.init_entity(id)?;
        Ok(id)
    }

    /// Add `entity` as a child of `parent` and run its `init`.
    pub fn add_child(&mut self, parent: EntityId, entity: Entity) -> Result<EntityId, WorldError> {
        let id = self.insert(entity, Some(parent))?;
        self.init_entity(id)?;
        Ok(id)
    }

    fn insert(&mut self, mut entity: Entity, parent: Option<EntityId>) -> Result<EntityId, WorldError> {
        if let Some(parent) = parent
            && !self.allocator.is_alive(parent)
        {
            return Err(WorldError::EntityNotFound(parent));
        }

        let Some(id) = self.allocator.allocate() else {
            warn!(capacity = self.capacity(), type_name = entity.type_name(), "entity store is full");
            return Err(WorldError::CapacityExhausted {
                capacity: self.capacity(),
            });
        };

        entity.assign(id, parent);
        entity.set_pending(self.in_frame);
        let slot = id.slot();
        if slot >= self.slots.len() {
            self.slots.resize_with(slot + 1, || None);
        }
        debug!(entity = %id, type_name = entity.type_name(), parent = ?parent, "entity added");
        self.slots[slot] = Some(entity);

        if let Some(parent) = parent
            && let Some(parent) = self.get_mut(parent)
        {
            parent.add_child_id(id);
        }
        Ok(id)
    }

    /// Run the second construction phase of `id`.
    pub fn init_entity(&mut self, id: EntityId) -> Result<(), WorldError> {
        let mut commands = Commands::new();
        self.get_mut(id)
            .ok_or(WorldError::EntityNotFound(id))?
            .init(id, &mut commands)?;
        self.apply_commands(commands)
    }

    /// Remove `id` and, first, all of its descendants; the entity is also
    /// unlinked from its parent.
    ///
    /// Returns `false` if `id` is not alive.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.get(id) else {
            return false;
        };

        if let Some(parent) = entity.parent()
            && let Some(parent) = self.get_mut(parent)
        {
            parent.remove_child_id(id);
        }

        // Pre-order walk; reversed, every descendant precedes its ancestors.
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(entity) = self.get(next) {
                stack.extend_from_slice(entity.children());
                order.push(next);
            }
        }

        for victim in order.into_iter().rev() {
            if let Some(slot) = self.slots.get_mut(victim.slot()) {
                *slot = None;
            }
            self.allocator.free(victim);
            debug!(entity = %victim, "entity removed");
        }
        true
    }

    /// Apply queued structural changes in order.
    pub fn apply_commands(&mut self, mut commands: Commands) -> Result<(), WorldError> {
        while let Some(command) = commands.pop() {
            match command {
                Command::Spawn(entity) => {
                    self.add_entity_and_init(entity)?;
                }
                Command::SpawnChild { parent, entity } => {
                    self.add_child(parent, entity)?;
                }
                Command::Remove(id) => {
                    if !self.remove_entity(id) {
                        debug!(entity = %id, "remove ignored; entity already gone");
                    }
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.allocator.is_alive(id)
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        if !self.allocator.is_alive(id) {
            return None;
        }
        self.slots.get(id.slot())?.as_ref()
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if !self.allocator.is_alive(id) {
            return None;
        }
        self.slots.get_mut(id.slot())?.as_mut()
    }

    /// Mutable access to two distinct entities at once.
    pub fn pair_mut(&mut self, a: EntityId, b: EntityId) -> Option<(&mut Entity, &mut Entity)> {
        if a.slot() == b.slot() || !self.allocator.is_alive(a) || !self.allocator.is_alive(b) {
            return None;
        }
        let (low, high) = (a.slot().min(b.slot()), a.slot().max(b.slot()));
        let (head, tail) = self.slots.split_at_mut(high);
        let low = head.get_mut(low)?.as_mut()?;
        let high = tail.first_mut()?.as_mut()?;
        if a.slot() < b.slot() { Some((low, high)) } else { Some((high, low)) }
    }

    /// Ids of all live entities in slot order.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        self.iter().filter_map(Entity::id).collect()
    }

    /// All live entities in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.slots.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.slots.iter_mut().flatten()
    }

    /// The behavior of `id`, if the entity is alive and its behavior is a `B`.
    #[must_use]
    pub fn get_behavior<B: Behavior>(&self, id: EntityId) -> Option<&B> {
        self.get(id)?.behavior::<B>()
    }

    pub fn get_behavior_mut<B: Behavior>(&mut self, id: EntityId) -> Option<&mut B> {
        self.get_mut(id)?.behavior_mut::<B>()
    }

    /// Like [`GameState::get_behavior`], but distinguishes a missing entity
    /// from one of the wrong type.
    pub fn expect_behavior<B: Behavior>(&self, id: EntityId) -> Result<&B, WorldError> {
        let entity = self.get(id).ok_or(WorldError::EntityNotFound(id))?;
        entity.behavior::<B>().ok_or(WorldError::UnexpectedType {
            id,
            expected: std::any::type_name::<B>(),
            found: entity.type_name(),
        })
    }

    /// Ids of the entities owning at least one `T`.
    #[must_use]
    pub fn entities_with_component<T: ComponentVariant>(&self) -> Vec<EntityId> {
        self.iter()
            .filter(|entity| entity.has_component::<T>())
            .filter_map(Entity::id)
            .collect()
    }

    #[must_use]
    pub fn entities_by_type(&self, type_name: &str) -> Vec<EntityId> {
        self.iter()
            .filter(|entity| entity.type_name() == type_name)
            .filter_map(Entity::id)
            .collect()
    }

    /// The single entity of `type_name`.
    pub fn entity_by_type(&self, type_name: &str) -> Result<EntityId, WorldError> {
        match self.entities_by_type(type_name).as_slice() {
            [id] => Ok(*id),
            ids => Err(WorldError::TypeCount {
                type_name: type_name.to_string(),
                expected: 1,
                found: ids.len(),
            }),
        }
    }

    /// Remove every entity of `type_name`; returns how many were removed
    /// directly (descendants are not counted).
    pub fn remove_entities_by_type(&mut self, type_name: &str) -> usize {
        self.entities_by_type(type_name)
            .into_iter()
            .filter(|&id| self.remove_entity(id))
            .count()
    }

    pub fn add_system(&mut self, system: impl System) {
        debug!(system = system.name(), "system registered");
        self.systems.push(Box::new(system));
    }

    /// The first registered system of type `S`.
    #[must_use]
    pub fn get_system<S: System>(&self) -> Option<&S> {
        self.systems
            .iter()
            .find_map(|system| (**system).as_any().downcast_ref::<S>())
    }

    /// Run one simulation step of `dt` seconds.
    pub fn advance_state(&mut self, dt: f32) -> Result<(), WorldError> {
        self.in_frame = true;
        let result = self.step(dt);
        self.in_frame = false;
        for entity in self.iter_mut() {
            entity.set_pending(false);
        }
        result
    }

    fn step(&mut self, dt: f32) -> Result<(), WorldError> {
        let ids = self.ids();
        trace!(frame = self.frame, entities = ids.len(), dt, "advance state");

        for &id in &ids {
            let mut commands = Commands::new();
            let Some(entity) = self.get_mut(id) else {
                continue;
            };
            entity.update(id, dt, &mut commands)?;
            self.apply_commands(commands)?;
        }

        self.run_systems(dt)?;

        for &id in &ids {
            let mut commands = Commands::new();
            let Some(entity) = self.get_mut(id) else {
                continue;
            };
            entity.late_update(id, &mut commands)?;
            self.apply_commands(commands)?;
        }

        self.frame += 1;
        Ok(())
    }

    fn run_systems(&mut self, dt: f32) -> Result<(), WorldError> {
        let mut systems = std::mem::take(&mut self.systems);
        let result = systems.iter_mut().try_for_each(|system| {
            trace!(system = system.name(), "running system");
            system.update(self, dt)
        });
        // Systems registered during the pass run from the next frame on.
        systems.append(&mut self.systems);
        self.systems = systems;
        result
    }

    /// Dispatch an input event in slot order until a handler consumes it.
    pub fn handle_event(&mut self, event: &Event) -> Result<(), WorldError> {
        for id in self.ids() {
            let mut commands = Commands::new();
            let Some(entity) = self.get_mut(id) else {
                continue;
            };
            let propagate = entity.handle_event(id, event, &mut commands)?;
            self.apply_commands(commands)?;
            if !propagate {
                trace!(entity = %id, ?event, "event consumed");
                break;
            }
        }
        Ok(())
    }

    /// Draw every entity; level 0 in slot order, then levels 1 to
    /// [`MAX_Z_LEVEL`] in ascending order.
    pub fn draw(&self, surface: &mut dyn Surface) -> Result<(), WorldError> {
        let mut levels: [Vec<&Entity>; MAX_Z_LEVEL as usize] = Default::default();
        for entity in self.iter() {
            match entity.z_level() {
                0 => entity.draw(surface)?,
                z => levels[usize::from(z.min(MAX_Z_LEVEL)) - 1].push(entity),
            }
        }
        for entity in levels.iter().flatten() {
            entity.draw(surface)?;
        }
        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameState")
            .field("frame", &self.frame)
            .field("entities", &self.entity_count())
            .field("capacity", &self.capacity())
            .field("systems", &self.systems.iter().map(|s| s.name()).collect::<Vec<_>>())
            .finish()
    }
}
