//! Entity identifiers and slot allocation.
//!
//! An [`EntityId`] names a slot in the entity store together with the slot's
//! epoch. Every time a slot is freed its epoch is bumped, so an id handed out
//! before the slot was recycled can never alias the slot's next occupant.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// A stable, storage-independent reference to an entity.
///
/// Two ids are equal iff both the slot index and the epoch match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    /// Slot of this entity in the entity store.
    pub index: u32,
    /// Reuse generation of the slot.
    pub epoch: u32,
}

impl EntityId {
    /// Create an id from its raw parts.
    #[must_use]
    pub const fn new(index: u32, epoch: u32) -> Self {
        Self { index, epoch }
    }

    /// The slot index as a `usize`, for indexing storage.
    #[must_use]
    pub const fn slot(self) -> usize {
        self.index as usize
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({}@{})", self.index, self.epoch)
    }
}

/// Hands out [`EntityId`]s for a fixed number of slots.
///
/// Freed slots are recycled oldest-first, each time under a new epoch.
#[derive(Debug)]
pub struct EntityAllocator {
    /// Current epoch of every slot touched so far.
    epochs: Vec<u32>,
    /// Whether each touched slot is currently occupied.
    live: Vec<bool>,
    /// Freed slots waiting for reuse.
    free: VecDeque<u32>,
    /// Maximum number of simultaneously live ids.
    capacity: usize,
    /// Number of live ids.
    count: usize,
}

impl EntityAllocator {
    /// Creates an allocator for at most `capacity` live entities.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            epochs: Vec::new(),
            live: Vec::new(),
            free: VecDeque::new(),
            capacity,
            count: 0,
        }
    }

    /// Allocates a fresh id, or `None` if every slot is occupied.
    pub fn allocate(&mut self) -> Option<EntityId> {
        if self.count >= self.capacity {
            return None;
        }

        let index = match self.free.pop_front() {
            Some(index) => index,
            None => {
                let index = u32::try_from(self.epochs.len()).ok()?;
                self.epochs.push(0);
                self.live.push(false);
                index
            }
        };

        let slot = index as usize;
        self.live[slot] = true;
        self.count += 1;
        Some(EntityId::new(index, self.epochs[slot]))
    }

    /// Releases `id`, bumping its slot's epoch.
    ///
    /// Returns `false` if `id` is stale or was never allocated.
    pub fn free(&mut self, id: EntityId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let slot = id.slot();
        self.live[slot] = false;
        self.epochs[slot] = self.epochs[slot].wrapping_add(1);
        self.free.push_back(id.index);
        self.count -= 1;
        true
    }

    /// Returns `true` if `id` refers to a currently occupied slot.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        let slot = id.slot();
        slot < self.epochs.len() && self.live[slot] && self.epochs[slot] == id.epoch
    }

    /// Returns the number of live ids.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the maximum number of live ids.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
