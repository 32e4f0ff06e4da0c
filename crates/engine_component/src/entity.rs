//! Entity handles and the entity table.
//!
//! An [`Entity`] is a lightweight `(index, generation)` pair with no inherent
//! data. The index keys the [`EntityTable`] and every component sparse set;
//! the generation is bumped each time an index is freed, so a handle that
//! outlived its entity no longer matches and is rejected.

use serde::{Deserialize, Serialize};

use crate::component::ComponentId;
use crate::error::EcsError;
use crate::pool::{SlotIndex, SlotPool};

/// A generational entity handle.
///
/// Entities are pure identifiers. They carry no data of their own. Components
/// are attached to entities to give them meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Create an entity from a raw index and generation.
    #[must_use]
    pub const fn from_raw(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the dense index of this entity.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Returns how many times this index had been freed when the handle was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

/// Per-entity table of component slot indices, one entry per declared
/// component type.
#[derive(Debug, Clone, Default)]
pub struct EntityRecord {
    generation: u32,
    alive: bool,
    /// `slots[id]` is the slot of component `id` in its channel, if attached.
    slots: Vec<Option<SlotIndex>>,
}

impl EntityRecord {
    /// Returns the current generation of this record's index.
    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Returns `true` while the record belongs to a live entity.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Returns the slot holding component `id`, if the entity has one.
    #[must_use]
    pub fn slot(&self, id: ComponentId) -> Option<SlotIndex> {
        self.slots.get(id.index()).copied().flatten()
    }

    /// Record (or clear) the slot of component `id`.
    pub fn set_slot(&mut self, id: ComponentId, slot: Option<SlotIndex>) {
        self.slots[id.index()] = slot;
    }

    /// Iterate over the attached components and their slots.
    pub fn occupied(&self) -> impl Iterator<Item = (ComponentId, SlotIndex)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.map(|s| (ComponentId(id as u32), s)))
    }

    /// Returns `true` if no component is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

/// Owns one [`EntityRecord`] per entity and recycles freed indices LIFO.
#[derive(Debug, Clone)]
pub struct EntityTable {
    records: SlotPool<EntityRecord>,
    component_count: usize,
    max_index: u32,
    live: usize,
}

impl EntityTable {
    /// Create an empty table for `component_count` component types whose
    /// indices never exceed `max_index`.
    #[must_use]
    pub fn new(component_count: usize, max_index: u32) -> Self {
        Self {
            records: SlotPool::new(),
            component_count,
            max_index,
            live: 0,
        }
    }

    /// Create an empty table with room for `capacity` records up front.
    #[must_use]
    pub fn with_capacity(component_count: usize, max_index: u32, capacity: usize) -> Self {
        Self {
            records: SlotPool::with_capacity(capacity),
            ..Self::new(component_count, max_index)
        }
    }

    /// Allocate an entity, reusing the most recently freed index if any.
    ///
    /// The record is reset so that every component slot is empty.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityLimitReached`] if the next index would exceed
    /// the configured maximum.
    pub fn allocate(&mut self) -> Result<Entity, EcsError> {
        if self.records.next_index() > self.max_index {
            return Err(EcsError::EntityLimitReached {
                max: self.max_index,
            });
        }
        let index = self.records.create_object();
        let record = &mut self.records[index];
        record.alive = true;
        if record.slots.is_empty() {
            record.slots.resize(self.component_count, None);
        } else {
            record.slots.fill(None);
        }
        self.live += 1;
        Ok(Entity::from_raw(index, record.generation))
    }

    /// Release `entity`'s index for reuse and invalidate every handle to it.
    ///
    /// All components must have been detached beforehand.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] if the handle is stale.
    pub fn free(&mut self, entity: Entity) -> Result<(), EcsError> {
        let record = self.record_mut(entity)?;
        debug_assert!(record.is_empty(), "{entity} freed with components attached");
        record.alive = false;
        record.generation = record.generation.wrapping_add(1);
        self.records.destroy_object(entity.index());
        self.live -= 1;
        Ok(())
    }

    /// Returns `true` if `entity` refers to a live entity.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.record(entity).is_ok()
    }

    /// Returns the record of a live entity.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] if the handle is stale.
    pub fn record(&self, entity: Entity) -> Result<&EntityRecord, EcsError> {
        match self.records.get(entity.index()) {
            Some(record) if record.alive && record.generation == entity.generation() => {
                Ok(record)
            }
            _ => Err(EcsError::EntityNotAlive(entity)),
        }
    }

    /// Returns the mutable record of a live entity.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] if the handle is stale.
    pub fn record_mut(&mut self, entity: Entity) -> Result<&mut EntityRecord, EcsError> {
        match self.records.get_mut(entity.index()) {
            Some(record) if record.alive && record.generation == entity.generation() => {
                Ok(record)
            }
            _ => Err(EcsError::EntityNotAlive(entity)),
        }
    }

    /// Returns the current handle of the live entity at `index`.
    #[must_use]
    pub fn handle(&self, index: u32) -> Option<Entity> {
        self.records
            .get(index)
            .filter(|record| record.alive)
            .map(|record| Entity::from_raw(index, record.generation))
    }

    /// Iterate over handles of every live entity, in index order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        (0..self.records.capacity() as u32).filter_map(|index| self.handle(index))
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if no entity is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Returns the largest index this table will hand out.
    #[must_use]
    pub fn max_index(&self) -> u32 {
        self.max_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_creation() {
        let e = Entity::from_raw(42, 3);
        assert_eq!(e.index(), 42);
        assert_eq!(e.generation(), 3);
        assert_eq!(e.to_string(), "Entity(42v3)");
    }

    #[test]
    fn test_allocator_produces_dense_ids() {
        let mut table = EntityTable::new(2, 100);
        let e1 = table.allocate().unwrap();
        let e2 = table.allocate().unwrap();
        let e3 = table.allocate().unwrap();
        assert_eq!(e1.index(), 0);
        assert_eq!(e2.index(), 1);
        assert_eq!(e3.index(), 2);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_new_record_has_no_components() {
        let mut table = EntityTable::new(3, 100);
        let e = table.allocate().unwrap();
        let record = table.record(e).unwrap();
        assert!(record.is_empty());
        assert_eq!(record.slot(ComponentId(2)), None);
    }

    #[test]
    fn test_freed_index_is_reused_with_new_generation() {
        let mut table = EntityTable::new(1, 100);
        let old = table.allocate().unwrap();
        table.free(old).unwrap();
        let new = table.allocate().unwrap();
        assert_eq!(old.index(), new.index());
        assert_ne!(old.generation(), new.generation());
        assert!(!table.is_alive(old));
        assert!(table.is_alive(new));
    }

    #[test]
    fn test_reused_record_is_reset() {
        let mut table = EntityTable::new(2, 100);
        let e = table.allocate().unwrap();
        table.record_mut(e).unwrap().set_slot(ComponentId(1), Some(7));
        table.record_mut(e).unwrap().set_slot(ComponentId(1), None);
        table.free(e).unwrap();
        let again = table.allocate().unwrap();
        assert!(table.record(again).unwrap().is_empty());
    }

    #[test]
    fn test_stale_handle_rejected() {
        let mut table = EntityTable::new(1, 100);
        let e = table.allocate().unwrap();
        table.free(e).unwrap();
        assert_eq!(table.free(e), Err(EcsError::EntityNotAlive(e)));
        assert!(table.record(e).is_err());
        assert!(table.record(Entity::from_raw(50, 0)).is_err());
    }

    #[test]
    fn test_limit_reached() {
        let mut table = EntityTable::new(1, 1);
        table.allocate().unwrap();
        let second = table.allocate().unwrap();
        assert_eq!(
            table.allocate(),
            Err(EcsError::EntityLimitReached { max: 1 })
        );
        table.free(second).unwrap();
        assert!(table.allocate().is_ok());
    }

    #[test]
    fn test_iter_skips_freed() {
        let mut table = EntityTable::new(1, 100);
        let a = table.allocate().unwrap();
        let b = table.allocate().unwrap();
        let c = table.allocate().unwrap();
        table.free(b).unwrap();
        let live: Vec<_> = table.iter().collect();
        assert_eq!(live, vec![a, c]);
        assert_eq!(table.handle(b.index()), None);
    }

    #[test]
    fn test_occupied_slots() {
        let mut table = EntityTable::new(3, 10);
        let e = table.allocate().unwrap();
        let record = table.record_mut(e).unwrap();
        record.set_slot(ComponentId(0), Some(4));
        record.set_slot(ComponentId(2), Some(1));
        let occupied: Vec<_> = table.record(e).unwrap().occupied().collect();
        assert_eq!(occupied, vec![(ComponentId(0), 4), (ComponentId(2), 1)]);
    }

    #[test]
    fn test_entity_serialization_roundtrip() {
        let entity = Entity::from_raw(999, 2);
        let json = serde_json::to_string(&entity).unwrap();
        let restored: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(entity, restored);
    }
}
