//! Densely packed component storage
//!
//! One store per component kind. Records live in a contiguous backing
//! vector for cache-friendly iteration; a side map gives O(1) lookup by
//! entity handle. Index 0 of the backing vector is reserved as the
//! "no component" sentinel, so valid records start at index 1.

use std::collections::{HashMap, HashSet};

use super::{Component, EcsError, Entity};

/// Dense storage for one component kind
///
/// Removal swaps the removed record with the last live record and
/// truncates, keeping the backing vector packed. This changes the slot
/// of the moved record, so slots cached by callers are invalid across
/// any mutation of the store.
pub struct ComponentStore<T: Component> {
    entities: Vec<Entity>,
    data: Vec<T>,
    slots: HashMap<Entity, usize>,
    changed: HashSet<Entity>,
}

impl<T: Component + Default> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component + Default> ComponentStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entities: vec![Entity::placeholder()],
            data: vec![T::default()],
            slots: HashMap::new(),
            changed: HashSet::new(),
        }
    }
}

impl<T: Component> ComponentStore<T> {
    /// Attach a component to an entity
    pub fn add(&mut self, entity: Entity, component: T) -> Result<(), EcsError> {
        if self.slots.contains_key(&entity) {
            return Err(EcsError::DuplicateComponent(entity));
        }
        self.entities.push(entity);
        self.data.push(component);
        self.slots.insert(entity, self.data.len() - 1);
        self.changed.insert(entity);
        Ok(())
    }

    /// Detach and return an entity's component
    ///
    /// O(1): the removed record is swapped with the last live record and
    /// the moved record's slot mapping is fixed up.
    pub fn remove(&mut self, entity: Entity) -> Result<T, EcsError> {
        let slot = self
            .slots
            .remove(&entity)
            .ok_or(EcsError::NotFound(entity))?;
        let last = self.data.len() - 1;
        if slot != last {
            self.entities.swap(slot, last);
            self.data.swap(slot, last);
            self.slots.insert(self.entities[slot], slot);
        }
        self.entities.pop();
        self.changed.remove(&entity);
        let removed = self.data.pop().expect("slot map referenced a missing record");
        Ok(removed)
    }

    /// Look up an entity's component
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slots.get(&entity).map(|&slot| &self.data[slot])
    }

    /// Look up an entity's component for mutation
    ///
    /// The entity is recorded on the per-frame change list, backing the
    /// "changed since last sync" query used by cache refreshes.
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let slot = *self.slots.get(&entity)?;
        self.changed.insert(entity);
        Some(&mut self.data[slot])
    }

    /// Check whether an entity has a component in this store
    pub fn contains(&self, entity: Entity) -> bool {
        self.slots.contains_key(&entity)
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.data.len() - 1
    }

    /// Check whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over live records in storage order
    ///
    /// Storage order is insertion/swap order; it is not stable across a
    /// removal.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities[1..]
            .iter()
            .copied()
            .zip(self.data[1..].iter())
    }

    /// Iterate over the entities with a record in this store
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities[1..].iter().copied()
    }

    /// Entities mutated (or added) since the last `clear_changed`
    pub fn recently_changed(&self) -> impl Iterator<Item = Entity> + '_ {
        self.changed.iter().copied()
    }

    /// Check whether an entity was mutated since the last `clear_changed`
    pub fn was_changed(&self, entity: Entity) -> bool {
        self.changed.contains(&entity)
    }

    /// Reset the change list, typically once per frame after caches sync
    pub fn clear_changed(&mut self) {
        self.changed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityRegistry;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Tag(i32);
    impl Component for Tag {}

    #[test]
    fn test_slot_zero_is_reserved() {
        let store: ComponentStore<Tag> = ComponentStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.iter().count(), 0);
    }

    #[test]
    fn test_add_and_lookup() {
        let mut registry = EntityRegistry::new();
        let mut store = ComponentStore::new();
        let entity = registry.create();

        store.add(entity, Tag(7)).unwrap();
        assert_eq!(store.get(entity), Some(&Tag(7)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_add_fails() {
        let mut registry = EntityRegistry::new();
        let mut store = ComponentStore::new();
        let entity = registry.create();

        store.add(entity, Tag(1)).unwrap();
        assert_eq!(
            store.add(entity, Tag(2)),
            Err(EcsError::DuplicateComponent(entity))
        );
        // The original record is untouched.
        assert_eq!(store.get(entity), Some(&Tag(1)));
    }

    #[test]
    fn test_remove_missing_fails() {
        let mut registry = EntityRegistry::new();
        let mut store: ComponentStore<Tag> = ComponentStore::new();
        let entity = registry.create();
        assert_eq!(store.remove(entity), Err(EcsError::NotFound(entity)));
    }

    #[test]
    fn test_swap_remove_preserves_survivor() {
        let mut registry = EntityRegistry::new();
        let mut store = ComponentStore::new();
        let e1 = registry.create();
        let e2 = registry.create();

        store.add(e1, Tag(1)).unwrap();
        store.add(e2, Tag(2)).unwrap();

        assert_eq!(store.remove(e1), Ok(Tag(1)));
        // e2 was swapped into e1's slot; its data and mapping must survive.
        assert_eq!(store.get(e2), Some(&Tag(2)));
        assert_eq!(store.get(e1), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_last_record() {
        let mut registry = EntityRegistry::new();
        let mut store = ComponentStore::new();
        let e1 = registry.create();
        let e2 = registry.create();

        store.add(e1, Tag(1)).unwrap();
        store.add(e2, Tag(2)).unwrap();
        assert_eq!(store.remove(e2), Ok(Tag(2)));
        assert_eq!(store.get(e1), Some(&Tag(1)));
    }

    #[test]
    fn test_iteration_in_storage_order() {
        let mut registry = EntityRegistry::new();
        let mut store = ComponentStore::new();
        let e1 = registry.create();
        let e2 = registry.create();
        let e3 = registry.create();

        store.add(e1, Tag(1)).unwrap();
        store.add(e2, Tag(2)).unwrap();
        store.add(e3, Tag(3)).unwrap();

        let collected: Vec<_> = store.iter().map(|(e, t)| (e, t.clone())).collect();
        assert_eq!(collected, vec![(e1, Tag(1)), (e2, Tag(2)), (e3, Tag(3))]);
    }

    #[test]
    fn test_change_list_tracks_mutation() {
        let mut registry = EntityRegistry::new();
        let mut store = ComponentStore::new();
        let e1 = registry.create();
        let e2 = registry.create();

        store.add(e1, Tag(1)).unwrap();
        store.add(e2, Tag(2)).unwrap();
        store.clear_changed();
        assert!(!store.was_changed(e1));

        store.get_mut(e1).unwrap().0 = 10;
        assert!(store.was_changed(e1));
        assert!(!store.was_changed(e2));
        assert_eq!(store.recently_changed().count(), 1);

        store.clear_changed();
        assert!(!store.was_changed(e1));
    }
}
