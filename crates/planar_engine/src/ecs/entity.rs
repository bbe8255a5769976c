//! Entity implementation

use super::EcsError;

/// Entity identifier
///
/// An opaque generational handle: the slot index names a storage slot
/// and the generation distinguishes successive occupants of that slot,
/// so a handle held across a destroy is detectably stale instead of
/// silently aliasing a new entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Placeholder handle for reserved storage slots. Never issued by
    /// the registry and never alive.
    pub(crate) fn placeholder() -> Self {
        Self {
            index: u32::MAX,
            generation: u32::MAX,
        }
    }

    /// Get the slot index
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Get the slot generation
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Issues and recycles entity handles
///
/// Holds no component data. Destroyed slots go on a free list and are
/// reissued with a bumped generation.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    generations: Vec<u32>,
    alive: Vec<bool>,
    free: Vec<u32>,
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity, recycling a destroyed slot if one exists
    pub fn create(&mut self) -> Entity {
        if let Some(index) = self.free.pop() {
            self.alive[index as usize] = true;
            Entity::new(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            self.alive.push(true);
            Entity::new(index, 0)
        }
    }

    /// Destroy an entity, invalidating its handle
    ///
    /// The slot's generation is bumped immediately so any outstanding
    /// copy of the handle fails `is_alive` from this point on.
    pub fn destroy(&mut self, entity: Entity) -> Result<(), EcsError> {
        if !self.is_alive(entity) {
            return Err(EcsError::InvalidHandle(entity));
        }
        let index = entity.index() as usize;
        self.alive[index] = false;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.free.push(entity.index());
        Ok(())
    }

    /// Check whether a handle refers to a live entity
    pub fn is_alive(&self, entity: Entity) -> bool {
        let index = entity.index() as usize;
        index < self.generations.len()
            && self.alive[index]
            && self.generations[index] == entity.generation()
    }

    /// Number of currently live entities
    pub fn live_count(&self) -> usize {
        self.generations.len() - self.free.len()
    }
}
