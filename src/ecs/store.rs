//! Ordered entity storage with id lookup.

use std::collections::HashMap;

use super::entity::{Entity, EntityId};

/// The entities of one world, in storage order.
///
/// Systems receive this view during `update` and resolve their linked ids
/// through it. An id that has been removed simply no longer resolves.
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
    positions: HashMap<EntityId, usize>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.positions.get(&id).map(|&position| &self.entities[position])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let position = *self.positions.get(&id)?;
        self.entities.get_mut(position)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    pub fn position(&self, id: EntityId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub(crate) fn push(&mut self, entity: Entity) -> &mut Entity {
        let position = self.entities.len();
        self.positions.insert(entity.id(), position);
        self.entities.push(entity);
        &mut self.entities[position]
    }

    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.entities.swap(a, b);
        self.positions.insert(self.entities[a].id(), a);
        self.positions.insert(self.entities[b].id(), b);
    }

    /// Removes the entity, keeping the relative order of the rest.
    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let position = self.positions.remove(&id)?;
        let entity = self.entities.remove(position);
        for (offset, shifted) in self.entities[position..].iter().enumerate() {
            self.positions.insert(shifted.id(), position + offset);
        }
        Some(entity)
    }

    pub(crate) fn clear(&mut self) {
        self.entities.clear();
        self.positions.clear();
    }
}
