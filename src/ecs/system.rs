//! Systems and their entity linkage.

use std::any::type_name;

use super::bundle::ComponentSet;
use super::component::{component_index, Component};
use super::entity::{Entity, EntityId};
use super::store::EntityStore;
use crate::bitset::Bitset;
use crate::time::FrameTimeInfo;
use crate::type_index::{type_index, AsAny, TypeIndex};

crate::type_family!(
    /// Index family shared by every [`System`] type.
    pub SystemFamily
);

/// Dense index of system type `S`, assigned on first use.
pub fn system_index<S: System>() -> TypeIndex {
    type_index::<SystemFamily, S>()
}

/// Bookkeeping every system carries: the component types it accepts and the
/// ids of entities its world has linked to it.
#[derive(Debug, Clone, Default)]
pub struct SystemCore {
    accepted: Bitset,
    linked: Vec<EntityId>,
}

impl SystemCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A core accepting every type in `S`.
    pub fn accepting<S: ComponentSet>() -> Self {
        let mut core = Self::new();
        core.register_components::<S>();
        core
    }

    pub fn register_component<T: Component>(&mut self) {
        self.accepted.set(component_index::<T>() as usize, true);
    }

    pub fn register_components<S: ComponentSet>(&mut self) {
        for index in S::type_indices() {
            self.accepted.set(index as usize, true);
        }
    }

    pub fn unregister_component<T: Component>(&mut self) {
        self.accepted.set(component_index::<T>() as usize, false);
    }

    pub fn unregister_components<S: ComponentSet>(&mut self) {
        for index in S::type_indices() {
            self.accepted.set(index as usize, false);
        }
    }

    pub fn accepted_components(&self) -> &Bitset {
        &self.accepted
    }

    /// True when `components` shares at least one type with the accepted set.
    pub fn accepts(&self, components: &Bitset) -> bool {
        self.accepted.intersects(components)
    }

    /// Linear scan over the linked ids.
    pub fn contains(&self, id: EntityId) -> bool {
        self.linked.iter().any(|linked| *linked == id)
    }

    pub fn link(&mut self, id: EntityId) {
        self.linked.push(id);
    }

    pub fn unlink(&mut self, id: EntityId) {
        self.linked.retain(|linked| *linked != id);
    }

    /// Linked ids in link order.
    pub fn linked_entities(&self) -> &[EntityId] {
        &self.linked
    }

    pub fn linked_count(&self) -> usize {
        self.linked.len()
    }

    pub(crate) fn clear_links(&mut self) {
        self.linked.clear();
    }
}

/// A per-world processor.
///
/// The owning world links every enabled entity whose components intersect
/// [`SystemCore::accepted_components`] and unlinks it once they no longer do.
/// Returning `false` from [`System::update`] retires the system for good: it
/// is never updated, linked or unlinked again.
pub trait System: AsAny {
    fn name(&self) -> &str {
        type_name::<Self>()
    }

    fn core(&self) -> &SystemCore;

    fn core_mut(&mut self) -> &mut SystemCore;

    fn update(&mut self, time: &FrameTimeInfo, entities: &mut EntityStore) -> bool;

    /// Called when `entity` starts matching. Overrides that keep per-entity
    /// caches must still record the link in the core.
    fn link_entity(&mut self, entity: &Entity) {
        self.core_mut().link(entity.id());
    }

    /// Called when `entity` stops matching or is removed from the world.
    fn unlink_entity(&mut self, entity: &Entity) {
        self.core_mut().unlink(entity.id());
    }

    fn contains_entity(&self, id: EntityId) -> bool {
        self.core().contains(id)
    }
}
