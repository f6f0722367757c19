//! World - owns entities and systems for one simulation instance

use std::any::type_name;

use log::{debug, info, trace};

use super::bundle::ComponentBundle;
use super::component::Component;
use super::entity::{Entity, EntityHandle, EntityId, WorldId};
use super::store::EntityStore;
use super::system::{system_index, System};
use crate::active_set::ActiveSet;
use crate::error::{EcsError, EcsResult};
use crate::time::FrameTimeInfo;
use crate::type_index::{AsAny, TypeIndex};

struct SystemSlot {
    type_index: TypeIndex,
    system: Box<dyn System>,
}

/// World holds all entities and systems
///
/// Each [`World::update`] first refreshes entity/system linkage, then updates
/// every active system in registration order.
pub struct World {
    id: WorldId,
    name: String,
    entities: EntityStore,
    systems: ActiveSet<SystemSlot>,
    active_entity_count: usize,
    next_entity_id: u64,
}

impl World {
    pub fn new() -> Self {
        Self::named("world")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: WorldId::next(),
            name: name.into(),
            entities: EntityStore::new(),
            systems: ActiveSet::new(),
            active_entity_count: 0,
            next_entity_id: 0,
        }
    }

    pub fn id(&self) -> WorldId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create a new, enabled entity
    pub fn add_entity(&mut self) -> EntityHandle {
        self.spawn().handle()
    }

    pub fn add_entity_with_component<T: Component>(&mut self, component: T) -> EntityHandle {
        let id = self.allocate_id();
        let entity = Entity::with_component(self.id, id, component);
        self.insert(entity).handle()
    }

    /// Fails without creating anything if the bundle repeats a component type.
    pub fn add_entity_with_components<B: ComponentBundle>(
        &mut self,
        bundle: B,
    ) -> EcsResult<EntityHandle> {
        let mut entity = Entity::new(self.id, EntityId(self.next_entity_id));
        entity.add_components(bundle)?;
        self.next_entity_id += 1;
        Ok(self.insert(entity).handle())
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    fn spawn(&mut self) -> &mut Entity {
        let id = self.allocate_id();
        let entity = Entity::new(self.id, id);
        self.insert(entity)
    }

    fn insert(&mut self, entity: Entity) -> &mut Entity {
        debug!("{}: added entity {}", self.name, entity.id());
        if entity.is_enabled() {
            self.active_entity_count += 1;
        }
        self.entities.push(entity)
    }

    /// Unlinks the entity from every system holding it, then drops it from
    /// the world and hands it back.
    pub fn remove_entity(&mut self, handle: EntityHandle) -> EcsResult<Entity> {
        let not_owned = EcsError::EntityNotOwned { entity: handle };
        if handle.world != self.id {
            return Err(not_owned);
        }
        let position = self.entities.position(handle.id).ok_or_else(|| not_owned.clone())?;
        let entity = &self.entities.as_slice()[position];
        // Retired systems included: no system may keep an id past removal.
        for slot in self.systems.iter_mut() {
            if slot.system.contains_entity(entity.id()) {
                slot.system.unlink_entity(entity);
            }
        }
        let entity = self.entities.remove(handle.id).ok_or(not_owned)?;
        // Removal keeps order, so the enabled prefix only loses this slot.
        if position < self.active_entity_count {
            self.active_entity_count -= 1;
        }
        debug!("{}: removed entity {}", self.name, entity.id());
        Ok(entity)
    }

    pub fn entity(&self, handle: EntityHandle) -> EcsResult<&Entity> {
        if handle.world != self.id {
            return Err(EcsError::EntityNotOwned { entity: handle });
        }
        self.entities
            .get(handle.id)
            .ok_or(EcsError::EntityNotOwned { entity: handle })
    }

    pub fn entity_mut(&mut self, handle: EntityHandle) -> EcsResult<&mut Entity> {
        if handle.world != self.id {
            return Err(EcsError::EntityNotOwned { entity: handle });
        }
        self.entities
            .get_mut(handle.id)
            .ok_or(EcsError::EntityNotOwned { entity: handle })
    }

    /// Entities in storage order. After a refresh the enabled ones come first.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn entity_store(&self) -> &EntityStore {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Enabled entities as of the last refresh, adjusted by later adds and
    /// removals.
    pub fn active_entity_count(&self) -> usize {
        self.active_entity_count
    }

    /// Registers a system and returns its slot. Systems update in slot order.
    pub fn add_system<S: System>(&mut self, system: S) -> usize {
        debug!("{}: added system `{}`", self.name, system.name());
        self.systems.push(SystemSlot {
            type_index: system_index::<S>(),
            system: Box::new(system),
        })
    }

    pub fn system<S: System>(&self) -> EcsResult<&S> {
        let index = system_index::<S>();
        self.systems
            .iter()
            .find(|slot| slot.type_index == index)
            .and_then(|slot| {
                let system: &dyn System = slot.system.as_ref();
                system.as_any().downcast_ref::<S>()
            })
            .ok_or(EcsError::SystemNotFound {
                system: type_name::<S>(),
            })
    }

    pub fn system_mut<S: System>(&mut self) -> EcsResult<&mut S> {
        let index = system_index::<S>();
        self.systems
            .iter_mut()
            .find(|slot| slot.type_index == index)
            .and_then(|slot| {
                let system: &mut dyn System = slot.system.as_mut();
                system.as_any_mut().downcast_mut::<S>()
            })
            .ok_or(EcsError::SystemNotFound {
                system: type_name::<S>(),
            })
    }

    /// Every registered system with its liveness, in slot order.
    pub fn systems(&self) -> impl Iterator<Item = (bool, &dyn System)> {
        let systems = &self.systems;
        systems
            .iter()
            .enumerate()
            .map(move |(slot, entry)| (systems.is_active(slot), entry.system.as_ref()))
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    pub fn is_system_active(&self, slot: usize) -> bool {
        self.systems.is_active(slot)
    }

    pub fn has_active_systems(&self) -> bool {
        self.systems.any_active()
    }

    /// Moves enabled entities to the front of storage and records how many
    /// there are.
    ///
    /// Two cursors walk in from both ends; each disabled entity found by the
    /// front cursor swaps with an enabled one found by the back cursor. One
    /// pass, not stable.
    fn sort_entities(&mut self) {
        let entities = self.entities.as_slice();
        let mut front = 0;
        let mut back = entities.len();
        let mut swaps = Vec::new();
        loop {
            while front < back && entities[front].is_enabled() {
                front += 1;
            }
            while back > front && !entities[back - 1].is_enabled() {
                back -= 1;
            }
            if front >= back {
                break;
            }
            swaps.push((front, back - 1));
            front += 1;
            back -= 1;
        }
        for (a, b) in swaps {
            self.entities.swap(a, b);
        }
        self.active_entity_count = front;
    }

    /// Recomputes which enabled entities are linked to which active systems.
    pub fn refresh(&mut self) {
        self.sort_entities();
        let name = &self.name;
        let active = &self.entities.as_slice()[..self.active_entity_count];
        for entity in active {
            for (_, slot) in self.systems.iter_active_mut() {
                let system = slot.system.as_mut();
                let matching = system.core().accepts(entity.enabled_components());
                let linked = system.contains_entity(entity.id());
                if matching && !linked {
                    debug!("{name}: linking entity {} to `{}`", entity.id(), system.name());
                    system.link_entity(entity);
                } else if !matching && linked {
                    debug!("{name}: unlinking entity {} from `{}`", entity.id(), system.name());
                    system.unlink_entity(entity);
                }
            }
        }
        trace!(
            "{name}: refreshed {} active of {} entities",
            self.active_entity_count,
            self.entities.len()
        );
    }

    /// Refreshes linkage, then updates every active system in registration
    /// order. A system returning `false` is retired permanently. Returns
    /// whether any system is still active.
    pub fn update(&mut self, time: &FrameTimeInfo) -> bool {
        self.refresh();
        let name = &self.name;
        let entities = &mut self.entities;
        self.systems.update_active(|slot, entry| {
            let keep = entry.system.update(time, entities);
            if !keep {
                info!("{name}: system `{}` (slot {slot}) is no longer active", entry.system.name());
            }
            keep
        })
    }

    /// Drops every entity and system. The world takes a new identity, so
    /// handles issued before this call no longer resolve.
    pub fn destroy(&mut self) {
        self.entities.clear();
        self.next_entity_id = 0;
        self.active_entity_count = 0;
        for slot in self.systems.iter_mut() {
            slot.system.core_mut().clear_links();
        }
        self.systems.clear();
        self.id = WorldId::next();
        debug!("{}: destroyed", self.name);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
