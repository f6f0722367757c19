//! Entity management

use std::any::type_name;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::bundle::ComponentBundle;
use super::component::{component_index, Component, ErasedComponent};
use crate::bitset::Bitset;
use crate::error::{EcsError, EcsResult};
use crate::type_index::TypeIndex;

/// Entity ID, unique within its world and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub(crate) u64);

impl EntityId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static NEXT_WORLD_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a world instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WorldId(u64);

impl WorldId {
    pub(crate) fn next() -> Self {
        WorldId(NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Reference to an entity from outside its world.
///
/// Carries the owning world's identity so a world can reject handles it did
/// not issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    pub(crate) world: WorldId,
    pub(crate) id: EntityId,
}

impl EntityHandle {
    pub fn world(self) -> WorldId {
        self.world
    }

    pub fn id(self) -> EntityId {
        self.id
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.world, self.id)
    }
}

/// An identity plus the components attached to it.
///
/// `enabled_components` has bit `k` set iff a component with type index `k`
/// is attached. A component type can be attached at most once.
pub struct Entity {
    id: EntityId,
    world: WorldId,
    enabled: bool,
    components: Vec<(TypeIndex, Box<dyn ErasedComponent>)>,
    enabled_components: Bitset,
}

impl Entity {
    pub(crate) fn new(world: WorldId, id: EntityId) -> Self {
        Self {
            id,
            world,
            enabled: true,
            components: Vec::new(),
            enabled_components: Bitset::new(),
        }
    }

    /// A fresh entity holding just `component`.
    pub(crate) fn with_component<T: Component>(world: WorldId, id: EntityId, component: T) -> Self {
        let mut entity = Self::new(world, id);
        entity.attach(component_index::<T>(), Box::new(component));
        entity
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn handle(&self) -> EntityHandle {
        EntityHandle {
            world: self.world,
            id: self.id,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Takes effect for system linkage at the world's next refresh.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn enabled_components(&self) -> &Bitset {
        &self.enabled_components
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Type names of attached components in attach order.
    pub fn component_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.components.iter().map(|(_, component)| component.type_name())
    }

    pub fn add_component<T: Component>(&mut self, component: T) -> EcsResult<&mut T> {
        let index = component_index::<T>();
        if self.has_index(index) {
            return Err(EcsError::DuplicateComponent {
                entity: self.id,
                component: type_name::<T>(),
            });
        }
        self.attach(index, Box::new(component));
        let slot = self.components.len() - 1;
        self.components[slot]
            .1
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or(EcsError::ComponentNotFound {
                entity: self.id,
                component: type_name::<T>(),
            })
    }

    /// Attaches every component of `bundle`, or none of them if any type is
    /// already present or repeated inside the bundle.
    pub fn add_components<B: ComponentBundle>(&mut self, bundle: B) -> EcsResult<()> {
        let indices = B::type_indices();
        let names = B::type_names();
        let mut seen = HashSet::new();
        for (index, name) in indices.iter().zip(names) {
            if self.has_index(*index) || !seen.insert(*index) {
                return Err(EcsError::DuplicateComponent {
                    entity: self.id,
                    component: name,
                });
            }
        }
        for (index, component) in indices.into_iter().zip(bundle.into_components()) {
            self.attach(index, component);
        }
        Ok(())
    }

    pub fn has_component<T: Component>(&self) -> bool {
        self.has_index(component_index::<T>())
    }

    pub fn get_component<T: Component>(&self) -> EcsResult<&T> {
        let index = component_index::<T>();
        self.components
            .iter()
            .find(|(slot_index, _)| *slot_index == index)
            .and_then(|(_, component)| component.as_any().downcast_ref::<T>())
            .ok_or(EcsError::ComponentNotFound {
                entity: self.id,
                component: type_name::<T>(),
            })
    }

    pub fn get_component_mut<T: Component>(&mut self) -> EcsResult<&mut T> {
        let index = component_index::<T>();
        let id = self.id;
        self.components
            .iter_mut()
            .find(|(slot_index, _)| *slot_index == index)
            .and_then(|(_, component)| component.as_any_mut().downcast_mut::<T>())
            .ok_or(EcsError::ComponentNotFound {
                entity: id,
                component: type_name::<T>(),
            })
    }

    /// Detaches and returns the `T` component, clearing its presence bit.
    pub fn remove_component<T: Component>(&mut self) -> EcsResult<T> {
        let index = component_index::<T>();
        let not_found = EcsError::ComponentNotFound {
            entity: self.id,
            component: type_name::<T>(),
        };
        let position = self
            .components
            .iter()
            .position(|(slot_index, _)| *slot_index == index)
            .ok_or_else(|| not_found.clone())?;
        let (_, component) = self.components.remove(position);
        self.enabled_components.set(index as usize, false);
        component
            .into_any()
            .downcast::<T>()
            .map(|component| *component)
            .map_err(|_| not_found)
    }

    fn has_index(&self, index: TypeIndex) -> bool {
        self.enabled_components.get(index as usize)
    }

    fn attach(&mut self, index: TypeIndex, component: Box<dyn ErasedComponent>) {
        self.components.push((index, component));
        self.enabled_components.set(index as usize, true);
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("world", &self.world)
            .field("enabled", &self.enabled)
            .field("components", &self.component_names().collect::<Vec<_>>())
            .field("enabled_components", &self.enabled_components)
            .finish()
    }
}
