//! Entity Component System (ECS) implementation
//!
//! A [`World`] owns entities and systems. Entities carry boxed components plus
//! a presence bitset; systems declare the component types they accept and are
//! linked to every enabled entity sharing at least one of them.

pub mod bundle;
pub mod component;
pub mod entity;
pub mod store;
pub mod system;
pub mod world;

pub use bundle::{ComponentBundle, ComponentSet};
pub use component::{component_index, Component, ComponentFamily, ErasedComponent};
pub use entity::{Entity, EntityHandle, EntityId, WorldId};
pub use store::EntityStore;
pub use system::{system_index, System, SystemCore, SystemFamily};
pub use world::World;
