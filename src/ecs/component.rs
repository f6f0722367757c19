//! Components and their dense type indices.

use std::any::{type_name, Any};

use crate::type_index::{type_index, TypeIndex};

crate::type_family!(
    /// Index family shared by every [`Component`] type.
    pub ComponentFamily
);

/// Marker for data that can be attached to an entity.
///
/// ```
/// use tickframe::ecs::Component;
///
/// struct Health(u32);
/// impl Component for Health {}
/// ```
pub trait Component: 'static {}

/// Dense index of component type `T`, assigned on first use.
pub fn component_index<T: Component>() -> TypeIndex {
    type_index::<ComponentFamily, T>()
}

/// Object-safe view of a component owned by an entity.
///
/// Implemented for every [`Component`]; entities store their components as
/// `Box<dyn ErasedComponent>`.
pub trait ErasedComponent: Any {
    fn type_index(&self) -> TypeIndex;
    fn type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Component> ErasedComponent for T {
    fn type_index(&self) -> TypeIndex {
        component_index::<T>()
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
