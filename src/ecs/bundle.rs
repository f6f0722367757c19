use std::any::type_name;

use super::component::{component_index, Component, ErasedComponent};
use crate::type_index::TypeIndex;

/// A static list of component types, written as a tuple.
///
/// Used to declare what a system accepts:
///
/// ```ignore
/// core.register_components::<(Transform, Velocity)>();
/// ```
pub trait ComponentSet: 'static {
    fn type_indices() -> Vec<TypeIndex>;
    fn type_names() -> Vec<&'static str>;
}

/// A tuple of component values attached to an entity in one call.
///
/// Implemented for tuples of up to 8 components.
pub trait ComponentBundle: ComponentSet {
    fn into_components(self) -> Vec<Box<dyn ErasedComponent>>;
}

macro_rules! impl_component_tuple {
    ($($T:ident),+) => {
        impl<$($T: Component),+> ComponentSet for ($($T,)+) {
            fn type_indices() -> Vec<TypeIndex> {
                vec![$(component_index::<$T>()),+]
            }

            fn type_names() -> Vec<&'static str> {
                vec![$(type_name::<$T>()),+]
            }
        }

        impl<$($T: Component),+> ComponentBundle for ($($T,)+) {
            fn into_components(self) -> Vec<Box<dyn ErasedComponent>> {
                #[allow(non_snake_case)]
                let ($($T,)+) = self;
                vec![$(Box::new($T) as Box<dyn ErasedComponent>),+]
            }
        }
    };
}

impl_component_tuple!(A);
impl_component_tuple!(A, B);
impl_component_tuple!(A, B, C);
impl_component_tuple!(A, B, C, D);
impl_component_tuple!(A, B, C, D, E);
impl_component_tuple!(A, B, C, D, E, F);
impl_component_tuple!(A, B, C, D, E, F, G);
impl_component_tuple!(A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    use super::*;

    struct Mass(f32);
    impl Component for Mass {}

    struct Charge(i8);
    impl Component for Charge {}

    #[test]
    fn test_tuple_lists_indices_in_order() {
        let indices = <(Mass, Charge)>::type_indices();
        assert_eq!(
            indices,
            vec![component_index::<Mass>(), component_index::<Charge>()]
        );
        assert_eq!(<(Charge,)>::type_names().len(), 1);
    }

    #[test]
    fn test_bundle_boxes_each_value() {
        let components = (Mass(2.0), Charge(-1)).into_components();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].type_index(), component_index::<Mass>());
        let charge = components[1].as_any().downcast_ref::<Charge>().unwrap();
        assert_eq!(charge.0, -1);
        let mass = components[0].as_any().downcast_ref::<Mass>().unwrap();
        assert_eq!(mass.0, 2.0);
    }
}
