//! Dense per-family type indices.
//!
//! A family is a marker type declared with [`type_family!`]. The first time a
//! type asks for its index inside a family it receives the next free slot,
//! starting at zero; later calls return the same slot. Indices are never
//! reused for the lifetime of the process, and separate families count
//! independently.
//!
//! Lookups hit a thread-local cache first; the shared table is only locked
//! the first time a thread asks for a given type.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};

/// Dense index handed out by a [`TypeFamily`].
pub type TypeIndex = u64;

#[derive(Default)]
struct Registry {
    by_type: HashMap<TypeId, TypeIndex>,
    names: Vec<&'static str>,
}

/// Backing table of one family. Only constructed by [`type_family!`].
pub struct FamilyTable {
    registry: OnceLock<Mutex<Registry>>,
}

impl FamilyTable {
    #[doc(hidden)]
    pub const fn new() -> Self {
        Self {
            registry: OnceLock::new(),
        }
    }

    fn with_registry<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
        let mutex = self.registry.get_or_init(Mutex::default);
        let mut registry = mutex.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut registry)
    }
}

impl Default for FamilyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A scope that owns its own index counter.
pub trait TypeFamily: 'static {
    fn table() -> &'static FamilyTable;
}

/// Declares a family marker type with its own process-wide table.
///
/// ```
/// tickframe::type_family!(pub WidgetFamily);
/// struct Button;
/// let index = tickframe::type_index::type_index::<WidgetFamily, Button>();
/// assert_eq!(index, tickframe::type_index::type_index::<WidgetFamily, Button>());
/// ```
#[macro_export]
macro_rules! type_family {
    ($(#[$meta:meta])* $vis:vis $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis struct $name;

        impl $crate::type_index::TypeFamily for $name {
            fn table() -> &'static $crate::type_index::FamilyTable {
                static TABLE: $crate::type_index::FamilyTable =
                    $crate::type_index::FamilyTable::new();
                &TABLE
            }
        }
    };
}

thread_local! {
    /// Per-thread copy of every index this thread has already looked up,
    /// keyed by (family, type). Only misses reach the shared tables.
    static LOCAL_INDICES: RefCell<HashMap<(TypeId, TypeId), TypeIndex>> =
        RefCell::new(HashMap::new());
}

/// Index of `T` inside family `F`, assigning the next free slot on first use.
#[inline]
pub fn type_index<F: TypeFamily, T: ?Sized + 'static>() -> TypeIndex {
    let key = (TypeId::of::<F>(), TypeId::of::<T>());
    LOCAL_INDICES.with(|local| {
        *local
            .borrow_mut()
            .entry(key)
            .or_insert_with(|| register::<F>(key.1, std::any::type_name::<T>()))
    })
}

#[cold]
#[inline(never)]
fn register<F: TypeFamily>(type_id: TypeId, name: &'static str) -> TypeIndex {
    F::table().with_registry(|registry| {
        if let Some(&index) = registry.by_type.get(&type_id) {
            return index;
        }
        let index = registry.names.len() as TypeIndex;
        registry.by_type.insert(type_id, index);
        registry.names.push(name);
        index
    })
}

/// Type name registered at `index`, if that slot has been handed out.
pub fn type_name_at<F: TypeFamily>(index: TypeIndex) -> Option<&'static str> {
    F::table().with_registry(|registry| registry.names.get(index as usize).copied())
}

/// Number of types that have received an index in `F` so far.
pub fn registered_count<F: TypeFamily>() -> usize {
    F::table().with_registry(|registry| registry.names.len())
}

/// Object-safe access to `Any` for trait objects built on top of it.
///
/// Call through `&dyn Trait` (not `&Box<dyn Trait>`), otherwise the blanket
/// impl resolves against the box itself.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
