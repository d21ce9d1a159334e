use core::any::TypeId;
use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard};

use vc_utils::TypeIdMap;
use vc_utils::hash::{FixedHashState, HashMap, HashSet};

use crate::info::{TypeDescriptor, Typed};

// -----------------------------------------------------------------------------
// TypeRegistration

/// A type submitted for automatic registration.
///
/// Created by the reflection macros; there is rarely a reason to build
/// one by hand.
#[derive(Clone, Copy)]
pub struct TypeRegistration(fn() -> TypeDescriptor);

impl TypeRegistration {
    #[inline]
    pub const fn new(descriptor: fn() -> TypeDescriptor) -> Self {
        Self(descriptor)
    }

    #[inline]
    pub fn descriptor(&self) -> TypeDescriptor {
        (self.0)()
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(TypeRegistration);

// -----------------------------------------------------------------------------
// TypeRegistry

/// Reflected types, addressable by [`TypeId`], full type path and short
/// type name.
///
/// A short name shared by two registered types is ambiguous and resolves
/// to nothing; use the full path instead.
///
/// # Example
///
/// ```
/// use vc_bean::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
/// let ty = registry.get_with_type_name("String").unwrap();
/// assert_eq!(ty.type_path(), "alloc::string::String");
/// ```
pub struct TypeRegistry {
    types: TypeIdMap<TypeDescriptor>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            types: TypeIdMap::new(),
            type_path_to_id: HashMap::with_hasher(FixedHashState),
            type_name_to_id: HashMap::with_hasher(FixedHashState),
            ambiguous_names: HashSet::with_hasher(FixedHashState),
        }
    }

    /// Creates a registry holding the scalar types.
    ///
    /// - `bool` `char` `String`
    /// - `i8 - i128` `isize`
    /// - `u8 - u128` `usize`
    /// - `f32` `f64`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<String>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<i128>();
        registry.register::<isize>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<u128>();
        registry.register::<usize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry
    }

    /// The process-wide registry, populated with [`new`](Self::new) and
    /// [`auto_register`](Self::auto_register) on first use.
    pub fn global() -> &'static RwLock<TypeRegistry> {
        static GLOBAL: LazyLock<RwLock<TypeRegistry>> = LazyLock::new(|| {
            let mut registry = TypeRegistry::new();
            registry.auto_register();
            RwLock::new(registry)
        });
        &GLOBAL
    }

    /// Takes a read lock on the [`global`](Self::global) registry.
    pub fn read_global() -> RwLockReadGuard<'static, TypeRegistry> {
        Self::global().read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `T`. Returns `false` if it was already registered.
    #[inline]
    pub fn register<T: Typed>(&mut self) -> bool {
        self.register_descriptor(TypeDescriptor::of::<T>())
    }

    /// Registers the type behind `ty`. Returns `false` if it was already
    /// registered.
    pub fn register_descriptor(&mut self, ty: TypeDescriptor) -> bool {
        let Self {
            types,
            type_path_to_id,
            type_name_to_id,
            ambiguous_names,
        } = self;

        let id = ty.type_id();
        types.try_insert(id, || {
            let short = ty.type_name();
            // A second owner of a short name makes it unusable for lookup.
            if !ambiguous_names.contains(short) && type_name_to_id.insert(short, id).is_some() {
                type_name_to_id.remove(short);
                ambiguous_names.insert(short);
            }
            type_path_to_id.insert(ty.type_path(), id);
            ty
        })
    }

    /// Registers every [`TypeRegistration`] submitted by the reflection
    /// macros.
    ///
    /// Returns `false` when the `auto_register` feature is disabled.
    /// Repeated calls are cheap and insert nothing new.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            let mut added = 0_usize;
            for registration in inventory::iter::<TypeRegistration> {
                if self.register_descriptor(registration.descriptor()) {
                    added += 1;
                }
            }
            log::trace!("auto-registered {added} types");
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.types.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<TypeDescriptor> {
        self.types.get(&type_id).copied()
    }

    /// Looks a type up by its full path, such as `alloc::string::String`.
    pub fn get_with_type_path(&self, type_path: &str) -> Option<TypeDescriptor> {
        self.type_path_to_id
            .get(type_path)
            .and_then(|id| self.get(*id))
    }

    /// Looks a type up by its short name, such as `String`.
    ///
    /// Returns `None` when the name is ambiguous.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<TypeDescriptor> {
        self.type_name_to_id
            .get(type_name)
            .and_then(|id| self.get(*id))
    }

    /// Looks a type up by full path, then by short name.
    pub fn resolve(&self, name: &str) -> Option<TypeDescriptor> {
        self.get_with_type_path(name)
            .or_else(|| self.get_with_type_name(name))
    }

    /// Whether the short name matches more than one registered type.
    #[inline]
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = TypeDescriptor> + '_ {
        self.types.values().copied()
    }
}

// -----------------------------------------------------------------------------
// Tests
