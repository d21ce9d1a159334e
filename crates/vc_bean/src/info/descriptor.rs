use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::info::{TypeInfo, TypeKind, TypeShape, Typed};

// -----------------------------------------------------------------------------
// TypeDescriptor

/// A copyable handle to a type's [`TypeInfo`].
///
/// The info is resolved lazily, which lets recursive types describe
/// themselves: a `Vec<Node>` inside `Node` only stores a descriptor.
///
/// Equality and hashing use the [`TypeId`] alone.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    type_id: TypeId,
    info: fn() -> &'static TypeInfo,
}

impl TypeDescriptor {
    /// Returns the descriptor of `T`.
    #[inline]
    pub fn of<T: Typed>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            info: T::type_info,
        }
    }

    #[inline]
    pub fn type_id(self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn info(self) -> &'static TypeInfo {
        (self.info)()
    }

    #[inline]
    pub fn type_path(self) -> &'static str {
        self.info().type_path()
    }

    #[inline]
    pub fn type_name(self) -> &'static str {
        self.info().type_name()
    }

    #[inline]
    pub fn kind(self) -> TypeKind {
        self.info().kind()
    }

    #[inline]
    pub fn is<T: 'static>(self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// The element type of a list or set.
    pub fn element(self) -> Option<TypeDescriptor> {
        match self.info().shape() {
            TypeShape::List(info) => Some(info.element()),
            TypeShape::Set(info) => Some(info.element()),
            _ => None,
        }
    }

    /// The key type of a map.
    pub fn key(self) -> Option<TypeDescriptor> {
        self.info().as_map().map(|info| info.key())
    }

    /// The value type of a map.
    pub fn value(self) -> Option<TypeDescriptor> {
        self.info().as_map().map(|info| info.value())
    }

    /// Whether `self` is `other` or one of its declared supertypes.
    pub fn is_assignable_from(self, other: TypeDescriptor) -> bool {
        self == other || other.info().has_supertype(self)
    }

    /// Whether one of the two types is assignable from the other.
    #[inline]
    pub fn is_related_to(self, other: TypeDescriptor) -> bool {
        self.is_assignable_from(other) || other.is_assignable_from(self)
    }
}

impl PartialEq for TypeDescriptor {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_path())
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::TypeDescriptor;
    use crate::info::TypeKind;
    use std::collections::BTreeMap;

    #[test]
    fn containers_expose_nested_types() {
        let ty = TypeDescriptor::of::<BTreeMap<String, Vec<u8>>>();
        assert_eq!(ty.kind(), TypeKind::Map);
        assert_eq!(ty.key(), Some(TypeDescriptor::of::<String>()));

        let value = ty.value().unwrap();
        assert_eq!(value.element(), Some(TypeDescriptor::of::<u8>()));
        assert_eq!(value.type_name(), "Vec<u8>");
        assert_eq!(ty.element(), None);
    }

    #[test]
    fn assignable_only_to_itself_without_supertypes() {
        let a = TypeDescriptor::of::<u8>();
        let b = TypeDescriptor::of::<u16>();
        assert!(a.is_assignable_from(a));
        assert!(!a.is_assignable_from(b));
        assert!(!a.is_related_to(b));
    }
}
