//! Dynamic views over reflected containers.
//!
//! [`Reflect::reflect_ref`] and [`Reflect::reflect_mut`] expose a value
//! either as one of the container traits ([`List`], [`Set`], [`Map`]) or
//! as a plain value. The property navigator uses these views to resolve
//! bracketed keys.

// -----------------------------------------------------------------------------
// Modules

mod list;
mod map;
mod set;

// -----------------------------------------------------------------------------
// Exports

pub use list::List;
pub use map::Map;
pub use set::Set;

use crate::Reflect;
use crate::info::TypeKind;

// -----------------------------------------------------------------------------
// Views

/// An immutable container view.
pub enum ReflectRef<'a> {
    List(&'a dyn List),
    Set(&'a dyn Set),
    Map(&'a dyn Map),
    /// Scalars, enums, beans and opaque values.
    Value(&'a dyn Reflect),
}

/// A mutable container view.
pub enum ReflectMut<'a> {
    List(&'a mut dyn List),
    Set(&'a mut dyn Set),
    Map(&'a mut dyn Map),
    /// Scalars, enums, beans and opaque values.
    Value(&'a mut dyn Reflect),
}

impl ReflectRef<'_> {
    /// The kind reported by the value's type information.
    pub fn kind(&self) -> TypeKind {
        match self {
            ReflectRef::List(_) => TypeKind::List,
            ReflectRef::Set(_) => TypeKind::Set,
            ReflectRef::Map(_) => TypeKind::Map,
            ReflectRef::Value(value) => value.reflect_type_info().kind(),
        }
    }
}

// -----------------------------------------------------------------------------
// Errors

/// A value of the wrong type was inserted into a container.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected a value of type `{expected}`, found `{found}`")]
pub struct MismatchedType {
    pub expected: &'static str,
    pub found: &'static str,
}

impl MismatchedType {
    /// Describes a failed insertion of `found` where `expected` was required.
    #[inline]
    pub fn new(expected: &'static str, found: &dyn Reflect) -> Self {
        Self {
            expected,
            found: found.reflect_type_info().type_path(),
        }
    }
}
