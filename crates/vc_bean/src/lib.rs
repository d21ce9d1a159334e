#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod macros;
mod reflection;

pub mod impls;
pub mod info;
pub mod introspect;
pub mod ops;
pub mod path;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-level exports

pub use reflection::Reflect;

/// Items used by the exported macros.
#[doc(hidden)]
pub mod __macro_exports {
    #[cfg(feature = "auto_register")]
    pub use inventory;
}

/// Commonly used items.
pub mod prelude {
    pub use crate::Reflect;
    pub use crate::info::{DynamicTyped, TypeDescriptor, TypeInfo, TypeKind, Typed};
    pub use crate::introspect::{Bean, BeanBuilder};
    pub use crate::ops::{List, Map, ReflectMut, ReflectRef, Set};
    pub use crate::{impl_reflect_bean, impl_reflect_enum, impl_reflect_value};
}
