//! Static type information.
//!
//! ## Menu
//!
//! - [`Typed`] / [`DynamicTyped`]: access to a type's [`TypeInfo`].
//! - [`TypeInfo`]: path, name, [`TypeShape`], constructors and declared supertypes.
//! - [`TypeDescriptor`]: a cheap, copyable handle to a type's information.
//! - [`TypeInfoCell`] / [`GenericTypeInfoCell`]: static storage used by `Typed` impls.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod descriptor;
mod shape;
mod type_info;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, TypeInfoCell};
pub use descriptor::TypeDescriptor;
pub use shape::{BeanInfo, EnumInfo, ListInfo, MapInfo, SetInfo, TypeKind, TypeShape};
pub use type_info::{DefaultFn, FromStrFn, TypeInfo, short_type_name};
pub use typed::{DynamicTyped, Typed};
