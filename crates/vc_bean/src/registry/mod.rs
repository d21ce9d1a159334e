//! Lookup of reflected types by name.
//!
//! The conversion pipeline uses the [`TypeRegistry`] to resolve enum
//! constants written in their legacy `Type.CONSTANT` form.
//!
//! ## Menu
//!
//! - [`TypeRegistry`]: types by [`TypeId`](core::any::TypeId), full path and short name.
//! - [`TypeRegistration`]: a static registration submitted by the
//!   reflection macros.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, every type declared through
//! [`impl_reflect_bean!`](crate::impl_reflect_bean),
//! [`impl_reflect_enum!`](crate::impl_reflect_enum) or
//! [`impl_reflect_value!`](crate::impl_reflect_value) submits a
//! [`TypeRegistration`] through the [`inventory`] crate, and
//! [`TypeRegistry::global`] picks them up on first use.
//!
//! Platforms without `inventory` support simply register nothing.

// -----------------------------------------------------------------------------
// Modules

mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use type_registry::{TypeRegistration, TypeRegistry};
