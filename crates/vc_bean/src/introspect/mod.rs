//! Per-type accessor tables.
//!
//! A bean declares its properties once in [`Bean::describe`]. The
//! resulting [`IntrospectionRecord`] is immutable and shared through the
//! process-wide [`IntrospectionCache`].
//!
//! ## Menu
//!
//! - [`Bean`] / [`BeanBuilder`]: declaring properties.
//! - [`AccessorDescriptor`] / [`AccessFlags`]: one property.
//! - [`IntrospectionRecord`]: all properties of one type.
//! - [`IntrospectionCache`] / [`ScopeId`]: build-once storage with scoped eviction.

// -----------------------------------------------------------------------------
// Modules

mod accessor;
mod builder;
mod cache;
mod error;
mod record;

// -----------------------------------------------------------------------------
// Exports

pub use accessor::{AccessFlags, AccessorDescriptor};
pub use builder::{Bean, BeanBuilder};
pub use cache::{IntrospectionCache, ScopeId};
pub use error::{AccessorError, IntrospectionError};
pub use record::IntrospectionRecord;
