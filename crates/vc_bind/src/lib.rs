#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod config;
mod error;
mod navigator;
mod values;
mod walk;

pub mod facade;

// -----------------------------------------------------------------------------
// Top-level exports

pub use config::BindConfig;
pub use error::{AggregatedError, BindError};
pub use facade::{declared_type, get_value, is_readable, is_writable, set_value, set_values};
pub use navigator::PropertyNavigator;
pub use values::{PropertyValue, PropertyValues};

/// Commonly used items.
pub mod prelude {
    pub use crate::{BindConfig, BindError, PropertyNavigator, PropertyValue, PropertyValues};
}
