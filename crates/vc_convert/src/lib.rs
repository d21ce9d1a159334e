#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod error;
mod service;

pub mod context;
pub mod converter;
pub mod defaults;
pub mod pipeline;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-level exports

pub use error::ConversionError;
pub use service::ConversionService;

/// Commonly used items.
pub mod prelude {
    pub use crate::context::{ConversionContext, ConversionRequest};
    pub use crate::converter::{Converter, ConverterHandle, StatefulEditor, converter_fn};
    pub use crate::pipeline::TypeConverter;
    pub use crate::registry::EditorRegistry;
    pub use crate::{ConversionError, ConversionService};
}
