//! One-shot operations with the default configuration.
//!
//! Each call builds a fresh navigator context with no custom converters
//! and the global introspection cache. Use a
//! [`PropertyNavigator`](crate::PropertyNavigator) to register converters
//! or change the configuration.

use vc_bean::Reflect;
use vc_bean::info::{DynamicTyped, TypeDescriptor};
use vc_bean::introspect::IntrospectionCache;
use vc_bean::path::tokenize;
use vc_convert::registry::EditorRegistry;

use crate::walk::{Walker, empty_path};
use crate::{BindConfig, BindError, PropertyNavigator, PropertyValues};

fn walker() -> Walker<'static> {
    Walker::new(BindConfig::default(), EditorRegistry::new(), IntrospectionCache::global())
}

/// Reads the value at `path` below `root`.
pub fn get_value(root: &dyn Reflect, path: &str) -> Result<Option<Box<dyn Reflect>>, BindError> {
    let parsed = tokenize(path);
    if parsed.is_empty() {
        return Err(empty_path(root));
    }
    let value = walker().read(root, &parsed, parsed.len())?;
    Ok(value.map(|value| value.reflect_clone()))
}

/// Converts `value` and stores it at `path` below `root`.
pub fn set_value(root: &mut dyn Reflect, path: &str, value: Box<dyn Reflect>) -> Result<(), BindError> {
    PropertyNavigator::new(root).set_value(path, value)
}

/// See [`PropertyNavigator::set_values`].
pub fn set_values(
    root: &mut dyn Reflect,
    values: PropertyValues,
    ignore_unknown: bool,
    ignore_invalid: bool,
) -> Result<(), BindError> {
    PropertyNavigator::new(root).set_values(values, ignore_unknown, ignore_invalid)
}

pub fn declared_type(root: &dyn Reflect, path: &str) -> Option<TypeDescriptor> {
    walker().declared_type(root.reflect_type(), &tokenize(path))
}

pub fn is_readable(root: &dyn Reflect, path: &str) -> bool {
    walker().is_readable(root, &tokenize(path))
}

pub fn is_writable(root: &dyn Reflect, path: &str) -> bool {
    walker().is_writable(root, &tokenize(path))
}
