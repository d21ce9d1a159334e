//! Converter traits and the handle the registry stores them behind.
//!
//! ## Menu
//!
//! - [`Converter`]: a pure `value -> value` transformation.
//! - [`StatefulEditor`]: a two-step `accept` / `read` editor with internal
//!   state, only usable as a shared, mutex-guarded entry.
//! - [`ConverterHandle`]: the cloneable handle registered in an
//!   [`EditorRegistry`](crate::registry::EditorRegistry).
//! - [`converter_fn`]: adapts a closure into a [`Converter`].

use core::any::type_name;
use core::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use vc_bean::Reflect;

use crate::ConversionError;
use crate::context::ConversionContext;

// -----------------------------------------------------------------------------
// Converter

/// Converts a value to the type described by the context.
///
/// Implementations must not keep state between calls. A converter that
/// cannot handle the value returns an error; it is not asked again.
pub trait Converter: Send + Sync {
    fn convert(
        &self,
        value: &dyn Reflect,
        ctx: &ConversionContext<'_>,
    ) -> Result<Box<dyn Reflect>, ConversionError>;

    /// Used in error messages and logs.
    fn name(&self) -> &str {
        type_name::<Self>()
    }
}

/// A [`Converter`] backed by a closure, see [`converter_fn`].
pub struct FnConverter<F> {
    name: &'static str,
    func: F,
}

/// Adapts a closure into a named [`Converter`].
///
/// ```
/// use vc_bean::Reflect;
/// use vc_convert::converter::{Converter, converter_fn};
/// use vc_convert::ConversionError;
///
/// let upper = converter_fn("upper", |value, ctx| {
///     match value.downcast_ref::<String>() {
///         Some(text) => Ok(Box::new(text.to_uppercase()) as Box<dyn Reflect>),
///         None => Err(ConversionError::new(value, ctx.target())),
///     }
/// });
/// assert_eq!(upper.name(), "upper");
/// ```
pub fn converter_fn<F>(name: &'static str, func: F) -> FnConverter<F>
where
    F: Fn(&dyn Reflect, &ConversionContext<'_>) -> Result<Box<dyn Reflect>, ConversionError>
        + Send
        + Sync
        + 'static,
{
    FnConverter { name, func }
}

impl<F> Converter for FnConverter<F>
where
    F: Fn(&dyn Reflect, &ConversionContext<'_>) -> Result<Box<dyn Reflect>, ConversionError>
        + Send
        + Sync
        + 'static,
{
    #[inline]
    fn convert(
        &self,
        value: &dyn Reflect,
        ctx: &ConversionContext<'_>,
    ) -> Result<Box<dyn Reflect>, ConversionError> {
        (self.func)(value, ctx)
    }

    #[inline]
    fn name(&self) -> &str {
        self.name
    }
}

// -----------------------------------------------------------------------------
// StatefulEditor

/// An editor that receives a value and is then asked for the result.
///
/// `accept` followed by `read` forms one conversion. The pair is always
/// driven under the editor's mutex, so an editor registered once can be
/// used from several threads.
pub trait StatefulEditor: Send {
    fn accept(&mut self, value: &dyn Reflect, ctx: &ConversionContext<'_>) -> Result<(), ConversionError>;

    fn read(&mut self) -> Result<Box<dyn Reflect>, ConversionError>;

    fn name(&self) -> &str {
        type_name::<Self>()
    }
}

// -----------------------------------------------------------------------------
// ConverterHandle

/// A registered converter.
///
/// Cloning the handle shares the converter.
#[derive(Clone)]
pub enum ConverterHandle {
    /// A stateless converter, called without locking.
    Pure(Arc<dyn Converter>),
    /// A stateful editor, serialized by its mutex.
    Shared(Arc<Mutex<dyn StatefulEditor>>),
}

impl ConverterHandle {
    pub fn pure<C: Converter + 'static>(converter: C) -> Self {
        Self::Pure(Arc::new(converter))
    }

    /// Shorthand for `ConverterHandle::pure(converter_fn(name, func))`.
    pub fn from_fn<F>(name: &'static str, func: F) -> Self
    where
        F: Fn(&dyn Reflect, &ConversionContext<'_>) -> Result<Box<dyn Reflect>, ConversionError>
            + Send
            + Sync
            + 'static,
    {
        Self::pure(converter_fn(name, func))
    }

    pub fn shared<E: StatefulEditor + 'static>(editor: E) -> Self {
        let editor: Arc<Mutex<dyn StatefulEditor>> = Arc::new(Mutex::new(editor));
        Self::Shared(editor)
    }

    #[inline]
    pub fn is_shared(&self) -> bool {
        matches!(self, Self::Shared(_))
    }

    pub fn name(&self) -> String {
        match self {
            Self::Pure(converter) => converter.name().to_owned(),
            Self::Shared(editor) => editor
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .name()
                .to_owned(),
        }
    }

    /// Whether both handles refer to the same converter.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Pure(a), Self::Pure(b)) => Arc::ptr_eq(a, b),
            (Self::Shared(a), Self::Shared(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Runs the converter.
    ///
    /// A shared editor stays locked from `accept` until `read` returns.
    pub fn apply(
        &self,
        value: &dyn Reflect,
        ctx: &ConversionContext<'_>,
    ) -> Result<Box<dyn Reflect>, ConversionError> {
        match self {
            Self::Pure(converter) => converter.convert(value, ctx),
            Self::Shared(editor) => {
                let mut editor = editor.lock().unwrap_or_else(PoisonError::into_inner);
                editor.accept(value, ctx)?;
                editor.read()
            }
        }
    }
}

impl fmt::Debug for ConverterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pure(converter) => f.debug_tuple("Pure").field(&converter.name()).finish(),
            Self::Shared(_) => f.debug_tuple("Shared").field(&self.name()).finish(),
        }
    }
}
