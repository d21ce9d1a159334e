//! What a converter is asked to do.

use core::fmt;

use vc_bean::Reflect;
use vc_bean::info::TypeDescriptor;

// -----------------------------------------------------------------------------
// ConversionContext

/// Describes the conversion a [`Converter`](crate::converter::Converter)
/// is performing.
#[derive(Clone, Copy)]
pub struct ConversionContext<'a> {
    target: TypeDescriptor,
    element: Option<TypeDescriptor>,
    path: Option<&'a str>,
    old_value: Option<&'a dyn Reflect>,
}

impl<'a> ConversionContext<'a> {
    pub fn new(target: TypeDescriptor) -> Self {
        Self {
            target,
            element: None,
            path: None,
            old_value: None,
        }
    }

    /// The required type.
    #[inline]
    pub fn target(&self) -> TypeDescriptor {
        self.target
    }

    /// The element type when the target is a container.
    #[inline]
    pub fn element(&self) -> Option<TypeDescriptor> {
        self.element.or_else(|| self.target.element())
    }

    /// The property path the value is converted for.
    #[inline]
    pub fn path(&self) -> Option<&'a str> {
        self.path
    }

    /// The value currently held by the property.
    ///
    /// Only present when the binder extracts it before converting.
    #[inline]
    pub fn old_value(&self) -> Option<&'a dyn Reflect> {
        self.old_value
    }

    pub(crate) fn for_target(&self, target: TypeDescriptor, path: Option<&'a str>) -> Self {
        Self {
            target,
            element: None,
            path,
            old_value: None,
        }
    }
}

impl fmt::Debug for ConversionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionContext")
            .field("target", &self.target)
            .field("element", &self.element)
            .field("path", &self.path)
            .field("old_value", &self.old_value)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// ConversionRequest

/// A value to convert, consumed by
/// [`TypeConverter::convert`](crate::pipeline::TypeConverter::convert).
pub struct ConversionRequest<'a> {
    value: Box<dyn Reflect>,
    context: ConversionContext<'a>,
}

impl<'a> ConversionRequest<'a> {
    pub fn new(value: Box<dyn Reflect>, target: TypeDescriptor) -> Self {
        Self {
            value,
            context: ConversionContext::new(target),
        }
    }

    /// Overrides the element type derived from the target type.
    pub fn with_element(mut self, element: Option<TypeDescriptor>) -> Self {
        self.context.element = element;
        self
    }

    /// The property path the value is converted for. Path-specific
    /// converters match against it.
    pub fn with_path(mut self, path: Option<&'a str>) -> Self {
        self.context.path = path;
        self
    }

    pub fn with_old_value(mut self, old_value: Option<&'a dyn Reflect>) -> Self {
        self.context.old_value = old_value;
        self
    }

    #[inline]
    pub fn value(&self) -> &dyn Reflect {
        &*self.value
    }

    #[inline]
    pub fn context(&self) -> &ConversionContext<'a> {
        &self.context
    }

    #[inline]
    pub fn into_parts(self) -> (Box<dyn Reflect>, ConversionContext<'a>) {
        (self.value, self.context)
    }
}

impl fmt::Debug for ConversionRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionRequest")
            .field("value", &self.value)
            .field("context", &self.context)
            .finish()
    }
}
