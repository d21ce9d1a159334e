use vc_bean::Reflect;
use vc_bean::info::TypeDescriptor;

use crate::ConversionError;

/// A generic conversion facility consulted before the default converters.
///
/// The [`TypeConverter`](crate::pipeline::TypeConverter) only calls
/// [`convert`](ConversionService::convert) when
/// [`can_convert`](ConversionService::can_convert) returns `true`. A failed
/// attempt is remembered: if the fallback strategies cannot produce a
/// value of the required type either, that failure is reported.
pub trait ConversionService: Send + Sync {
    fn can_convert(&self, source: TypeDescriptor, target: TypeDescriptor) -> bool;

    fn convert(&self, value: &dyn Reflect, target: TypeDescriptor) -> Result<Box<dyn Reflect>, ConversionError>;
}
