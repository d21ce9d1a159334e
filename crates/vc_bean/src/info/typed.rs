use core::any::Any;

use crate::info::{TypeDescriptor, TypeInfo};

/// A type with static [`TypeInfo`].
///
/// Implementations keep the info in a [`TypeInfoCell`] (non-generic types)
/// or a [`GenericTypeInfoCell`] (generic types):
///
/// ```
/// use vc_bean::info::{TypeInfo, TypeInfoCell, Typed};
///
/// struct Token;
///
/// impl Typed for Token {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: TypeInfoCell = TypeInfoCell::new();
///         CELL.get_or_init(TypeInfo::value::<Self>)
///     }
/// }
///
/// assert_eq!(Token::type_info().type_name(), "Token");
/// ```
///
/// [`TypeInfoCell`]: crate::info::TypeInfoCell
/// [`GenericTypeInfoCell`]: crate::info::GenericTypeInfoCell
pub trait Typed: Any {
    fn type_info() -> &'static TypeInfo;
}

/// Object-safe access to [`Typed`], implemented for every `Typed` type.
pub trait DynamicTyped {
    fn reflect_type_info(&self) -> &'static TypeInfo;

    fn reflect_type(&self) -> TypeDescriptor;
}

impl<T: Typed> DynamicTyped for T {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        T::type_info()
    }

    #[inline]
    fn reflect_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<T>()
    }
}
