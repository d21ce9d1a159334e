/// Implements [`Reflect`](crate::Reflect) and [`Typed`](crate::info::Typed)
/// for a [`Bean`](crate::introspect::Bean).
///
/// The type must be `Clone + Debug` and implement `Bean`. Optional flags
/// follow a colon:
///
/// - `Default`: registers `Default::default`, which lets the binder
///   create the bean when growing a nested path.
/// - `FromStr`: registers `FromStr::from_str` for string conversion.
/// - `Extends(Super)`: declares a supertype for converter lookup.
///
/// ```
/// use vc_bean::impl_reflect_bean;
/// use vc_bean::introspect::{Bean, BeanBuilder};
///
/// #[derive(Debug, Clone, Default)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Bean for Point {
///     fn describe(bean: &mut BeanBuilder<Self>) {
///         bean.field("x", |p| &p.x, |p| &mut p.x)
///             .field("y", |p| &p.y, |p| &mut p.y);
///     }
/// }
///
/// impl_reflect_bean!(Point: Default);
/// ```
#[macro_export]
macro_rules! impl_reflect_bean {
    ($ty:ty $(: $($flag:ident $(($arg:ty))?),* $(,)?)?) => {
        impl $crate::info::Typed for $ty {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::info::TypeInfoCell = $crate::info::TypeInfoCell::new();
                CELL.get_or_init(|| {
                    let info = $crate::info::TypeInfo::bean::<$ty>();
                    $($(let info = $crate::__reflect_flag!(info, $ty, $flag $(($arg))?);)*)?
                    info
                })
            }
        }

        $crate::__impl_reflect!($ty);
        $crate::__auto_register!($ty);
    };
}

/// Implements [`Reflect`](crate::Reflect) and [`Typed`](crate::info::Typed)
/// for a field-less enum.
///
/// Every variant must be listed; the constant name is the variant name.
/// The enum must be `Clone + Debug`. Flags are the same as for
/// [`impl_reflect_bean!`](crate::impl_reflect_bean).
///
/// ```
/// use vc_bean::impl_reflect_enum;
/// use vc_bean::info::Typed;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Default)]
/// enum Level {
///     #[default]
///     Low,
///     High,
/// }
///
/// impl_reflect_enum!(Level { Low, High }: Default);
///
/// let info = Level::type_info().as_enum().unwrap();
/// assert_eq!(info.constants(), ["Low", "High"]);
/// ```
#[macro_export]
macro_rules! impl_reflect_enum {
    ($ty:ident { $($variant:ident),+ $(,)? } $(: $($flag:ident $(($arg:ty))?),* $(,)?)?) => {
        impl $crate::info::Typed for $ty {
            fn type_info() -> &'static $crate::info::TypeInfo {
                fn from_name(name: &str) -> ::core::option::Option<::std::boxed::Box<dyn $crate::Reflect>> {
                    $(
                        if name == ::core::stringify!($variant) {
                            return ::core::option::Option::Some(::std::boxed::Box::new($ty::$variant));
                        }
                    )+
                    ::core::option::Option::None
                }

                static CELL: $crate::info::TypeInfoCell = $crate::info::TypeInfoCell::new();
                CELL.get_or_init(|| {
                    let info = $crate::info::TypeInfo::enumeration::<$ty>(
                        $crate::info::EnumInfo::new(&[$(::core::stringify!($variant)),+], from_name),
                    );
                    $($(let info = $crate::__reflect_flag!(info, $ty, $flag $(($arg))?);)*)?
                    info
                })
            }
        }

        impl $crate::Reflect for $ty {
            fn set(
                &mut self,
                value: ::std::boxed::Box<dyn $crate::Reflect>,
            ) -> ::core::result::Result<(), ::std::boxed::Box<dyn $crate::Reflect>> {
                *self = value.take::<$ty>()?;
                ::core::result::Result::Ok(())
            }

            #[inline]
            fn reflect_ref(&self) -> $crate::ops::ReflectRef<'_> {
                $crate::ops::ReflectRef::Value(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> $crate::ops::ReflectMut<'_> {
                $crate::ops::ReflectMut::Value(self)
            }

            #[inline]
            fn reflect_clone(&self) -> ::std::boxed::Box<dyn $crate::Reflect> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }

            fn reflect_to_string(&self) -> ::core::option::Option<::std::string::String> {
                #[allow(unreachable_patterns)]
                match self {
                    $($ty::$variant => ::core::option::Option::Some(
                        ::std::string::String::from(::core::stringify!($variant)),
                    ),)+
                    _ => ::core::option::Option::None,
                }
            }

            fn reflect_debug(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Debug::fmt(self, f)
            }
        }

        $crate::__auto_register!($ty);
    };
}

/// Implements [`Reflect`](crate::Reflect) and [`Typed`](crate::info::Typed)
/// for an opaque value type.
///
/// Values have no properties; paths stop at them. They can still be
/// converted to and from strings when declared with `FromStr`.
///
/// ```
/// use vc_bean::impl_reflect_value;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Celsius(f32);
///
/// impl core::str::FromStr for Celsius {
///     type Err = core::num::ParseFloatError;
///
///     fn from_str(text: &str) -> Result<Self, Self::Err> {
///         text.trim_end_matches("C").parse().map(Celsius)
///     }
/// }
///
/// impl_reflect_value!(Celsius: FromStr);
/// ```
#[macro_export]
macro_rules! impl_reflect_value {
    ($ty:ty $(: $($flag:ident $(($arg:ty))?),* $(,)?)?) => {
        impl $crate::info::Typed for $ty {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::info::TypeInfoCell = $crate::info::TypeInfoCell::new();
                CELL.get_or_init(|| {
                    let info = $crate::info::TypeInfo::value::<$ty>();
                    $($(let info = $crate::__reflect_flag!(info, $ty, $flag $(($arg))?);)*)?
                    info
                })
            }
        }

        $crate::__impl_reflect!($ty);
        $crate::__auto_register!($ty);
    };
}

// -----------------------------------------------------------------------------
// Internal

#[doc(hidden)]
#[macro_export]
macro_rules! __reflect_flag {
    ($info:ident, $ty:ty, Default) => {
        $info.with_default::<$ty>()
    };
    ($info:ident, $ty:ty, FromStr) => {
        $info.with_from_str::<$ty>()
    };
    ($info:ident, $ty:ty, Extends($super:ty)) => {
        $info.with_supertype::<$super>()
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __impl_reflect {
    ($ty:ty) => {
        impl $crate::Reflect for $ty {
            fn set(
                &mut self,
                value: ::std::boxed::Box<dyn $crate::Reflect>,
            ) -> ::core::result::Result<(), ::std::boxed::Box<dyn $crate::Reflect>> {
                *self = value.take::<$ty>()?;
                ::core::result::Result::Ok(())
            }

            #[inline]
            fn reflect_ref(&self) -> $crate::ops::ReflectRef<'_> {
                $crate::ops::ReflectRef::Value(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> $crate::ops::ReflectMut<'_> {
                $crate::ops::ReflectMut::Value(self)
            }

            #[inline]
            fn reflect_clone(&self) -> ::std::boxed::Box<dyn $crate::Reflect> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }

            fn reflect_debug(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Debug::fmt(self, f)
            }
        }
    };
}

#[cfg(feature = "auto_register")]
#[doc(hidden)]
#[macro_export]
macro_rules! __auto_register {
    ($ty:ty) => {
        #[allow(unsafe_code)]
        const _: () = {
            $crate::__macro_exports::inventory::submit! {
                $crate::registry::TypeRegistration::new($crate::info::TypeDescriptor::of::<$ty>)
            }
        };
    };
}

#[cfg(not(feature = "auto_register"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __auto_register {
    ($ty:ty) => {};
}

// -----------------------------------------------------------------------------
// Tests
