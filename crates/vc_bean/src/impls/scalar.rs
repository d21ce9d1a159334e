use core::fmt;

use crate::Reflect;
use crate::info::{TypeInfo, TypeInfoCell, Typed};
use crate::ops::{ReflectMut, ReflectRef};

macro_rules! impl_reflect_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: TypeInfoCell = TypeInfoCell::new();
                CELL.get_or_init(|| {
                    TypeInfo::scalar::<$ty>()
                        .with_default::<$ty>()
                        .with_from_str::<$ty>()
                })
            }
        }

        impl Reflect for $ty {
            fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                *self = value.take::<$ty>()?;
                Ok(())
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Value(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Value(self)
            }

            #[inline]
            fn reflect_clone(&self) -> Box<dyn Reflect> {
                Box::new(self.clone())
            }

            #[inline]
            fn reflect_to_string(&self) -> Option<String> {
                Some(self.to_string())
            }

            fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }
    )*};
}

impl_reflect_scalar!(
    bool, char, String,
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64,
);

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::info::{TypeKind, Typed};

    #[test]
    fn set_replaces_matching_type() {
        let mut value = 1_u64;
        value.set(Box::new(9_u64)).unwrap();
        assert_eq!(value, 9);

        let rejected = value.set(Box::new(String::from("9"))).unwrap_err();
        assert!(rejected.is::<String>());
        assert_eq!(value, 9);
    }

    #[test]
    fn textual_form() {
        assert_eq!(true.reflect_to_string().as_deref(), Some("true"));
        assert_eq!(2.5_f32.reflect_to_string().as_deref(), Some("2.5"));
        assert_eq!(<String as Typed>::type_info().kind(), TypeKind::Scalar);
        assert_eq!(<String as Typed>::type_info().type_name(), "String");
    }
}
