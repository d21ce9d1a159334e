use core::any::{Any, TypeId};
use core::fmt;

use crate::info::DynamicTyped;
use crate::ops::{ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// Reflect

/// The dynamic view of a value the binding engine can read and write.
///
/// Implementations are normally generated by [`impl_reflect_bean!`],
/// [`impl_reflect_enum!`] or [`impl_reflect_value!`]; the crate provides
/// them for primitives, `String` and the std containers.
///
/// Every reflected type is `Clone`, so [`reflect_clone`](Reflect::reflect_clone)
/// never fails.
///
/// [`impl_reflect_bean!`]: crate::impl_reflect_bean
/// [`impl_reflect_enum!`]: crate::impl_reflect_enum
/// [`impl_reflect_value!`]: crate::impl_reflect_value
pub trait Reflect: DynamicTyped + Any + Send + Sync {
    #[inline(always)]
    fn as_reflect(&self) -> &dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    #[inline(always)]
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    #[inline(always)]
    fn into_boxed_reflect(self) -> Box<dyn Reflect>
    where
        Self: Sized,
    {
        Box::new(self)
    }

    /// Returns the [`TypeId`] of the underlying type.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Replaces `self` with `value`.
    ///
    /// Returns the value back if its type is not `Self`.
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// Returns an immutable container view.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Returns a mutable container view.
    fn reflect_mut(&mut self) -> ReflectMut<'_>;

    /// Clones the value into a new box.
    fn reflect_clone(&self) -> Box<dyn Reflect>;

    /// The textual form of scalars and enum constants.
    ///
    /// Used for `String` coercion and to render map keys in paths.
    #[inline]
    fn reflect_to_string(&self) -> Option<String> {
        None
    }

    /// Debug formatting for `dyn Reflect`.
    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reflect({})", self.reflect_type_info().type_path())
    }
}

// -----------------------------------------------------------------------------
// Downcasting

impl dyn Reflect {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the box into the concrete value.
    ///
    /// Returns the box unchanged if the type does not match.
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        if !self.is::<T>() {
            return Err(self);
        }
        let any: Box<dyn Any> = self;
        match any.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => unreachable!("type id was checked before downcasting"),
        }
    }

    /// Renders a map key or list element for use inside a property path.
    ///
    /// Falls back to the `Debug` form when the value has no textual form.
    pub fn display_key(&self) -> String {
        self.reflect_to_string()
            .unwrap_or_else(|| format!("{self:?}"))
    }
}

impl fmt::Debug for dyn Reflect {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reflect_debug(f)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::Reflect;

    #[test]
    fn take_returns_box_on_mismatch() {
        let value: Box<dyn Reflect> = Box::new(7_i32);
        let value = value.take::<u8>().unwrap_err();
        assert_eq!(value.take::<i32>().unwrap(), 7);
    }

    #[test]
    fn downcast_through_dyn() {
        let mut text = String::from("a");
        let dynamic: &mut dyn Reflect = &mut text;
        assert!(dynamic.is::<String>());
        dynamic.downcast_mut::<String>().unwrap().push('b');
        assert_eq!(text, "ab");
    }

    #[test]
    fn debug_and_display_key() {
        let value: Box<dyn Reflect> = Box::new(3_u16);
        assert_eq!(format!("{value:?}"), "3");
        assert_eq!(value.display_key(), "3");
    }
}
