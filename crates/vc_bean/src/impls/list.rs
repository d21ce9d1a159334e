use core::any::type_name;
use core::fmt;
use std::collections::VecDeque;

use crate::Reflect;
use crate::info::{GenericTypeInfoCell, TypeDescriptor, TypeInfo, Typed};
use crate::ops::{List, MismatchedType, ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// Vec

impl<T: Reflect + Typed + Clone> Typed for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::list::<Self, T>().with_default::<Self>())
    }
}

impl<T: Reflect + Typed + Clone> Reflect for Vec<T> {
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::List(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::List(self)
    }

    #[inline]
    fn reflect_clone(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }

    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(<[T]>::iter(self).map(Reflect::as_reflect))
            .finish()
    }
}

impl<T: Reflect + Typed + Clone> List for Vec<T> {
    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(Reflect::as_reflect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        <[T]>::get_mut(self, index).map(Reflect::as_reflect_mut)
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), MismatchedType> {
        let value = value
            .take::<T>()
            .map_err(|value| MismatchedType::new(type_name::<T>(), &*value))?;
        Vec::push(self, value);
        Ok(())
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(<[T]>::iter(self).map(Reflect::as_reflect))
    }

    #[inline]
    fn element_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<T>()
    }
}

// -----------------------------------------------------------------------------
// VecDeque

impl<T: Reflect + Typed + Clone> Typed for VecDeque<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::list::<Self, T>().with_default::<Self>())
    }
}

impl<T: Reflect + Typed + Clone> Reflect for VecDeque<T> {
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::List(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::List(self)
    }

    #[inline]
    fn reflect_clone(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }

    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(VecDeque::iter(self).map(Reflect::as_reflect))
            .finish()
    }
}

impl<T: Reflect + Typed + Clone> List for VecDeque<T> {
    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        VecDeque::get(self, index).map(Reflect::as_reflect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        VecDeque::get_mut(self, index).map(Reflect::as_reflect_mut)
    }

    #[inline]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), MismatchedType> {
        let value = value
            .take::<T>()
            .map_err(|value| MismatchedType::new(type_name::<T>(), &*value))?;
        VecDeque::push_back(self, value);
        Ok(())
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(VecDeque::iter(self).map(Reflect::as_reflect))
    }

    #[inline]
    fn element_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<T>()
    }
}

// -----------------------------------------------------------------------------
// Tests
