use core::any::type_name;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::{BTreeSet, HashSet};

use crate::Reflect;
use crate::info::{GenericTypeInfoCell, TypeDescriptor, TypeInfo, Typed};
use crate::ops::{MismatchedType, ReflectMut, ReflectRef, Set};

// -----------------------------------------------------------------------------
// HashSet

impl<T, S> Typed for HashSet<T, S>
where
    T: Reflect + Typed + Clone + Eq + Hash,
    S: BuildHasher + Default + Clone + Send + Sync + 'static,
{
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::set::<Self, T>().with_default::<Self>())
    }
}

impl<T, S> Reflect for HashSet<T, S>
where
    T: Reflect + Typed + Clone + Eq + Hash,
    S: BuildHasher + Default + Clone + Send + Sync + 'static,
{
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Set(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Set(self)
    }

    #[inline]
    fn reflect_clone(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }

    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(HashSet::iter(self).map(Reflect::as_reflect))
            .finish()
    }
}

impl<T, S> Set for HashSet<T, S>
where
    T: Reflect + Typed + Clone + Eq + Hash,
    S: BuildHasher + Default + Clone + Send + Sync + 'static,
{
    #[inline]
    fn len(&self) -> usize {
        HashSet::len(self)
    }

    fn contains(&self, value: &dyn Reflect) -> bool {
        value
            .downcast_ref::<T>()
            .is_some_and(|value| HashSet::contains(self, value))
    }

    fn insert(&mut self, value: Box<dyn Reflect>) -> Result<bool, MismatchedType> {
        let value = value
            .take::<T>()
            .map_err(|value| MismatchedType::new(type_name::<T>(), &*value))?;
        Ok(HashSet::insert(self, value))
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(HashSet::iter(self).map(Reflect::as_reflect))
    }

    #[inline]
    fn element_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<T>()
    }
}

// -----------------------------------------------------------------------------
// BTreeSet

impl<T: Reflect + Typed + Clone + Ord> Typed for BTreeSet<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::set::<Self, T>().with_default::<Self>())
    }
}

impl<T: Reflect + Typed + Clone + Ord> Reflect for BTreeSet<T> {
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Set(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Set(self)
    }

    #[inline]
    fn reflect_clone(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }

    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(BTreeSet::iter(self).map(Reflect::as_reflect))
            .finish()
    }
}

impl<T: Reflect + Typed + Clone + Ord> Set for BTreeSet<T> {
    #[inline]
    fn len(&self) -> usize {
        BTreeSet::len(self)
    }

    fn contains(&self, value: &dyn Reflect) -> bool {
        value
            .downcast_ref::<T>()
            .is_some_and(|value| BTreeSet::contains(self, value))
    }

    fn insert(&mut self, value: Box<dyn Reflect>) -> Result<bool, MismatchedType> {
        let value = value
            .take::<T>()
            .map_err(|value| MismatchedType::new(type_name::<T>(), &*value))?;
        Ok(BTreeSet::insert(self, value))
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(BTreeSet::iter(self).map(Reflect::as_reflect))
    }

    #[inline]
    fn element_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<T>()
    }
}

// -----------------------------------------------------------------------------
// Tests
