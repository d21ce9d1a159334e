use core::any::type_name;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::{BTreeMap, HashMap};

use crate::Reflect;
use crate::info::{GenericTypeInfoCell, TypeDescriptor, TypeInfo, Typed};
use crate::ops::{Map, MismatchedType, ReflectMut, ReflectRef};

fn take_entry<K: Reflect, V: Reflect>(
    key: Box<dyn Reflect>,
    value: Box<dyn Reflect>,
) -> Result<(K, V), MismatchedType> {
    let key = key
        .take::<K>()
        .map_err(|key| MismatchedType::new(type_name::<K>(), &*key))?;
    let value = value
        .take::<V>()
        .map_err(|value| MismatchedType::new(type_name::<V>(), &*value))?;
    Ok((key, value))
}

// -----------------------------------------------------------------------------
// HashMap

impl<K, V, S> Typed for HashMap<K, V, S>
where
    K: Reflect + Typed + Clone + Eq + Hash,
    V: Reflect + Typed + Clone,
    S: BuildHasher + Default + Clone + Send + Sync + 'static,
{
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::map::<Self, K, V>().with_default::<Self>())
    }
}

impl<K, V, S> Reflect for HashMap<K, V, S>
where
    K: Reflect + Typed + Clone + Eq + Hash,
    V: Reflect + Typed + Clone,
    S: BuildHasher + Default + Clone + Send + Sync + 'static,
{
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Map(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Map(self)
    }

    #[inline]
    fn reflect_clone(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }

    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(HashMap::iter(self).map(|(k, v)| (k.as_reflect(), v.as_reflect())))
            .finish()
    }
}

impl<K, V, S> Map for HashMap<K, V, S>
where
    K: Reflect + Typed + Clone + Eq + Hash,
    V: Reflect + Typed + Clone,
    S: BuildHasher + Default + Clone + Send + Sync + 'static,
{
    #[inline]
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn get(&self, key: &dyn Reflect) -> Option<&dyn Reflect> {
        key.downcast_ref::<K>()
            .and_then(|key| HashMap::get(self, key))
            .map(Reflect::as_reflect)
    }

    fn get_mut(&mut self, key: &dyn Reflect) -> Option<&mut dyn Reflect> {
        key.downcast_ref::<K>()
            .and_then(|key| HashMap::get_mut(self, key))
            .map(Reflect::as_reflect_mut)
    }

    fn insert(&mut self, key: Box<dyn Reflect>, value: Box<dyn Reflect>) -> Result<(), MismatchedType> {
        let (key, value) = take_entry::<K, V>(key, value)?;
        HashMap::insert(self, key, value);
        Ok(())
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
        Box::new(HashMap::iter(self).map(|(k, v)| (k.as_reflect(), v.as_reflect())))
    }

    #[inline]
    fn key_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<K>()
    }

    #[inline]
    fn value_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<V>()
    }
}

// -----------------------------------------------------------------------------
// BTreeMap

impl<K, V> Typed for BTreeMap<K, V>
where
    K: Reflect + Typed + Clone + Ord,
    V: Reflect + Typed + Clone,
{
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::map::<Self, K, V>().with_default::<Self>())
    }
}

impl<K, V> Reflect for BTreeMap<K, V>
where
    K: Reflect + Typed + Clone + Ord,
    V: Reflect + Typed + Clone,
{
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Map(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Map(self)
    }

    #[inline]
    fn reflect_clone(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }

    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(BTreeMap::iter(self).map(|(k, v)| (k.as_reflect(), v.as_reflect())))
            .finish()
    }
}

impl<K, V> Map for BTreeMap<K, V>
where
    K: Reflect + Typed + Clone + Ord,
    V: Reflect + Typed + Clone,
{
    #[inline]
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn get(&self, key: &dyn Reflect) -> Option<&dyn Reflect> {
        key.downcast_ref::<K>()
            .and_then(|key| BTreeMap::get(self, key))
            .map(Reflect::as_reflect)
    }

    fn get_mut(&mut self, key: &dyn Reflect) -> Option<&mut dyn Reflect> {
        key.downcast_ref::<K>()
            .and_then(|key| BTreeMap::get_mut(self, key))
            .map(Reflect::as_reflect_mut)
    }

    fn insert(&mut self, key: Box<dyn Reflect>, value: Box<dyn Reflect>) -> Result<(), MismatchedType> {
        let (key, value) = take_entry::<K, V>(key, value)?;
        BTreeMap::insert(self, key, value);
        Ok(())
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
        Box::new(BTreeMap::iter(self).map(|(k, v)| (k.as_reflect(), v.as_reflect())))
    }

    #[inline]
    fn key_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<K>()
    }

    #[inline]
    fn value_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<V>()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::ops::ReflectMut;
    use std::collections::BTreeMap;

    #[test]
    fn typed_key_lookup() {
        let mut map: BTreeMap<String, i64> = BTreeMap::new();
        let ReflectMut::Map(view) = map.reflect_mut() else {
            panic!("expected a map view");
        };
        view.insert(Box::new(String::from("a")), Box::new(1_i64))
            .unwrap();
        assert!(view.get(&String::from("a")).is_some());
        assert!(view.get(&1_i64).is_none());
        assert!(view
            .insert(Box::new(1_i64), Box::new(1_i64))
            .is_err());

        *view
            .get_mut(&String::from("a"))
            .unwrap()
            .downcast_mut::<i64>()
            .unwrap() += 1;
        assert_eq!(map["a"], 2);
    }
}
