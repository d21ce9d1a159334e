use core::any::type_name;
use core::marker::PhantomData;

use crate::Reflect;
use crate::info::{TypeDescriptor, Typed};
use crate::introspect::AccessorDescriptor;
use crate::introspect::AccessorError;
use crate::introspect::accessor::{Getter, GetterMut, Setter};

// -----------------------------------------------------------------------------
// Bean

/// A type with named properties.
///
/// The accessor table replaces runtime discovery: `describe` lists every
/// property once, and the result is cached per type.
///
/// ```
/// use vc_bean::impl_reflect_bean;
/// use vc_bean::introspect::{Bean, BeanBuilder};
///
/// #[derive(Debug, Clone, Default)]
/// struct Account {
///     owner: String,
///     limit: u32,
///     nickname: Option<String>,
///     id: u64,
/// }
///
/// impl Bean for Account {
///     fn describe(bean: &mut BeanBuilder<Self>) {
///         bean.field("owner", |a| &a.owner, |a| &mut a.owner)
///             .property("limit", |a| &a.limit, |a, limit: u32| {
///                 if limit > 10_000 {
///                     return Err(format!("limit {limit} is too high"));
///                 }
///                 a.limit = limit;
///                 Ok(())
///             })
///             .option_field("nickname", |a| &a.nickname, |a| &mut a.nickname)
///             .read_only("id", |a| &a.id);
///     }
/// }
///
/// impl_reflect_bean!(Account: Default);
/// ```
pub trait Bean: Reflect + Typed + Sized {
    fn describe(bean: &mut BeanBuilder<Self>);
}

// -----------------------------------------------------------------------------
// BeanBuilder

/// Collects the properties of a [`Bean`].
pub struct BeanBuilder<T> {
    properties: Vec<AccessorDescriptor>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Bean> BeanBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            properties: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub(crate) fn into_properties(self) -> Vec<AccessorDescriptor> {
        self.properties
    }

    /// A plain field: readable, writable and navigable.
    pub fn field<V, G, M>(&mut self, name: &'static str, get: G, get_mut: M) -> &mut Self
    where
        V: Reflect + Typed,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut V + Clone + Send + Sync + 'static,
    {
        let set = get_mut.clone();
        self.push(AccessorDescriptor::new(
            name,
            TypeDescriptor::of::<V>(),
            Some(getter(move |obj| {
                Ok(Some(get(receiver::<T>(obj)?).as_reflect()))
            })),
            Some(getter_mut(move |obj| {
                Ok(Some(get_mut(receiver_mut::<T>(obj)?).as_reflect_mut()))
            })),
            Some(setter(move |obj, value| {
                let value = take_value::<V>(value)?;
                *set(receiver_mut::<T>(obj)?) = value;
                Ok(())
            })),
            false,
        ))
    }

    /// An optional field. Reads of `None` report an absent value, writes
    /// store `Some`.
    pub fn option_field<V, G, M>(&mut self, name: &'static str, get: G, get_mut: M) -> &mut Self
    where
        V: Reflect + Typed,
        G: Fn(&T) -> &Option<V> + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut Option<V> + Clone + Send + Sync + 'static,
    {
        let set = get_mut.clone();
        self.push(AccessorDescriptor::new(
            name,
            TypeDescriptor::of::<V>(),
            Some(getter(move |obj| {
                Ok(get(receiver::<T>(obj)?).as_ref().map(Reflect::as_reflect))
            })),
            Some(getter_mut(move |obj| {
                Ok(get_mut(receiver_mut::<T>(obj)?)
                    .as_mut()
                    .map(Reflect::as_reflect_mut))
            })),
            Some(setter(move |obj, value| {
                let value = take_value::<V>(value)?;
                *set(receiver_mut::<T>(obj)?) = Some(value);
                Ok(())
            })),
            true,
        ))
    }

    /// A property written through a fallible setter.
    ///
    /// Readable and writable, but not navigable: nested paths can read
    /// through it and cannot write through it. A setter error is reported
    /// as [`AccessorError::Failed`].
    pub fn property<V, G, S>(&mut self, name: &'static str, get: G, set: S) -> &mut Self
    where
        V: Reflect + Typed,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        S: Fn(&mut T, V) -> Result<(), String> + Send + Sync + 'static,
    {
        self.push(AccessorDescriptor::new(
            name,
            TypeDescriptor::of::<V>(),
            Some(getter(move |obj| {
                Ok(Some(get(receiver::<T>(obj)?).as_reflect()))
            })),
            None,
            Some(fallible_setter::<T, V, S>(set)),
            false,
        ))
    }

    /// A read-only property.
    pub fn read_only<V, G>(&mut self, name: &'static str, get: G) -> &mut Self
    where
        V: Reflect + Typed,
        G: Fn(&T) -> &V + Send + Sync + 'static,
    {
        self.push(AccessorDescriptor::new(
            name,
            TypeDescriptor::of::<V>(),
            Some(getter(move |obj| {
                Ok(Some(get(receiver::<T>(obj)?).as_reflect()))
            })),
            None,
            None,
            false,
        ))
    }

    /// A write-only property.
    pub fn write_only<V, S>(&mut self, name: &'static str, set: S) -> &mut Self
    where
        V: Reflect + Typed,
        S: Fn(&mut T, V) -> Result<(), String> + Send + Sync + 'static,
    {
        self.push(AccessorDescriptor::new(
            name,
            TypeDescriptor::of::<V>(),
            None,
            None,
            Some(fallible_setter::<T, V, S>(set)),
            false,
        ))
    }

    #[inline]
    fn push(&mut self, descriptor: AccessorDescriptor) -> &mut Self {
        self.properties.push(descriptor);
        self
    }
}

// -----------------------------------------------------------------------------
// Type erasure

fn getter<F>(f: F) -> Getter
where
    F: for<'a> Fn(&'a dyn Reflect) -> Result<Option<&'a dyn Reflect>, AccessorError>
        + Send
        + Sync
        + 'static,
{
    Box::new(f)
}

fn getter_mut<F>(f: F) -> GetterMut
where
    F: for<'a> Fn(&'a mut dyn Reflect) -> Result<Option<&'a mut dyn Reflect>, AccessorError>
        + Send
        + Sync
        + 'static,
{
    Box::new(f)
}

fn setter<F>(f: F) -> Setter
where
    F: Fn(&mut dyn Reflect, Box<dyn Reflect>) -> Result<(), AccessorError> + Send + Sync + 'static,
{
    Box::new(f)
}

fn fallible_setter<T, V, S>(set: S) -> Setter
where
    T: Reflect,
    V: Reflect,
    S: Fn(&mut T, V) -> Result<(), String> + Send + Sync + 'static,
{
    setter(move |obj, value| {
        let value = take_value::<V>(value)?;
        set(receiver_mut::<T>(obj)?, value).map_err(AccessorError::Failed)
    })
}

fn receiver<T: Reflect>(obj: &dyn Reflect) -> Result<&T, AccessorError> {
    obj.downcast_ref::<T>().ok_or_else(|| AccessorError::Receiver {
        expected: type_name::<T>(),
        found: obj.reflect_type_info().type_path(),
    })
}

fn receiver_mut<T: Reflect>(obj: &mut dyn Reflect) -> Result<&mut T, AccessorError> {
    let found = obj.reflect_type_info().type_path();
    obj.downcast_mut::<T>().ok_or(AccessorError::Receiver {
        expected: type_name::<T>(),
        found,
    })
}

fn take_value<V: Reflect>(value: Box<dyn Reflect>) -> Result<V, AccessorError> {
    value.take::<V>().map_err(|value| AccessorError::Value {
        expected: type_name::<V>(),
        found: value.reflect_type_info().type_path(),
    })
}
