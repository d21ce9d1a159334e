use core::fmt;

use bitflags::bitflags;

use crate::Reflect;
use crate::info::TypeDescriptor;
use crate::introspect::AccessorError;

pub(crate) type Getter = Box<
    dyn for<'a> Fn(&'a dyn Reflect) -> Result<Option<&'a dyn Reflect>, AccessorError> + Send + Sync,
>;

pub(crate) type GetterMut = Box<
    dyn for<'a> Fn(&'a mut dyn Reflect) -> Result<Option<&'a mut dyn Reflect>, AccessorError>
        + Send
        + Sync,
>;

pub(crate) type Setter =
    Box<dyn Fn(&mut dyn Reflect, Box<dyn Reflect>) -> Result<(), AccessorError> + Send + Sync>;

bitflags! {
    /// Capabilities of a property.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u8 {
        /// The value can be read.
        const READABLE  = 1 << 0;
        /// The value can be replaced.
        const WRITABLE  = 1 << 1;
        /// The value can be borrowed mutably, so nested paths can write
        /// through it.
        const NAVIGABLE = 1 << 2;
        /// The value may be absent.
        const NULLABLE  = 1 << 3;
    }
}

// -----------------------------------------------------------------------------
// AccessorDescriptor

/// One named property of a bean.
///
/// Created by [`BeanBuilder`](crate::introspect::BeanBuilder) and immutable
/// afterwards. The accessors are type-erased: they check the receiver type
/// at runtime and report a mismatch as [`AccessorError::Receiver`].
pub struct AccessorDescriptor {
    name: &'static str,
    declared: TypeDescriptor,
    flags: AccessFlags,
    getter: Option<Getter>,
    getter_mut: Option<GetterMut>,
    setter: Option<Setter>,
}

impl AccessorDescriptor {
    pub(crate) fn new(
        name: &'static str,
        declared: TypeDescriptor,
        getter: Option<Getter>,
        getter_mut: Option<GetterMut>,
        setter: Option<Setter>,
        nullable: bool,
    ) -> Self {
        let mut flags = AccessFlags::empty();
        flags.set(AccessFlags::READABLE, getter.is_some());
        flags.set(AccessFlags::NAVIGABLE, getter_mut.is_some());
        flags.set(AccessFlags::WRITABLE, setter.is_some());
        flags.set(AccessFlags::NULLABLE, nullable);
        Self {
            name,
            declared,
            flags,
            getter,
            getter_mut,
            setter,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declared value type. For optional properties, the type inside
    /// the `Option`.
    #[inline]
    pub fn declared_type(&self) -> TypeDescriptor {
        self.declared
    }

    /// The element type when the declared type is a list or set.
    #[inline]
    pub fn element_type(&self) -> Option<TypeDescriptor> {
        self.declared.element()
    }

    /// The key type when the declared type is a map.
    #[inline]
    pub fn key_type(&self) -> Option<TypeDescriptor> {
        self.declared.key()
    }

    /// The value type when the declared type is a map.
    #[inline]
    pub fn value_type(&self) -> Option<TypeDescriptor> {
        self.declared.value()
    }

    #[inline]
    pub fn flags(&self) -> AccessFlags {
        self.flags
    }

    #[inline]
    pub fn is_readable(&self) -> bool {
        self.flags.contains(AccessFlags::READABLE)
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.flags.contains(AccessFlags::WRITABLE)
    }

    #[inline]
    pub fn is_navigable(&self) -> bool {
        self.flags.contains(AccessFlags::NAVIGABLE)
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.flags.contains(AccessFlags::NULLABLE)
    }

    /// Reads the property of `target`. `Ok(None)` means the value is absent.
    pub fn get<'a>(&self, target: &'a dyn Reflect) -> Result<Option<&'a dyn Reflect>, AccessorError> {
        match &self.getter {
            Some(getter) => getter(target),
            None => Err(AccessorError::NotReadable),
        }
    }

    /// Borrows the property of `target` mutably.
    pub fn get_mut<'a>(
        &self,
        target: &'a mut dyn Reflect,
    ) -> Result<Option<&'a mut dyn Reflect>, AccessorError> {
        match &self.getter_mut {
            Some(getter) => getter(target),
            None => Err(AccessorError::NotReadable),
        }
    }

    /// Replaces the property of `target`.
    ///
    /// `value` must already be of the declared type.
    pub fn set(&self, target: &mut dyn Reflect, value: Box<dyn Reflect>) -> Result<(), AccessorError> {
        match &self.setter {
            Some(setter) => setter(target, value),
            None => Err(AccessorError::NotWritable),
        }
    }
}

impl fmt::Debug for AccessorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorDescriptor")
            .field("name", &self.name)
            .field("declared", &self.declared)
            .field("flags", &self.flags)
            .finish()
    }
}
