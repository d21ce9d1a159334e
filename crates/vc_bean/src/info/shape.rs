use core::fmt;

use crate::Reflect;
use crate::info::TypeDescriptor;
use crate::introspect::{Bean, IntrospectionError, IntrospectionRecord};

// -----------------------------------------------------------------------------
// TypeKind

/// The coarse kind of a reflected type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `bool`, `char`, numbers and `String`.
    Scalar,
    /// An opaque value without properties.
    Value,
    /// A struct with named properties.
    Bean,
    /// A field-less enum.
    Enum,
    List,
    Set,
    Map,
}

impl TypeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            TypeKind::Scalar => "scalar",
            TypeKind::Value => "value",
            TypeKind::Bean => "bean",
            TypeKind::Enum => "enum",
            TypeKind::List => "list",
            TypeKind::Set => "set",
            TypeKind::Map => "map",
        }
    }

    /// Whether values of this kind hold other values.
    #[inline]
    pub const fn is_container(self) -> bool {
        matches!(self, TypeKind::List | TypeKind::Set | TypeKind::Map)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -----------------------------------------------------------------------------
// TypeShape

/// Kind-specific type information.
#[derive(Debug)]
pub enum TypeShape {
    Scalar,
    Value,
    Bean(BeanInfo),
    Enum(EnumInfo),
    List(ListInfo),
    Set(SetInfo),
    Map(MapInfo),
}

impl TypeShape {
    pub const fn kind(&self) -> TypeKind {
        match self {
            TypeShape::Scalar => TypeKind::Scalar,
            TypeShape::Value => TypeKind::Value,
            TypeShape::Bean(_) => TypeKind::Bean,
            TypeShape::Enum(_) => TypeKind::Enum,
            TypeShape::List(_) => TypeKind::List,
            TypeShape::Set(_) => TypeKind::Set,
            TypeShape::Map(_) => TypeKind::Map,
        }
    }
}

// -----------------------------------------------------------------------------
// BeanInfo

/// Entry point to a bean's accessor table.
pub struct BeanInfo {
    describe: fn() -> Result<IntrospectionRecord, IntrospectionError>,
}

impl BeanInfo {
    pub fn of<T: Bean>() -> Self {
        Self {
            describe: IntrospectionRecord::build::<T>,
        }
    }

    /// Runs the bean's [`describe`](Bean::describe) and validates the result.
    ///
    /// This does not consult any cache; see
    /// [`IntrospectionCache`](crate::introspect::IntrospectionCache).
    #[inline]
    pub fn build(&self) -> Result<IntrospectionRecord, IntrospectionError> {
        (self.describe)()
    }
}

impl fmt::Debug for BeanInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanInfo").finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// EnumInfo

/// The constants of a field-less enum.
pub struct EnumInfo {
    constants: &'static [&'static str],
    from_name: fn(&str) -> Option<Box<dyn Reflect>>,
}

impl EnumInfo {
    /// `from_name` must return the constant named exactly as in `constants`.
    pub const fn new(
        constants: &'static [&'static str],
        from_name: fn(&str) -> Option<Box<dyn Reflect>>,
    ) -> Self {
        Self {
            constants,
            from_name,
        }
    }

    #[inline]
    pub fn constants(&self) -> &'static [&'static str] {
        self.constants
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.constants.contains(&name)
    }

    /// Creates the constant with the given name.
    #[inline]
    pub fn constant(&self, name: &str) -> Option<Box<dyn Reflect>> {
        (self.from_name)(name)
    }
}

impl fmt::Debug for EnumInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumInfo")
            .field("constants", &self.constants)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Containers

#[derive(Debug, Clone, Copy)]
pub struct ListInfo {
    element: TypeDescriptor,
}

impl ListInfo {
    #[inline]
    pub fn new(element: TypeDescriptor) -> Self {
        Self { element }
    }

    #[inline]
    pub fn element(&self) -> TypeDescriptor {
        self.element
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SetInfo {
    element: TypeDescriptor,
}

impl SetInfo {
    #[inline]
    pub fn new(element: TypeDescriptor) -> Self {
        Self { element }
    }

    #[inline]
    pub fn element(&self) -> TypeDescriptor {
        self.element
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MapInfo {
    key: TypeDescriptor,
    value: TypeDescriptor,
}

impl MapInfo {
    #[inline]
    pub fn new(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self { key, value }
    }

    #[inline]
    pub fn key(&self) -> TypeDescriptor {
        self.key
    }

    #[inline]
    pub fn value(&self) -> TypeDescriptor {
        self.value
    }
}
