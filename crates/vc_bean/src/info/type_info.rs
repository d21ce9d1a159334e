use core::any::{Any, TypeId, type_name};
use core::fmt;
use core::str::FromStr;
use std::collections::VecDeque;

use crate::Reflect;
use crate::info::{BeanInfo, EnumInfo, ListInfo, MapInfo, SetInfo};
use crate::info::{TypeDescriptor, TypeKind, TypeShape, Typed};
use crate::introspect::Bean;

/// Creates a default instance of a type.
pub type DefaultFn = fn() -> Box<dyn Reflect>;

/// Creates an instance of a type from a single string.
pub type FromStrFn = fn(&str) -> Result<Box<dyn Reflect>, String>;

// -----------------------------------------------------------------------------
// TypeInfo

/// Static information about a reflected type.
///
/// Built once per type and leaked into a `'static` cell, see [`Typed`].
///
/// Besides the [`TypeShape`], it carries the hooks the conversion pipeline
/// relies on:
///
/// - a default constructor, used for auto-growing and to instantiate
///   target containers;
/// - a single-string constructor, used for `String` to type coercion;
/// - declared supertypes, used when matching converters by type.
pub struct TypeInfo {
    type_id: TypeId,
    type_path: &'static str,
    type_name: String,
    shape: TypeShape,
    default_fn: Option<DefaultFn>,
    from_str_fn: Option<FromStrFn>,
    supertypes: Vec<TypeDescriptor>,
}

impl TypeInfo {
    fn new<T: Any>(shape: TypeShape) -> Self {
        let type_path = type_name::<T>();
        Self {
            type_id: TypeId::of::<T>(),
            type_path,
            type_name: short_type_name(type_path),
            shape,
            default_fn: None,
            from_str_fn: None,
            supertypes: Vec::new(),
        }
    }

    /// Info for `bool`, `char`, numbers and `String`.
    pub fn scalar<T: Any>() -> Self {
        Self::new::<T>(TypeShape::Scalar)
    }

    /// Info for an opaque value.
    pub fn value<T: Any>() -> Self {
        Self::new::<T>(TypeShape::Value)
    }

    pub fn bean<T: Bean>() -> Self {
        Self::new::<T>(TypeShape::Bean(BeanInfo::of::<T>()))
    }

    pub fn enumeration<T: Any>(info: EnumInfo) -> Self {
        Self::new::<T>(TypeShape::Enum(info))
    }

    pub fn list<T: Any, E: Typed>() -> Self {
        Self::new::<T>(TypeShape::List(ListInfo::new(TypeDescriptor::of::<E>())))
    }

    pub fn set<T: Any, E: Typed>() -> Self {
        Self::new::<T>(TypeShape::Set(SetInfo::new(TypeDescriptor::of::<E>())))
    }

    pub fn map<T: Any, K: Typed, V: Typed>() -> Self {
        Self::new::<T>(TypeShape::Map(MapInfo::new(
            TypeDescriptor::of::<K>(),
            TypeDescriptor::of::<V>(),
        )))
    }

    /// Registers `T::default` as the default constructor.
    pub fn with_default<T: Reflect + Default>(mut self) -> Self {
        debug_assert_eq!(self.type_id, TypeId::of::<T>());
        self.default_fn = Some(default_boxed::<T>);
        self
    }

    /// Registers `T::from_str` as the single-string constructor.
    pub fn with_from_str<T>(mut self) -> Self
    where
        T: Reflect + FromStr,
        T::Err: fmt::Display,
    {
        debug_assert_eq!(self.type_id, TypeId::of::<T>());
        self.from_str_fn = Some(from_str_boxed::<T>);
        self
    }

    /// Declares `S` as a supertype.
    ///
    /// Converters registered for `S` then also apply to this type.
    pub fn with_supertype<S: Typed>(mut self) -> Self {
        let ty = TypeDescriptor::of::<S>();
        if !self.supertypes.contains(&ty) {
            self.supertypes.push(ty);
        }
        self
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The full path, as given by [`core::any::type_name`].
    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// The path with every module prefix removed, e.g. `Vec<String>`.
    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[inline]
    pub fn shape(&self) -> &TypeShape {
        &self.shape
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.shape.kind()
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn as_bean(&self) -> Option<&BeanInfo> {
        match &self.shape {
            TypeShape::Bean(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumInfo> {
        match &self.shape {
            TypeShape::Enum(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListInfo> {
        match &self.shape {
            TypeShape::List(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&SetInfo> {
        match &self.shape {
            TypeShape::Set(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapInfo> {
        match &self.shape {
            TypeShape::Map(info) => Some(info),
            _ => None,
        }
    }

    #[inline]
    pub fn has_default(&self) -> bool {
        self.default_fn.is_some()
    }

    /// Creates a default instance, if the type has a default constructor.
    #[inline]
    pub fn default_value(&self) -> Option<Box<dyn Reflect>> {
        self.default_fn.map(|f| f())
    }

    #[inline]
    pub fn from_str_fn(&self) -> Option<FromStrFn> {
        self.from_str_fn
    }

    /// The directly declared supertypes.
    #[inline]
    pub fn supertypes(&self) -> &[TypeDescriptor] {
        &self.supertypes
    }

    /// Every transitive supertype, nearest first.
    pub fn ancestors(&self) -> Vec<TypeDescriptor> {
        let mut visited: Vec<TypeDescriptor> = Vec::new();
        let mut queue: VecDeque<TypeDescriptor> = self.supertypes.iter().copied().collect();
        while let Some(ty) = queue.pop_front() {
            if ty.type_id() == self.type_id || visited.contains(&ty) {
                continue;
            }
            visited.push(ty);
            queue.extend(ty.info().supertypes.iter().copied());
        }
        visited
    }

    /// Whether `ty` is a transitive supertype.
    pub fn has_supertype(&self, ty: TypeDescriptor) -> bool {
        self.supertypes.contains(&ty) || self.ancestors().contains(&ty)
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("type_path", &self.type_path)
            .field("shape", &self.shape)
            .field("has_default", &self.default_fn.is_some())
            .field("has_from_str", &self.from_str_fn.is_some())
            .field("supertypes", &self.supertypes)
            .finish()
    }
}

fn default_boxed<T: Reflect + Default>() -> Box<dyn Reflect> {
    Box::new(T::default())
}

fn from_str_boxed<T>(text: &str) -> Result<Box<dyn Reflect>, String>
where
    T: Reflect + FromStr,
    T::Err: fmt::Display,
{
    match text.parse::<T>() {
        Ok(value) => Ok(Box::new(value)),
        Err(err) => Err(err.to_string()),
    }
}

// -----------------------------------------------------------------------------
// Short names

/// Strips module prefixes from a type path.
///
/// ```
/// use vc_bean::info::short_type_name;
///
/// assert_eq!(short_type_name("alloc::vec::Vec<alloc::string::String>"), "Vec<String>");
/// assert_eq!(short_type_name("my_app::Color"), "Color");
/// ```
pub fn short_type_name(path: &str) -> String {
    let mut name = String::with_capacity(path.len());
    let mut segment_start = 0;
    let mut chars = path.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                name.truncate(segment_start);
            }
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | ';' => {
                name.push(c);
                segment_start = name.len();
            }
            _ => name.push(c),
        }
    }
    name
}

// -----------------------------------------------------------------------------
// Tests
