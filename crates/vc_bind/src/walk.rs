//! Traversal of a live object graph along a [`PropertyPath`].
//!
//! Reads borrow the graph immutably. Writes borrow it mutably down to the
//! owner of the terminal step, growing absent values on the way when
//! auto-grow is enabled.

use core::any::TypeId;
use core::{ptr, slice};
use std::sync::Arc;

use log::{debug, trace};
use vc_bean::Reflect;
use vc_bean::info::{DynamicTyped, TypeDescriptor, TypeKind};
use vc_bean::introspect::{AccessFlags, AccessorDescriptor, AccessorError};
use vc_bean::introspect::{IntrospectionCache, IntrospectionError, IntrospectionRecord};
use vc_bean::ops::{ReflectMut, ReflectRef};
use vc_bean::path::{PropertyPath, Segment};
use vc_convert::ConversionError;
use vc_convert::context::ConversionRequest;
use vc_convert::pipeline::TypeConverter;
use vc_convert::registry::EditorRegistry;
use vc_utils::hash::HashMap;

use crate::{BindConfig, BindError};

// -----------------------------------------------------------------------------
// Arena

/// Address and type of a live value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ValueIdentity {
    addr: usize,
    ty: TypeId,
}

impl ValueIdentity {
    fn of(value: &dyn Reflect) -> Self {
        Self {
            addr: ptr::from_ref(value).cast::<()>().addr(),
            ty: value.ty_id(),
        }
    }
}

/// The record used for the value at one nested path.
#[derive(Debug)]
struct NestedRecord {
    identity: ValueIdentity,
    record: Arc<IntrospectionRecord>,
}

// -----------------------------------------------------------------------------
// Walker

/// Everything a traversal needs besides the root.
pub(crate) struct Walker<'c> {
    pub(crate) config: BindConfig,
    pub(crate) registry: EditorRegistry,
    cache: &'c IntrospectionCache,
    arena: HashMap<String, NestedRecord>,
    rebuilds: usize,
}

impl<'c> Walker<'c> {
    pub(crate) fn new(config: BindConfig, registry: EditorRegistry, cache: &'c IntrospectionCache) -> Self {
        Self {
            config,
            registry,
            cache,
            arena: HashMap::default(),
            rebuilds: 0,
        }
    }

    #[inline]
    pub(crate) fn set_cache(&mut self, cache: &'c IntrospectionCache) {
        self.cache = cache;
        self.arena.clear();
    }

    pub(crate) fn nested_paths(&self) -> impl Iterator<Item = &str> {
        self.arena.keys().map(String::as_str)
    }

    #[inline]
    pub(crate) fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    /// The record of `owner`, the value at `prefix`.
    ///
    /// The arena entry is reused while the value at `prefix` keeps its
    /// identity.
    fn record_at(
        &mut self,
        prefix: &str,
        owner: &dyn Reflect,
        property: &str,
        path: &str,
    ) -> Result<Arc<IntrospectionRecord>, BindError> {
        let identity = ValueIdentity::of(owner);
        if let Some(nested) = self.arena.get(prefix)
            && nested.identity == identity
        {
            return Ok(Arc::clone(&nested.record));
        }

        let record = match self.cache.for_type_in(owner.reflect_type(), self.config.scope) {
            Ok(record) => record,
            Err(IntrospectionError::NotABean(type_path)) => {
                return Err(BindError::UnknownProperty {
                    path: path.to_owned(),
                    property: property.to_owned(),
                    type_path,
                });
            }
            Err(err) => return Err(err.into()),
        };

        let nested = NestedRecord {
            identity,
            record: Arc::clone(&record),
        };
        if self.arena.insert(prefix.to_owned(), nested).is_some() {
            self.rebuilds += 1;
            trace!("rebuilt nested record of `{prefix}` for a new `{}`", record.ty().type_path());
        }
        Ok(record)
    }

    fn convert(
        &self,
        value: Box<dyn Reflect>,
        target: TypeDescriptor,
        path: &str,
        old_value: Option<&dyn Reflect>,
    ) -> Result<Box<dyn Reflect>, BindError> {
        let request = ConversionRequest::new(value, target)
            .with_path(Some(path))
            .with_old_value(old_value);
        TypeConverter::new(&self.registry)
            .convert(request)
            .map_err(|err| BindError::conversion(path, err))
    }

    /// Converts a key text to the key type of a map. The property path is
    /// not used for converter lookup.
    fn map_key(&self, key: &str, key_type: TypeDescriptor, path: &str) -> Result<Box<dyn Reflect>, BindError> {
        TypeConverter::new(&self.registry)
            .convert(ConversionRequest::new(Box::new(key.to_owned()), key_type))
            .map_err(|err| BindError::conversion(path, err))
    }

    // -------------------------------------------------------------------------
    // Reading

    /// Resolves the first `depth` segments of `path`.
    ///
    /// `Ok(None)` means the terminal value is absent. An absent value
    /// before the terminal step is [`BindError::NullIntermediate`].
    pub(crate) fn read<'v>(
        &mut self,
        root: &'v dyn Reflect,
        path: &PropertyPath,
        depth: usize,
    ) -> Result<Option<&'v dyn Reflect>, BindError> {
        self.read_from(root, String::new(), &path.segments()[..depth])
    }

    /// Resolves `segments` below `owner`, the value at `prefix`.
    fn read_from<'v>(
        &mut self,
        owner: &'v dyn Reflect,
        mut prefix: String,
        segments: &[Segment],
    ) -> Result<Option<&'v dyn Reflect>, BindError> {
        let mut current = owner;
        for (i, segment) in segments.iter().enumerate() {
            let last = i + 1 == segments.len();
            let name_path = sub_path(&prefix, segment, 0);
            let record = self.record_at(&prefix, current, segment.name(), &name_path)?;
            let accessor = lookup(&record, segment.name(), &name_path)?;
            if !accessor.is_readable() {
                return Err(BindError::NotReadable { path: name_path });
            }

            let mut value = match accessor.get(current).map_err(|err| accessor_error(err, &name_path))? {
                Some(value) => value,
                None if last && !segment.is_indexed() => return Ok(None),
                None => return Err(BindError::NullIntermediate { path: name_path }),
            };

            let keys = segment.keys();
            for (k, key) in keys.iter().enumerate() {
                let owner_path = sub_path(&prefix, segment, k);
                value = match self.read_key(value, key, &owner_path)? {
                    Some(value) => value,
                    None if last && k + 1 == keys.len() => return Ok(None),
                    None => {
                        return Err(BindError::NullIntermediate {
                            path: sub_path(&prefix, segment, k + 1),
                        });
                    }
                };
            }

            current = value;
            prefix = sub_path(&prefix, segment, keys.len());
        }
        Ok(Some(current))
    }

    /// Resolves `path` like [`read`](Self::read), growing absent
    /// intermediate values the way a write does. The terminal value itself
    /// is never created.
    pub(crate) fn read_growing<'v>(
        &mut self,
        root: &'v mut dyn Reflect,
        path: &PropertyPath,
    ) -> Result<Option<&'v dyn Reflect>, BindError> {
        let Some((terminal, parents)) = path.segments().split_last() else {
            return Err(empty_path(&*root));
        };

        let mut current = root;
        let mut prefix = String::new();
        for segment in parents {
            current = self.descend(current, &prefix, segment)?;
            prefix = sub_path(&prefix, segment, segment.keys().len());
        }

        let Some((last_key, keys)) = terminal.keys().split_last() else {
            return self.read_from(current, prefix, slice::from_ref(terminal));
        };

        let name_path = sub_path(&prefix, terminal, 0);
        let record = self.record_at(&prefix, &*current, terminal.name(), &name_path)?;
        let accessor = lookup(&record, terminal.name(), &name_path)?;
        if !accessor.is_readable() {
            return Err(BindError::NotReadable { path: name_path });
        }

        let mut value = self.property_mut(current, accessor, &name_path)?;
        for (k, key) in keys.iter().enumerate() {
            let owner_path = sub_path(&prefix, terminal, k);
            let key_path = sub_path(&prefix, terminal, k + 1);
            value = self.key_mut(value, key, &owner_path, &key_path)?;
        }
        self.read_key(value, last_key, &sub_path(&prefix, terminal, keys.len()))
    }

    fn read_key<'v>(
        &self,
        value: &'v dyn Reflect,
        key: &str,
        path: &str,
    ) -> Result<Option<&'v dyn Reflect>, BindError> {
        let found = value.reflect_type_info().type_path();
        match value.reflect_ref() {
            ReflectRef::List(list) => {
                let index = parse_index(key, found, path)?;
                match list.get(index) {
                    Some(item) => Ok(Some(item)),
                    None => Err(out_of_range(path, index, list.len())),
                }
            }
            ReflectRef::Set(set) => {
                let index = parse_index(key, found, path)?;
                match set.iter().nth(index) {
                    Some(item) => Ok(Some(item)),
                    None => Err(out_of_range(path, index, set.len())),
                }
            }
            ReflectRef::Map(map) => {
                let key = self.map_key(key, map.key_type(), path)?;
                Ok(map.get(&*key))
            }
            ReflectRef::Value(_) => Err(invalid_kind(key, found, path)),
        }
    }

    // -------------------------------------------------------------------------
    // Writing

    /// Converts `value` and stores it at `path`.
    pub(crate) fn write(
        &mut self,
        root: &mut dyn Reflect,
        path: &PropertyPath,
        value: Box<dyn Reflect>,
    ) -> Result<(), BindError> {
        let Some((terminal, parents)) = path.segments().split_last() else {
            return Err(empty_path(&*root));
        };

        let mut current = root;
        let mut prefix = String::new();
        for segment in parents {
            current = self.descend(current, &prefix, segment)?;
            prefix = sub_path(&prefix, segment, segment.keys().len());
        }
        self.assign(current, &prefix, terminal, value)
    }

    /// Borrows the value of `segment` below `owner` mutably.
    fn descend<'v>(
        &mut self,
        owner: &'v mut dyn Reflect,
        prefix: &str,
        segment: &Segment,
    ) -> Result<&'v mut dyn Reflect, BindError> {
        let name_path = sub_path(prefix, segment, 0);
        let record = self.record_at(prefix, &*owner, segment.name(), &name_path)?;
        let accessor = lookup(&record, segment.name(), &name_path)?;

        let mut value = self.property_mut(owner, accessor, &name_path)?;
        for (k, key) in segment.keys().iter().enumerate() {
            let owner_path = sub_path(prefix, segment, k);
            let key_path = sub_path(prefix, segment, k + 1);
            value = self.key_mut(value, key, &owner_path, &key_path)?;
        }
        Ok(value)
    }

    fn property_mut<'v>(
        &self,
        owner: &'v mut dyn Reflect,
        accessor: &AccessorDescriptor,
        path: &str,
    ) -> Result<&'v mut dyn Reflect, BindError> {
        if !accessor.is_navigable() {
            return Err(BindError::NotWritable { path: path.to_owned() });
        }

        let present = accessor
            .get_mut(&mut *owner)
            .map_err(|err| accessor_error(err, path))?
            .is_some();
        if !present {
            if !self.config.auto_grow_nested_paths {
                return Err(BindError::NullIntermediate { path: path.to_owned() });
            }
            let grown = new_instance(accessor.declared_type(), path)?;
            debug!("auto-grew `{path}` with a default `{}`", accessor.declared_type().type_path());
            accessor
                .set(&mut *owner, grown)
                .map_err(|err| accessor_error(err, path))?;
        }

        accessor
            .get_mut(owner)
            .map_err(|err| accessor_error(err, path))?
            .ok_or_else(|| BindError::NullIntermediate { path: path.to_owned() })
    }

    /// Applies one key to `value` for a nested write.
    fn key_mut<'v>(
        &self,
        value: &'v mut dyn Reflect,
        key: &str,
        owner_path: &str,
        key_path: &str,
    ) -> Result<&'v mut dyn Reflect, BindError> {
        let found = value.reflect_type_info().type_path();
        match Shape::of(&*value) {
            Shape::List { len, .. } => {
                let index = parse_index(key, found, owner_path)?;
                if index >= len {
                    if !self.config.can_grow_to(index) {
                        return Err(out_of_range(owner_path, index, len));
                    }
                    pad_list(&mut *value, index + 1, owner_path)?;
                }
                match value.reflect_mut() {
                    ReflectMut::List(list) => list
                        .get_mut(index)
                        .ok_or_else(|| out_of_range(owner_path, index, len)),
                    _ => Err(invalid_kind(key, found, owner_path)),
                }
            }
            Shape::Map { key_type, value_type } => {
                let map_key = self.map_key(key, key_type, owner_path)?;
                let present = matches!(value.reflect_ref(), ReflectRef::Map(map) if map.get(&*map_key).is_some());
                if !present {
                    if !self.config.auto_grow_nested_paths {
                        return Err(BindError::NullIntermediate {
                            path: key_path.to_owned(),
                        });
                    }
                    let grown = new_instance(value_type, key_path)?;
                    debug!("auto-grew `{key_path}` with a default `{}`", value_type.type_path());
                    if let ReflectMut::Map(map) = value.reflect_mut() {
                        map.insert(map_key.reflect_clone(), grown)
                            .map_err(|err| mismatch(key_path, err.expected, err.found))?;
                    }
                }
                match value.reflect_mut() {
                    ReflectMut::Map(map) => map.get_mut(&*map_key).ok_or_else(|| BindError::NullIntermediate {
                        path: key_path.to_owned(),
                    }),
                    _ => Err(invalid_kind(key, found, owner_path)),
                }
            }
            Shape::Set | Shape::Value => Err(invalid_kind(key, found, owner_path)),
        }
    }

    /// Writes the terminal segment of a path on `owner`.
    fn assign(
        &mut self,
        owner: &mut dyn Reflect,
        prefix: &str,
        terminal: &Segment,
        value: Box<dyn Reflect>,
    ) -> Result<(), BindError> {
        let name_path = sub_path(prefix, terminal, 0);
        let record = self.record_at(prefix, &*owner, terminal.name(), &name_path)?;
        let accessor = lookup(&record, terminal.name(), &name_path)?;

        let Some((last_key, keys)) = terminal.keys().split_last() else {
            return self.assign_property(owner, accessor, &name_path, value);
        };

        let mut target = self.property_mut(owner, accessor, &name_path)?;
        for (k, key) in keys.iter().enumerate() {
            let owner_path = sub_path(prefix, terminal, k);
            let key_path = sub_path(prefix, terminal, k + 1);
            target = self.key_mut(target, key, &owner_path, &key_path)?;
        }
        let owner_path = sub_path(prefix, terminal, keys.len());
        let key_path = sub_path(prefix, terminal, keys.len() + 1);
        self.assign_key(target, last_key, &owner_path, &key_path, value)
    }

    fn assign_property(
        &self,
        owner: &mut dyn Reflect,
        accessor: &AccessorDescriptor,
        path: &str,
        value: Box<dyn Reflect>,
    ) -> Result<(), BindError> {
        if !accessor.is_writable() {
            return Err(BindError::NotWritable { path: path.to_owned() });
        }

        let converted = {
            let old_value = if self.config.extract_old_value_before_convert {
                match accessor.get(&*owner) {
                    Ok(old_value) => old_value,
                    Err(err) => {
                        trace!("no old value for `{path}`: {err}");
                        None
                    }
                }
            } else {
                None
            };
            self.convert(value, accessor.declared_type(), path, old_value)?
        };
        trace!("setting `{path}` to {converted:?}");
        accessor.set(owner, converted).map_err(|err| accessor_error(err, path))
    }

    /// Writes `value` under the last key of a path.
    fn assign_key(
        &self,
        container: &mut dyn Reflect,
        key: &str,
        owner_path: &str,
        key_path: &str,
        value: Box<dyn Reflect>,
    ) -> Result<(), BindError> {
        let found = container.reflect_type_info().type_path();
        let extract = self.config.extract_old_value_before_convert;

        match Shape::of(&*container) {
            Shape::List { len, element } => {
                let index = parse_index(key, found, owner_path)?;
                if index >= len && !self.config.can_grow_to(index) {
                    return Err(out_of_range(owner_path, index, len));
                }

                let converted = {
                    let old_value = match container.reflect_ref() {
                        ReflectRef::List(list) if extract => list.get(index),
                        _ => None,
                    };
                    self.convert(value, element, key_path, old_value)?
                };

                if index >= len {
                    pad_list(&mut *container, index, owner_path)?;
                }
                let ReflectMut::List(list) = container.reflect_mut() else {
                    return Err(invalid_kind(key, found, owner_path));
                };
                if index < list.len() {
                    let slot = list
                        .get_mut(index)
                        .ok_or_else(|| out_of_range(owner_path, index, len))?;
                    let expected = slot.reflect_type_info().type_path();
                    slot.set(converted)
                        .map_err(|value| mismatch(key_path, expected, value.reflect_type_info().type_path()))
                } else {
                    list.push(converted)
                        .map_err(|err| mismatch(key_path, err.expected, err.found))
                }
            }
            Shape::Map { key_type, value_type } => {
                let map_key = self.map_key(key, key_type, owner_path)?;
                let converted = {
                    let old_value = match container.reflect_ref() {
                        ReflectRef::Map(map) if extract => map.get(&*map_key),
                        _ => None,
                    };
                    self.convert(value, value_type, key_path, old_value)?
                };
                let ReflectMut::Map(map) = container.reflect_mut() else {
                    return Err(invalid_kind(key, found, owner_path));
                };
                map.insert(map_key, converted)
                    .map_err(|err| mismatch(key_path, err.expected, err.found))
            }
            Shape::Set | Shape::Value => Err(invalid_kind(key, found, owner_path)),
        }
    }

    // -------------------------------------------------------------------------
    // Static inspection

    fn record_of(&self, ty: TypeDescriptor) -> Option<Arc<IntrospectionRecord>> {
        self.cache.for_type_in(ty, self.config.scope).ok()
    }

    /// Follows `path` through declared types only.
    fn shape_of(&self, root: TypeDescriptor, path: &PropertyPath) -> Option<PathShape> {
        let (terminal, parents) = path.segments().split_last()?;
        let mut ty = root;
        let mut readable = true;
        let mut navigable = true;

        for segment in parents {
            let record = self.record_of(ty)?;
            let accessor = record.get(segment.name())?;
            readable &= accessor.is_readable();
            navigable &= accessor.is_navigable();
            ty = keyed_type(accessor.declared_type(), segment.keys().len())?;
        }

        let record = self.record_of(ty)?;
        let accessor = record.get(terminal.name())?;
        let keys = terminal.keys().len();
        let container = keys
            .checked_sub(1)
            .and_then(|depth| keyed_type(accessor.declared_type(), depth));
        Some(PathShape {
            declared: keyed_type(accessor.declared_type(), keys)?,
            flags: accessor.flags(),
            keyed_into_set: container.is_some_and(|ty| ty.kind() == TypeKind::Set),
            indexed: keys > 0,
            readable,
            navigable,
        })
    }

    pub(crate) fn declared_type(&self, root: TypeDescriptor, path: &PropertyPath) -> Option<TypeDescriptor> {
        self.shape_of(root, path).map(|shape| shape.declared)
    }

    pub(crate) fn is_readable(&mut self, root: &dyn Reflect, path: &PropertyPath) -> bool {
        let Some(shape) = self.shape_of(root.reflect_type(), path) else {
            return false;
        };
        if !shape.readable || !shape.flags.contains(AccessFlags::READABLE) {
            return false;
        }
        match self.read(root, path, path.len()) {
            Ok(_) => true,
            Err(err) if err.is_growable() && self.config.auto_grow_nested_paths => {
                // Grow a copy so the answer matches what a read would do.
                let mut scratch = root.reflect_clone();
                let mut walker = Walker::new(self.config.clone(), self.registry.clone(), self.cache);
                walker.read_growing(&mut *scratch, path).is_ok()
            }
            Err(_) => false,
        }
    }

    pub(crate) fn is_writable(&mut self, root: &dyn Reflect, path: &PropertyPath) -> bool {
        let Some(shape) = self.shape_of(root.reflect_type(), path) else {
            return false;
        };
        let terminal = if shape.indexed {
            shape.flags.contains(AccessFlags::NAVIGABLE) && !shape.keyed_into_set
        } else {
            shape.flags.contains(AccessFlags::WRITABLE)
        };
        if !shape.navigable || !terminal {
            return false;
        }
        match self.read(root, path, path.len() - 1) {
            Ok(Some(_)) => true,
            Ok(None) | Err(BindError::NullIntermediate { .. }) => self.config.auto_grow_nested_paths,
            Err(_) => false,
        }
    }
}

/// What the declared types say about a path.
struct PathShape {
    declared: TypeDescriptor,
    flags: AccessFlags,
    keyed_into_set: bool,
    indexed: bool,
    /// Every intermediate property is readable.
    readable: bool,
    /// Every intermediate property can be borrowed mutably.
    navigable: bool,
}

/// The container shape of a live value.
enum Shape {
    List { len: usize, element: TypeDescriptor },
    Set,
    Map { key_type: TypeDescriptor, value_type: TypeDescriptor },
    Value,
}

impl Shape {
    fn of(value: &dyn Reflect) -> Self {
        match value.reflect_ref() {
            ReflectRef::List(list) => Self::List {
                len: list.len(),
                element: list.element_type(),
            },
            ReflectRef::Set(_) => Self::Set,
            ReflectRef::Map(map) => Self::Map {
                key_type: map.key_type(),
                value_type: map.value_type(),
            },
            ReflectRef::Value(_) => Self::Value,
        }
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// The canonical path of `segment` with its first `keys` keys.
fn sub_path(prefix: &str, segment: &Segment, keys: usize) -> String {
    let segment = Segment::with_keys(segment.name(), segment.keys()[..keys].iter().cloned());
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

fn lookup<'r>(record: &'r IntrospectionRecord, name: &str, path: &str) -> Result<&'r AccessorDescriptor, BindError> {
    record.get(name).ok_or_else(|| BindError::UnknownProperty {
        path: path.to_owned(),
        property: name.to_owned(),
        type_path: record.ty().type_path(),
    })
}

/// The type reached from `ty` by applying `keys` keys.
fn keyed_type(mut ty: TypeDescriptor, keys: usize) -> Option<TypeDescriptor> {
    for _ in 0..keys {
        ty = match ty.kind() {
            TypeKind::List | TypeKind::Set => ty.element()?,
            TypeKind::Map => ty.value()?,
            _ => return None,
        };
    }
    Some(ty)
}

/// Grows a list to `len` with default elements.
fn pad_list(value: &mut dyn Reflect, len: usize, path: &str) -> Result<(), BindError> {
    let ReflectMut::List(list) = value.reflect_mut() else {
        return Ok(());
    };
    let element = list.element_type();
    if list.len() < len {
        debug!("auto-growing `{path}` from {} to {len} elements", list.len());
    }
    while list.len() < len {
        let item = new_instance(element, path)?;
        list.push(item)
            .map_err(|err| mismatch(path, err.expected, err.found))?;
    }
    Ok(())
}

fn new_instance(ty: TypeDescriptor, path: &str) -> Result<Box<dyn Reflect>, BindError> {
    ty.info().default_value().ok_or_else(|| {
        let err = ConversionError::from_types("()", ty.type_path())
            .with_path(Some(path))
            .with_reason("the type has no default value to grow the path with");
        BindError::conversion(path, err)
    })
}

fn parse_index(key: &str, found: &'static str, path: &str) -> Result<usize, BindError> {
    key.trim()
        .parse()
        .map_err(|_| invalid_kind(key, found, path))
}

fn out_of_range(path: &str, index: usize, len: usize) -> BindError {
    BindError::IndexOutOfRange {
        path: path.to_owned(),
        index,
        len,
    }
}

fn invalid_kind(key: &str, found: &'static str, path: &str) -> BindError {
    BindError::InvalidPropertyKind {
        path: path.to_owned(),
        key: key.to_owned(),
        found,
    }
}

fn mismatch(path: &str, expected: &'static str, found: &'static str) -> BindError {
    BindError::conversion(path, ConversionError::from_types(found, expected).with_path(Some(path)))
}

pub(crate) fn empty_path(root: &dyn Reflect) -> BindError {
    BindError::UnknownProperty {
        path: String::new(),
        property: String::new(),
        type_path: root.reflect_type_info().type_path(),
    }
}

fn accessor_error(err: AccessorError, path: &str) -> BindError {
    let path = path.to_owned();
    match err {
        AccessorError::NotReadable => BindError::NotReadable { path },
        AccessorError::NotWritable => BindError::NotWritable { path },
        AccessorError::Value { expected, found } => mismatch(&path, expected, found),
        AccessorError::Failed(message) => BindError::Invocation { path, message },
        other => BindError::Invocation {
            message: other.to_string(),
            path,
        },
    }
}
