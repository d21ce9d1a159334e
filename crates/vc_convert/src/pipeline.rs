//! The conversion pipeline.
//!
//! [`TypeConverter::convert`] tries, highest precedence first:
//!
//! 1. the custom converter for the property path, or for the target type
//!    and its supertypes. When one exists it is the only strategy used;
//! 2. the [`ConversionService`](crate::ConversionService), when it claims
//!    the conversion. A failure is remembered and the next step runs;
//! 3. the default converter of the target type, unless the value already
//!    has that type;
//! 4. structural coercion: element-wise conversion of lists, sets and
//!    maps, strings through `FromStr` or to enum constants, and scalars to
//!    their textual form.
//!
//! A result that still has the wrong type is an error. A remembered
//! service failure is reported in its place, and also when the fallback
//! only handed the value back unchanged.

use log::{debug, trace, warn};
use vc_bean::Reflect;
use vc_bean::info::{DynamicTyped, TypeDescriptor, TypeKind, Typed};
use vc_bean::ops::{ReflectMut, ReflectRef};
use vc_bean::registry::TypeRegistry;

use crate::ConversionError;
use crate::context::{ConversionContext, ConversionRequest};
use crate::converter::ConverterHandle;
use crate::registry::EditorRegistry;

// -----------------------------------------------------------------------------
// Converted

/// The output of a fallback strategy.
struct Converted {
    value: Box<dyn Reflect>,
    /// `false` when the input was handed back as is.
    changed: bool,
    /// The default converter that produced `value`, if any.
    converter: Option<String>,
}

impl Converted {
    #[inline]
    fn changed(value: Box<dyn Reflect>) -> Self {
        Self {
            value,
            changed: true,
            converter: None,
        }
    }

    #[inline]
    fn unchanged(value: Box<dyn Reflect>) -> Self {
        Self {
            value,
            changed: false,
            converter: None,
        }
    }

    #[inline]
    fn by(mut self, converter: String) -> Self {
        self.converter = Some(converter);
        self
    }
}

// -----------------------------------------------------------------------------
// TypeConverter

/// Converts values using the converters of an [`EditorRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct TypeConverter<'r> {
    registry: &'r EditorRegistry,
}

impl<'r> TypeConverter<'r> {
    #[inline]
    pub fn new(registry: &'r EditorRegistry) -> Self {
        Self { registry }
    }

    #[inline]
    pub fn registry(&self) -> &'r EditorRegistry {
        self.registry
    }

    /// Converts `value` to `T`.
    pub fn convert_to<T: Reflect + Typed>(
        &self,
        value: Box<dyn Reflect>,
        path: Option<&str>,
    ) -> Result<T, ConversionError> {
        let target = TypeDescriptor::of::<T>();
        let converted = self.convert(ConversionRequest::new(value, target).with_path(path))?;
        converted
            .take::<T>()
            .map_err(|value| ConversionError::new(&*value, target).with_path(path))
    }

    /// Converts the request's value to its target type.
    ///
    /// The returned value always has exactly the target type.
    pub fn convert(&self, request: ConversionRequest<'_>) -> Result<Box<dyn Reflect>, ConversionError> {
        let (value, ctx) = request.into_parts();
        let target = ctx.target();
        let path = ctx.path();

        if let Some(handle) = self.registry.find_custom(Some(target), path) {
            trace!(
                "converting `{}` to `{}` with custom converter `{}`",
                value.reflect_type_info().type_path(),
                target.type_path(),
                handle.name()
            );
            return apply_exclusive(&handle, value, &ctx);
        }

        let mut service_failure = None;
        if let Some(service) = self.registry.conversion_service()
            && service.can_convert(value.reflect_type(), target)
        {
            match service.convert(&*value, target) {
                Ok(converted) if converted.ty_id() == target.type_id() => return Ok(converted),
                Ok(converted) => {
                    service_failure = Some(
                        ConversionError::new(&*value, target)
                            .with_path(path)
                            .with_converter("ConversionService")
                            .with_reason(format!(
                                "returned a value of type `{}`",
                                converted.reflect_type_info().type_path()
                            )),
                    );
                }
                Err(err) => {
                    trace!("conversion service failed, falling back: {err}");
                    service_failure = Some(err.with_path(path));
                }
            }
        }

        let converted = match self.fallback(value, &ctx, service_failure.is_some()) {
            Ok(converted) => converted,
            Err(err) => return Err(service_failure.unwrap_or(err)),
        };

        if converted.value.ty_id() != target.type_id() {
            return Err(match service_failure {
                Some(failure) => failure,
                None => {
                    let err = ConversionError::new(&*converted.value, target).with_path(path);
                    match converted.converter {
                        Some(name) => err.with_converter(name),
                        None => err,
                    }
                }
            });
        }
        if let Some(failure) = service_failure {
            if !converted.changed {
                return Err(failure);
            }
            debug!("ignored conversion service failure, the fallback conversion succeeded: {failure}");
        }
        Ok(converted.value)
    }

    // -------------------------------------------------------------------------
    // Fallback strategies

    fn fallback(
        &self,
        value: Box<dyn Reflect>,
        ctx: &ConversionContext<'_>,
        service_failed: bool,
    ) -> Result<Converted, ConversionError> {
        let target = ctx.target();
        if value.ty_id() != target.type_id()
            && let Some(handle) = self.registry.default_converter(target)
        {
            let converted = handle
                .apply(&*value, ctx)
                .map_err(|err| err.with_path(ctx.path()).with_converter(handle.name()))?;
            return Ok(Converted::changed(converted).by(handle.name()));
        }

        match target.kind() {
            TypeKind::List | TypeKind::Set => self.convert_sequence(value, ctx),
            TypeKind::Map => self.convert_map(value, ctx),
            _ => coerce_value(value, ctx, service_failed),
        }
    }

    /// Lists and sets, from a list, a set or a single value.
    fn convert_sequence(
        &self,
        value: Box<dyn Reflect>,
        ctx: &ConversionContext<'_>,
    ) -> Result<Converted, ConversionError> {
        let target = ctx.target();
        let path = ctx.path();
        let Some(element) = ctx.element() else {
            return Ok(Converted::unchanged(value));
        };
        if value.ty_id() == target.type_id() && !self.registry.has_custom_for_element(Some(element), path) {
            return Ok(Converted::unchanged(value));
        }

        let items: Option<Vec<Box<dyn Reflect>>> = match value.reflect_ref() {
            ReflectRef::List(list) => Some(list.iter().map(|item| item.reflect_clone()).collect()),
            ReflectRef::Set(set) => Some(set.iter().map(|item| item.reflect_clone()).collect()),
            ReflectRef::Map(_) => None,
            ReflectRef::Value(single) => match single.downcast_ref::<String>() {
                Some(text) if element.kind() == TypeKind::Enum => Some(
                    text.split(',')
                        .map(|part| Box::new(part.trim().to_owned()) as Box<dyn Reflect>)
                        .collect(),
                ),
                _ => Some(vec![single.reflect_clone()]),
            },
        };
        let Some(items) = items else {
            return Ok(Converted::unchanged(value));
        };
        let Some(mut container) = target.info().default_value() else {
            debug!("`{}` has no default constructor, keeping the original value", target.type_path());
            return Ok(Converted::unchanged(value));
        };

        for (index, item) in items.into_iter().enumerate() {
            let item_path = path.map(|path| format!("{path}[{index}]"));
            let request = ConversionRequest::new(item, element).with_path(item_path.as_deref());
            let converted = self.convert(request)?;
            let inserted = match container.reflect_mut() {
                ReflectMut::List(list) => list.push(converted),
                ReflectMut::Set(set) => set.insert(converted).map(drop),
                _ => return Err(not_a_container(&*value, target, path)),
            };
            inserted.map_err(|err| {
                ConversionError::new(&*value, target)
                    .with_path(path)
                    .with_reason(err.to_string())
            })?;
        }
        Ok(Converted::changed(container))
    }

    /// Maps, from a map. Keys and values are converted with the path
    /// `path[key]`.
    fn convert_map(
        &self,
        value: Box<dyn Reflect>,
        ctx: &ConversionContext<'_>,
    ) -> Result<Converted, ConversionError> {
        let target = ctx.target();
        let path = ctx.path();
        let (Some(key_type), Some(value_type)) = (target.key(), target.value()) else {
            return Ok(Converted::unchanged(value));
        };
        if value.ty_id() == target.type_id()
            && !self.registry.has_custom_for_element(Some(key_type), path)
            && !self.registry.has_custom_for_element(Some(value_type), path)
        {
            return Ok(Converted::unchanged(value));
        }

        let entries: Option<Vec<(Box<dyn Reflect>, Box<dyn Reflect>)>> = match value.reflect_ref() {
            ReflectRef::Map(map) => Some(
                map.iter()
                    .map(|(key, value)| (key.reflect_clone(), value.reflect_clone()))
                    .collect(),
            ),
            _ => None,
        };
        let Some(entries) = entries else {
            return Ok(Converted::unchanged(value));
        };
        let Some(mut container) = target.info().default_value() else {
            debug!("`{}` has no default constructor, keeping the original value", target.type_path());
            return Ok(Converted::unchanged(value));
        };

        for (key, item) in entries {
            let entry_path = path.map(|path| format!("{path}[{}]", key.display_key()));
            let entry_path = entry_path.as_deref();
            let key = self.convert(ConversionRequest::new(key, key_type).with_path(entry_path))?;
            let item = self.convert(ConversionRequest::new(item, value_type).with_path(entry_path))?;
            let ReflectMut::Map(map) = container.reflect_mut() else {
                return Err(not_a_container(&*value, target, path));
            };
            map.insert(key, item).map_err(|err| {
                ConversionError::new(&*value, target)
                    .with_path(path)
                    .with_reason(err.to_string())
            })?;
        }
        Ok(Converted::changed(container))
    }
}

/// Runs a custom converter, which must produce the target type.
fn apply_exclusive(
    handle: &ConverterHandle,
    value: Box<dyn Reflect>,
    ctx: &ConversionContext<'_>,
) -> Result<Box<dyn Reflect>, ConversionError> {
    let target = ctx.target();
    let converted = handle
        .apply(&*value, ctx)
        .map_err(|err| err.with_path(ctx.path()).with_converter(handle.name()))?;
    if converted.ty_id() == target.type_id() {
        return Ok(converted);
    }
    Err(ConversionError::new(&*value, target)
        .with_path(ctx.path())
        .with_converter(handle.name())
        .with_reason(format!(
            "returned a value of type `{}`",
            converted.reflect_type_info().type_path()
        )))
}

/// Strings to types with `FromStr` or to enum constants, and scalars to
/// `String`.
fn coerce_value(
    value: Box<dyn Reflect>,
    ctx: &ConversionContext<'_>,
    service_failed: bool,
) -> Result<Converted, ConversionError> {
    let target = ctx.target();
    if value.ty_id() == target.type_id() {
        return Ok(Converted::unchanged(value));
    }

    if target.is::<String>()
        && let Some(text) = value.reflect_to_string()
    {
        return Ok(Converted::changed(Box::new(text)));
    }

    let Some(text) = value.downcast_ref::<String>() else {
        return Ok(Converted::unchanged(value));
    };
    let info = target.info();

    if !service_failed && let Some(from_str) = info.from_str_fn() {
        match from_str(text) {
            Ok(converted) => return Ok(Converted::changed(converted)),
            Err(reason) if info.as_enum().is_none() => {
                return Err(ConversionError::new(&*value, target)
                    .with_path(ctx.path())
                    .with_reason(reason));
            }
            Err(reason) => trace!("`FromStr` of `{}` failed: {reason}", target.type_path()),
        }
    }

    if let Some(constants) = info.as_enum() {
        let name = text.trim();
        if let Some(constant) = constants.constant(name) {
            return Ok(Converted::changed(constant));
        }
        if let Some(constant) = legacy_constant(name, target) {
            warn!(
                "resolved `{name}` to a constant of `{}` through its qualified name; \
                 use the plain constant name instead",
                target.type_path()
            );
            return Ok(Converted::changed(constant));
        }
        let reason = if name.is_empty() {
            String::from("empty enum constant name")
        } else {
            format!("no constant named `{name}`")
        };
        return Err(ConversionError::new(&*value, target)
            .with_path(ctx.path())
            .with_reason(reason));
    }

    Ok(Converted::unchanged(value))
}

/// Resolves `Type.CONSTANT`, where `Type` is a full or short type name in
/// the global [`TypeRegistry`].
fn legacy_constant(text: &str, target: TypeDescriptor) -> Option<Box<dyn Reflect>> {
    let (type_name, constant) = text.rsplit_once('.')?;
    let ty = TypeRegistry::read_global().resolve(type_name)?;
    if ty != target {
        return None;
    }
    ty.info().as_enum()?.constant(constant)
}

fn not_a_container(value: &dyn Reflect, target: TypeDescriptor, path: Option<&str>) -> ConversionError {
    ConversionError::new(value, target)
        .with_path(path)
        .with_reason("the default value of the target is not a container")
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet, HashMap};
    use std::sync::Arc;

    use vc_bean::info::TypeDescriptor;
    use vc_bean::{Reflect, impl_reflect_enum, impl_reflect_value};

    use super::TypeConverter;
    use crate::context::ConversionRequest;
    use crate::converter::ConverterHandle;
    use crate::registry::EditorRegistry;
    use crate::{ConversionError, ConversionService};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
    enum Shade {
        #[default]
        Light,
        Dark,
    }

    impl_reflect_enum!(Shade { Light, Dark }: Default);

    #[derive(Debug, Clone, PartialEq)]
    struct Email(String);

    impl core::str::FromStr for Email {
        type Err = String;

        fn from_str(text: &str) -> Result<Self, Self::Err> {
            if text.contains('@') {
                Ok(Email(text.to_owned()))
            } else {
                Err(format!("`{text}` is not an email address"))
            }
        }
    }

    impl_reflect_value!(Email: FromStr);

    fn text(s: &str) -> Box<dyn Reflect> {
        Box::new(String::from(s))
    }

    fn doubling() -> ConverterHandle {
        ConverterHandle::from_fn("double", |value, ctx| match value.downcast_ref::<i32>() {
            Some(n) => Ok(Box::new(n * 2) as Box<dyn Reflect>),
            None => {
                let n: i32 = value
                    .downcast_ref::<String>()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| ConversionError::new(value, ctx.target()))?;
                Ok(Box::new(n * 2))
            }
        })
    }

    #[test]
    fn numbers_and_scalars() {
        let registry = EditorRegistry::new();
        let converter = TypeConverter::new(&registry);

        assert_eq!(converter.convert_to::<i32>(text("42"), None).unwrap(), 42);
        assert_eq!(converter.convert_to::<u8>(Box::new(200_i64), None).unwrap(), 200);
        assert!(converter.convert_to::<bool>(text("yes"), None).unwrap());
        assert_eq!(converter.convert_to::<char>(text("\\u0042"), None).unwrap(), 'B');
        assert_eq!(converter.convert_to::<String>(Box::new(2.5_f64), None).unwrap(), "2.5");
        assert_eq!(converter.convert_to::<String>(Box::new(Shade::Dark), None).unwrap(), "Dark");

        let err = converter.convert_to::<i32>(text("abc"), Some("age")).unwrap_err();
        assert_eq!(err.path(), Some("age"));
        assert_eq!(err.converter(), Some("NumberConverter"));
        assert_eq!(err.target_type(), "i32");
    }

    #[test]
    fn strings_to_values_and_enums() {
        let registry = EditorRegistry::new();
        let converter = TypeConverter::new(&registry);

        let email = converter.convert_to::<Email>(text("a@b.c"), None).unwrap();
        assert_eq!(email, Email(String::from("a@b.c")));
        let err = converter.convert_to::<Email>(text("nope"), None).unwrap_err();
        assert!(err.reason().unwrap().contains("not an email"));

        assert_eq!(converter.convert_to::<Shade>(text(" Dark "), None).unwrap(), Shade::Dark);
        assert!(converter.convert_to::<Shade>(text("dark"), None).is_err());
        assert!(converter.convert_to::<Shade>(text(""), None).is_err());
    }

    #[test]
    fn legacy_qualified_enum_names() {
        let registry = EditorRegistry::new();
        let converter = TypeConverter::new(&registry);
        let full = format!("{}.Dark", TypeDescriptor::of::<Shade>().type_path());

        assert_eq!(converter.convert_to::<Shade>(text(&full), None).unwrap(), Shade::Dark);
        assert_eq!(converter.convert_to::<Shade>(text("Shade.Light"), None).unwrap(), Shade::Light);
        assert!(converter.convert_to::<Shade>(text("Shade.Dim"), None).is_err());
        assert!(converter.convert_to::<Shade>(text("bool.Dark"), None).is_err());
    }

    #[test]
    fn sequences() {
        let registry = EditorRegistry::new();
        let converter = TypeConverter::new(&registry);

        let numbers: Vec<i64> = converter
            .convert_to(Box::new(vec![String::from("1"), String::from("0x10")]), None)
            .unwrap();
        assert_eq!(numbers, [1, 16]);

        let single: Vec<u8> = converter.convert_to(text("7"), None).unwrap();
        assert_eq!(single, [7]);

        let shades: Vec<Shade> = converter.convert_to(text("Dark, Light"), None).unwrap();
        assert_eq!(shades, [Shade::Dark, Shade::Light]);

        let set: BTreeSet<u16> = converter.convert_to(Box::new(vec![3_i32, 1, 3]), None).unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), [1, 3]);

        let err = converter
            .convert_to::<Vec<i32>>(Box::new(vec![String::from("1"), String::from("x")]), Some("ids"))
            .unwrap_err();
        assert_eq!(err.path(), Some("ids[1]"));
    }

    #[test]
    fn maps() {
        let registry = EditorRegistry::new();
        let converter = TypeConverter::new(&registry);

        let mut source = HashMap::new();
        source.insert(String::from("1"), String::from("true"));
        source.insert(String::from("2"), String::from("off"));
        let map: BTreeMap<u32, bool> = converter.convert_to(Box::new(source), None).unwrap();
        assert_eq!(map, BTreeMap::from([(1, true), (2, false)]));

        let mut bad = BTreeMap::new();
        bad.insert(String::from("k"), String::from("maybe"));
        let err = converter
            .convert_to::<BTreeMap<String, bool>>(Box::new(bad), Some("flags"))
            .unwrap_err();
        assert_eq!(err.path(), Some("flags[k]"));
    }

    #[test]
    fn same_container_is_returned_unchanged() {
        let registry = EditorRegistry::new();
        let converter = TypeConverter::new(&registry);

        let value: Box<dyn Reflect> = Box::new(vec![1_i32, 2]);
        let before = &*value as *const dyn Reflect as *const ();
        let request = ConversionRequest::new(value, TypeDescriptor::of::<Vec<i32>>()).with_path(Some("numbers"));
        let converted = converter.convert(request).unwrap();
        assert_eq!(&*converted as *const dyn Reflect as *const (), before);
    }

    #[test]
    fn element_converter_forces_a_copy() {
        let mut registry = EditorRegistry::new();
        registry.register_converter(TypeDescriptor::of::<i32>(), Some("numbers"), doubling());
        let converter = TypeConverter::new(&registry);

        let doubled: Vec<i32> = converter.convert_to(Box::new(vec![1_i32, 2]), Some("numbers")).unwrap();
        assert_eq!(doubled, [2, 4]);
        let untouched: Vec<i32> = converter.convert_to(Box::new(vec![1_i32, 2]), Some("others")).unwrap();
        assert_eq!(untouched, [1, 2]);
    }

    #[test]
    fn custom_converters_are_exclusive() {
        let mut registry = EditorRegistry::new();
        registry.register_converter(TypeDescriptor::of::<i32>(), None, doubling());
        registry.register_converter(
            TypeDescriptor::of::<u8>(),
            None,
            ConverterHandle::from_fn("wrong", |_, _| Ok(Box::new(String::new()) as Box<dyn Reflect>)),
        );
        let converter = TypeConverter::new(&registry);

        assert_eq!(converter.convert_to::<i32>(text("4"), None).unwrap(), 8);
        assert_eq!(converter.convert_to::<i32>(Box::new(4_i32), None).unwrap(), 8);

        let err = converter.convert_to::<u8>(text("1"), Some("level")).unwrap_err();
        assert_eq!(err.converter(), Some("wrong"));
        assert_eq!(err.source_type(), "alloc::string::String");
    }

    #[test]
    fn overridden_default_names_itself_on_mismatch() {
        let mut registry = EditorRegistry::new();
        registry.override_default(
            TypeDescriptor::of::<u16>(),
            ConverterHandle::from_fn("loose-u16", |_, _| Ok(Box::new(7_u32) as Box<dyn Reflect>)),
        );
        let converter = TypeConverter::new(&registry);

        let err = converter.convert_to::<u16>(text("7"), Some("port")).unwrap_err();
        assert_eq!(err.converter(), Some("loose-u16"));
        assert_eq!(err.source_type(), "u32");
        assert_eq!(err.path(), Some("port"));
    }

    struct FixedService {
        result: Result<i32, &'static str>,
    }

    impl ConversionService for FixedService {
        fn can_convert(&self, _: TypeDescriptor, target: TypeDescriptor) -> bool {
            target.is::<i32>()
        }

        fn convert(&self, value: &dyn Reflect, target: TypeDescriptor) -> Result<Box<dyn Reflect>, ConversionError> {
            match self.result {
                Ok(n) => Ok(Box::new(n)),
                Err(reason) => Err(ConversionError::new(value, target).with_reason(reason)),
            }
        }
    }

    fn with_service(result: Result<i32, &'static str>) -> EditorRegistry {
        let mut registry = EditorRegistry::new();
        registry.set_conversion_service(Some(Arc::new(FixedService { result })));
        registry
    }

    #[test]
    fn service_runs_before_defaults() {
        let registry = with_service(Ok(99));
        let converter = TypeConverter::new(&registry);
        assert_eq!(converter.convert_to::<i32>(text("1"), None).unwrap(), 99);
        assert_eq!(converter.convert_to::<u8>(text("1"), None).unwrap(), 1);
    }

    #[test]
    fn custom_converter_skips_the_service() {
        let mut registry = with_service(Ok(99));
        registry.register_path_converter("count", doubling());
        let converter = TypeConverter::new(&registry);
        assert_eq!(converter.convert_to::<i32>(text("5"), Some("count")).unwrap(), 10);
    }

    #[test]
    fn service_failure_precedence() {
        let registry = with_service(Err("service says no"));
        let converter = TypeConverter::new(&registry);

        // The default converter succeeds, the failure is dropped.
        assert_eq!(converter.convert_to::<i32>(text("3"), None).unwrap(), 3);

        // The default converter fails, the service failure is reported.
        let err = converter.convert_to::<i32>(text("x"), None).unwrap_err();
        assert_eq!(err.reason(), Some("service says no"));

        // Nothing converted the value, the service failure is reported.
        let err = converter.convert_to::<i32>(Box::new(3_i32), None).unwrap_err();
        assert_eq!(err.reason(), Some("service says no"));
    }
}
