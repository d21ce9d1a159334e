use core::fmt;
use std::sync::Arc;

use log::{debug, trace};
use vc_bean::Reflect;
use vc_bean::info::{DynamicTyped, TypeDescriptor, Typed};
use vc_bean::introspect::IntrospectionCache;
use vc_bean::path::{canonical_name, tokenize};
use vc_convert::context::ConversionRequest;
use vc_convert::converter::ConverterHandle;
use vc_convert::pipeline::TypeConverter;
use vc_convert::registry::EditorRegistry;
use vc_convert::{ConversionError, ConversionService};

use crate::walk::{Walker, empty_path};
use crate::{AggregatedError, BindConfig, BindError, PropertyValues};

// -----------------------------------------------------------------------------
// PropertyNavigator

/// Reads and writes property paths on one root value.
///
/// The navigator owns its converter registry and remembers the
/// introspection record of every nested value it visits. A record is
/// looked up again when the value at its path is replaced.
///
/// A navigator is cheap to create; use one per bind operation.
///
/// ```
/// use vc_bean::impl_reflect_bean;
/// use vc_bean::introspect::{Bean, BeanBuilder};
/// use vc_bind::{BindConfig, PropertyNavigator};
///
/// #[derive(Debug, Clone, Default)]
/// struct Item {
///     name: String,
/// }
///
/// impl Bean for Item {
///     fn describe(bean: &mut BeanBuilder<Self>) {
///         bean.field("name", |i| &i.name, |i| &mut i.name);
///     }
/// }
///
/// impl_reflect_bean!(Item: Default);
///
/// #[derive(Debug, Clone, Default)]
/// struct Order {
///     items: Vec<Item>,
///     count: u32,
/// }
///
/// impl Bean for Order {
///     fn describe(bean: &mut BeanBuilder<Self>) {
///         bean.field("items", |o| &o.items, |o| &mut o.items)
///             .field("count", |o| &o.count, |o| &mut o.count);
///     }
/// }
///
/// impl_reflect_bean!(Order: Default);
///
/// let mut order = Order::default();
/// let mut nav = PropertyNavigator::with_config(&mut order, BindConfig::default().auto_grow(10));
/// nav.set_value("count", Box::new(String::from("2"))).unwrap();
/// nav.set_value("items[1].name", Box::new(String::from("tea"))).unwrap();
///
/// assert_eq!(order.count, 2);
/// assert_eq!(order.items.len(), 2);
/// assert_eq!(order.items[1].name, "tea");
/// ```
pub struct PropertyNavigator<'a> {
    root: &'a mut dyn Reflect,
    walker: Walker<'a>,
}

impl<'a> PropertyNavigator<'a> {
    /// A navigator with the default configuration and the global
    /// introspection cache.
    #[inline]
    pub fn new(root: &'a mut dyn Reflect) -> Self {
        Self::with_config(root, BindConfig::default())
    }

    pub fn with_config(root: &'a mut dyn Reflect, config: BindConfig) -> Self {
        Self {
            root,
            walker: Walker::new(config, EditorRegistry::new(), IntrospectionCache::global()),
        }
    }

    /// Replaces the converter registry.
    pub fn with_registry(mut self, registry: EditorRegistry) -> Self {
        self.walker.registry = registry;
        self
    }

    /// Uses `cache` instead of the global introspection cache.
    pub fn with_cache(mut self, cache: &'a IntrospectionCache) -> Self {
        self.walker.set_cache(cache);
        self
    }

    #[inline]
    pub fn config(&self) -> &BindConfig {
        &self.walker.config
    }

    #[inline]
    pub fn config_mut(&mut self) -> &mut BindConfig {
        &mut self.walker.config
    }

    #[inline]
    pub fn registry(&self) -> &EditorRegistry {
        &self.walker.registry
    }

    #[inline]
    pub fn registry_mut(&mut self) -> &mut EditorRegistry {
        &mut self.walker.registry
    }

    #[inline]
    pub fn root(&self) -> &dyn Reflect {
        &*self.root
    }

    #[inline]
    pub fn root_type(&self) -> TypeDescriptor {
        self.root.reflect_type()
    }

    // -------------------------------------------------------------------------
    // Converters

    /// Registers a converter for `target`, optionally limited to `path`.
    pub fn register_converter(&mut self, target: TypeDescriptor, path: Option<&str>, handle: ConverterHandle) {
        self.walker.registry.register_converter(target, path, handle);
    }

    /// Registers a converter for `path`, whatever the target type.
    pub fn register_path_converter(&mut self, path: &str, handle: ConverterHandle) {
        self.walker.registry.register_path_converter(path, handle);
    }

    /// Replaces the built-in default converter of `target`.
    pub fn override_default_converter(&mut self, target: TypeDescriptor, handle: ConverterHandle) {
        self.walker.registry.override_default(target, handle);
    }

    pub fn set_conversion_service(&mut self, service: Option<Arc<dyn ConversionService>>) {
        self.walker.registry.set_conversion_service(service);
    }

    /// Converts `value` to `target` with this navigator's converters.
    pub fn convert_if_necessary(
        &self,
        value: Box<dyn Reflect>,
        target: TypeDescriptor,
        path: Option<&str>,
    ) -> Result<Box<dyn Reflect>, ConversionError> {
        TypeConverter::new(&self.walker.registry).convert(ConversionRequest::new(value, target).with_path(path))
    }

    // -------------------------------------------------------------------------
    // Access

    /// Reads the value at `path`.
    ///
    /// Returns `Ok(None)` when the value is an absent optional property or
    /// a missing map entry. With auto-grow enabled, absent intermediate
    /// values are created on the way, as for [`set_value`](Self::set_value).
    pub fn get_value(&mut self, path: &str) -> Result<Option<Box<dyn Reflect>>, BindError> {
        let parsed = tokenize(path);
        if parsed.is_empty() {
            return Err(empty_path(&*self.root));
        }

        let read = self
            .walker
            .read(&*self.root, &parsed, parsed.len())
            .map(|value| value.map(|value| value.reflect_clone()));
        match read {
            Err(err) if err.is_growable() && self.walker.config.auto_grow_nested_paths => {
                match self.walker.read_growing(&mut *self.root, &parsed) {
                    Ok(value) => Ok(value.map(|value| value.reflect_clone())),
                    // A property on the way cannot be borrowed mutably.
                    Err(BindError::NotWritable { .. }) => Err(err),
                    Err(grow_err) => Err(grow_err),
                }
            }
            read => read,
        }
    }

    /// Reads the value at `path` and converts it to `T`.
    pub fn get_value_as<T: Reflect + Typed>(&mut self, path: &str) -> Result<Option<T>, BindError> {
        let Some(value) = self.get_value(path)? else {
            return Ok(None);
        };
        let target = TypeDescriptor::of::<T>();
        let converted = self
            .convert_if_necessary(value, target, Some(path))
            .map_err(|err| BindError::conversion(path, err))?;
        converted
            .take::<T>()
            .map(Some)
            .map_err(|value| BindError::conversion(path, ConversionError::new(&*value, target)))
    }

    /// Converts `value` to the declared type of `path` and stores it.
    pub fn set_value(&mut self, path: &str, value: Box<dyn Reflect>) -> Result<(), BindError> {
        trace!("assigning `{path}`");
        let parsed = tokenize(path);
        self.walker.write(&mut *self.root, &parsed, value)
    }

    /// Assigns `values` in order.
    ///
    /// - An unknown property aborts the batch unless `ignore_unknown` is
    ///   set or the value is optional.
    /// - A path that cannot be used ([`BindError::is_invalid_path`]) is
    ///   skipped when `ignore_invalid` is set or the value is optional,
    ///   and collected otherwise.
    /// - Conversion and accessor failures are collected.
    /// - Introspection failures abort the batch.
    ///
    /// Collected errors are returned together as
    /// [`BindError::Aggregated`]. Values applied before or after a failure
    /// stay applied.
    pub fn set_values(
        &mut self,
        values: PropertyValues,
        ignore_unknown: bool,
        ignore_invalid: bool,
    ) -> Result<(), BindError> {
        let mut errors = Vec::new();
        for value in values {
            let (path, value, optional) = value.into_parts();
            let err = match self.set_value(&path, value) {
                Ok(()) => continue,
                Err(err) => err,
            };
            match err {
                BindError::UnknownProperty { .. } if ignore_unknown || optional => {
                    debug!("skipped unknown property `{path}`");
                }
                BindError::UnknownProperty { .. } => return Err(err),
                err if err.is_invalid_path() && (ignore_invalid || optional) => {
                    debug!("skipped `{path}`: {err}");
                }
                BindError::Introspection(_) => return Err(err),
                err => errors.push((canonical_name(&path), err)),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AggregatedError::new(errors).into())
        }
    }

    /// The declared type at `path`, derived from type information only.
    pub fn declared_type(&self, path: &str) -> Option<TypeDescriptor> {
        self.walker.declared_type(self.root_type(), &tokenize(path))
    }

    /// Whether [`get_value`](Self::get_value) can read `path`.
    pub fn is_readable(&mut self, path: &str) -> bool {
        self.walker.is_readable(&*self.root, &tokenize(path))
    }

    /// Whether [`set_value`](Self::set_value) can write `path`, given a
    /// value of the right type.
    pub fn is_writable(&mut self, path: &str) -> bool {
        self.walker.is_writable(&*self.root, &tokenize(path))
    }

    // -------------------------------------------------------------------------
    // Nested records

    /// The canonical paths of the nested values visited so far.
    pub fn nested_paths(&self) -> impl Iterator<Item = &str> {
        self.walker.nested_paths()
    }

    /// How often a nested record was looked up again because the value at
    /// its path was replaced.
    #[inline]
    pub fn rebuilds(&self) -> usize {
        self.walker.rebuilds()
    }
}

impl fmt::Debug for PropertyNavigator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyNavigator")
            .field("root", &self.root.reflect_type_info().type_path())
            .field("config", &self.walker.config)
            .field("registry", &self.walker.registry)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet, HashMap};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use vc_bean::Reflect;
    use vc_bean::impl_reflect_bean;
    use vc_bean::info::TypeDescriptor;
    use vc_bean::introspect::{Bean, BeanBuilder, IntrospectionCache, ScopeId};
    use vc_convert::context::ConversionContext;
    use vc_convert::converter::{ConverterHandle, StatefulEditor};
    use vc_convert::{ConversionError, ConversionService};

    use super::PropertyNavigator;
    use crate::{BindConfig, BindError, PropertyValue, PropertyValues};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Address {
        city: String,
        zip: Option<u32>,
    }

    impl Address {
        fn new(city: &str) -> Self {
            Self {
                city: city.to_owned(),
                zip: None,
            }
        }
    }

    impl Bean for Address {
        fn describe(bean: &mut BeanBuilder<Self>) {
            bean.field("city", |a| &a.city, |a| &mut a.city)
                .option_field("zip", |a| &a.zip, |a| &mut a.zip);
        }
    }

    impl_reflect_bean!(Address: Default);

    #[derive(Debug, Clone, Default)]
    struct Person {
        name: String,
        age: i32,
        count: u32,
        color: String,
        addresses: Vec<Address>,
        home: Option<Address>,
        tags: BTreeSet<String>,
        scores: HashMap<String, i64>,
        by_id: BTreeMap<u32, Address>,
        lucky: Vec<u8>,
        limit: u32,
        id: u64,
        secret: String,
    }

    impl Bean for Person {
        fn describe(bean: &mut BeanBuilder<Self>) {
            bean.field("name", |p| &p.name, |p| &mut p.name)
                .field("age", |p| &p.age, |p| &mut p.age)
                .field("count", |p| &p.count, |p| &mut p.count)
                .field("color", |p| &p.color, |p| &mut p.color)
                .field("addresses", |p| &p.addresses, |p| &mut p.addresses)
                .option_field("home", |p| &p.home, |p| &mut p.home)
                .field("tags", |p| &p.tags, |p| &mut p.tags)
                .field("scores", |p| &p.scores, |p| &mut p.scores)
                .field("byId", |p| &p.by_id, |p| &mut p.by_id)
                .field("lucky", |p| &p.lucky, |p| &mut p.lucky)
                .property("limit", |p| &p.limit, |p, limit: u32| {
                    if limit > 100 {
                        return Err(format!("limit {limit} exceeds 100"));
                    }
                    p.limit = limit;
                    Ok(())
                })
                .read_only("id", |p| &p.id)
                .write_only("secret", |p, secret: String| {
                    p.secret = secret;
                    Ok(())
                });
        }
    }

    impl_reflect_bean!(Person: Default);

    #[derive(Debug, Clone)]
    struct Sealed {
        code: u8,
    }

    impl Bean for Sealed {
        fn describe(bean: &mut BeanBuilder<Self>) {
            bean.field("code", |s| &s.code, |s| &mut s.code);
        }
    }

    impl_reflect_bean!(Sealed);

    #[derive(Debug, Clone, Default)]
    struct Vault {
        sealed: Option<Sealed>,
    }

    impl Bean for Vault {
        fn describe(bean: &mut BeanBuilder<Self>) {
            bean.option_field("sealed", |v| &v.sealed, |v| &mut v.sealed);
        }
    }

    impl_reflect_bean!(Vault: Default);

    fn text(s: &str) -> Box<dyn Reflect> {
        Box::new(String::from(s))
    }

    fn read<T: Clone + 'static>(nav: &mut PropertyNavigator<'_>, path: &str) -> Option<T> {
        nav.get_value(path)
            .unwrap()
            .map(|value| value.downcast_ref::<T>().unwrap().clone())
    }

    fn constant(name: &'static str, value: &'static str) -> ConverterHandle {
        ConverterHandle::from_fn(name, move |_, _| Ok(Box::new(String::from(value)) as Box<dyn Reflect>))
    }

    #[test]
    fn nested_read_through_list() {
        let mut person = Person {
            addresses: vec![Address::new("X")],
            ..Person::default()
        };
        let mut nav = PropertyNavigator::new(&mut person);
        assert_eq!(read::<String>(&mut nav, "addresses[0].city").as_deref(), Some("X"));
        assert_eq!(read::<u32>(&mut nav, "addresses[0].zip"), None);
        assert_eq!(read::<Address>(&mut nav, "addresses[0]"), Some(Address::new("X")));

        let err = nav.get_value("addresses[1].city").unwrap_err();
        assert!(matches!(err, BindError::IndexOutOfRange { index: 1, len: 1, .. }));
        assert_eq!(err.path(), Some("addresses"));
    }

    #[test]
    fn string_coerced_to_declared_number() {
        let mut person = Person::default();
        let mut nav = PropertyNavigator::new(&mut person);
        nav.set_value("count", text("42")).unwrap();
        nav.set_value("age", text("-0x10")).unwrap();
        assert_eq!(nav.get_value_as::<u64>("count").unwrap(), Some(42));

        let BindError::TypeConversion { path, source } = nav.set_value("age", text("abc")).unwrap_err() else {
            panic!("expected a conversion failure");
        };
        assert_eq!(path, "age");
        assert_eq!(source.converter(), Some("NumberConverter"));

        drop(nav);
        assert_eq!(person.count, 42);
        assert_eq!(person.age, -16);
    }

    #[test]
    fn auto_grow_creates_list_elements() {
        let mut person = Person::default();
        let mut nav = PropertyNavigator::with_config(&mut person, BindConfig::default().auto_grow(10));
        nav.set_value("addresses[3].city", text("a")).unwrap();
        drop(nav);

        assert_eq!(person.addresses.len(), 4);
        assert_eq!(person.addresses[3].city, "a");
        assert_eq!(person.addresses[0], Address::default());
    }

    #[test]
    fn auto_grow_stops_at_the_limit() {
        let mut person = Person::default();
        let mut nav = PropertyNavigator::with_config(&mut person, BindConfig::default().auto_grow(4));
        nav.set_value("addresses[3].city", text("a")).unwrap();

        let err = nav.set_value("addresses[4].city", text("b")).unwrap_err();
        assert!(matches!(err, BindError::IndexOutOfRange { index: 4, len: 4, .. }));

        nav.config_mut().auto_grow_nested_paths = false;
        let err = nav.set_value("addresses[5].city", text("c")).unwrap_err();
        assert!(matches!(err, BindError::IndexOutOfRange { index: 5, len: 4, .. }));
    }

    #[test]
    fn terminal_list_writes() {
        let mut person = Person::default();
        let mut nav = PropertyNavigator::with_config(&mut person, BindConfig::default().auto_grow(8));
        nav.set_value("lucky[2]", text("9")).unwrap();
        nav.set_value("lucky[0]", text("4")).unwrap();
        nav.set_value("addresses[1]", Box::new(Address::new("Lima"))).unwrap();

        nav.config_mut().auto_grow_nested_paths = false;
        let err = nav.set_value("lucky[3]", text("1")).unwrap_err();
        assert!(matches!(err, BindError::IndexOutOfRange { index: 3, len: 3, .. }));
        drop(nav);

        assert_eq!(person.lucky, [4, 0, 9]);
        assert_eq!(person.addresses, [Address::default(), Address::new("Lima")]);
    }

    #[test]
    fn batch_collects_conversion_failures() {
        let mut person = Person::default();
        let values = PropertyValues::new()
            .with("age", String::from("abc"))
            .with("name", String::from("Bob"));
        let err = PropertyNavigator::new(&mut person)
            .set_values(values, false, false)
            .unwrap_err();

        let BindError::Aggregated(errors) = err else {
            panic!("expected an aggregated error");
        };
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors.get("age"), Some(BindError::TypeConversion { .. })));
        assert_eq!(person.name, "Bob");
    }

    #[test]
    fn batch_unknown_property() {
        let values = || {
            PropertyValues::new()
                .with("name", String::from("A"))
                .with("nope", String::from("x"))
                .with("age", String::from("3"))
        };

        let mut person = Person::default();
        let err = PropertyNavigator::new(&mut person)
            .set_values(values(), false, false)
            .unwrap_err();
        assert!(matches!(err, BindError::UnknownProperty { ref property, .. } if property == "nope"));
        assert_eq!((person.name.as_str(), person.age), ("A", 0));

        let mut person = Person::default();
        PropertyNavigator::new(&mut person)
            .set_values(values(), true, false)
            .unwrap();
        assert_eq!(person.age, 3);

        let mut person = Person::default();
        let mut optional: PropertyValues = [PropertyValue::new("nope", 1_u8).optional()].into_iter().collect();
        optional.push(PropertyValue::new("age", String::from("5")));
        PropertyNavigator::new(&mut person)
            .set_values(optional, false, false)
            .unwrap();
        assert_eq!(person.age, 5);
    }

    #[test]
    fn batch_invalid_paths() {
        let values = || {
            PropertyValues::new()
                .with("id", String::from("5"))
                .with("tags[0]", String::from("x"))
                .with("addresses[2].city", String::from("Quito"))
                .with("name", String::from("B"))
        };

        let mut person = Person::default();
        let err = PropertyNavigator::new(&mut person)
            .set_values(values(), false, false)
            .unwrap_err();
        let BindError::Aggregated(errors) = err else {
            panic!("expected an aggregated error");
        };
        assert!(matches!(errors.get("id"), Some(BindError::NotWritable { .. })));
        assert!(matches!(
            errors.get("tags[0]"),
            Some(BindError::InvalidPropertyKind { path, .. }) if path == "tags"
        ));
        assert!(matches!(
            errors.get("addresses[2].city"),
            Some(BindError::IndexOutOfRange { index: 2, len: 0, .. })
        ));
        assert!(errors.get("tags").is_none());
        assert_eq!(errors.len(), 3);
        assert_eq!(person.name, "B");

        let mut person = Person::default();
        PropertyNavigator::new(&mut person)
            .set_values(values(), false, true)
            .unwrap();
        assert_eq!(person.name, "B");
    }

    #[test]
    fn path_converter_wins_in_any_order() {
        for path_first in [true, false] {
            let mut person = Person::default();
            let mut nav = PropertyNavigator::new(&mut person);
            let string = TypeDescriptor::of::<String>();
            if path_first {
                nav.register_converter(string, Some("color"), constant("c1", "from-path"));
                nav.register_converter(string, None, constant("c2", "from-type"));
            } else {
                nav.register_converter(string, None, constant("c2", "from-type"));
                nav.register_converter(string, Some("color"), constant("c1", "from-path"));
            }
            nav.set_value("color", text("red")).unwrap();
            nav.set_value("name", text("Ann")).unwrap();
            drop(nav);

            assert_eq!(person.color, "from-path");
            assert_eq!(person.name, "from-type");
        }
    }

    #[test]
    fn element_path_converters_apply_to_indexed_writes() {
        let mut person = Person::default();
        let mut nav = PropertyNavigator::with_config(&mut person, BindConfig::default().auto_grow(4));
        nav.register_path_converter(
            "lucky",
            ConverterHandle::from_fn("seven", |_, _| Ok(Box::new(7_u8) as Box<dyn Reflect>)),
        );
        nav.set_value("lucky[1]", text("1")).unwrap();
        drop(nav);
        assert_eq!(person.lucky, [0, 7]);
    }

    #[test]
    fn optional_properties() {
        let mut person = Person::default();
        let mut nav = PropertyNavigator::new(&mut person);
        assert!(nav.get_value("home").unwrap().is_none());
        assert!(matches!(
            nav.get_value("home.city"),
            Err(BindError::NullIntermediate { ref path }) if path == "home"
        ));
        assert!(matches!(
            nav.set_value("home.city", text("Rome")),
            Err(BindError::NullIntermediate { .. })
        ));

        nav.config_mut().auto_grow_nested_paths = true;
        nav.set_value("home.city", text("Rome")).unwrap();
        nav.set_value("home.zip", text("100")).unwrap();
        drop(nav);
        assert_eq!(
            person.home,
            Some(Address {
                city: String::from("Rome"),
                zip: Some(100),
            })
        );
    }

    #[test]
    fn reads_grow_intermediate_values() {
        let mut person = Person::default();
        let mut nav = PropertyNavigator::with_config(&mut person, BindConfig::default().auto_grow(10));
        assert!(nav.is_readable("home.city"));
        assert!(nav.root().downcast_ref::<Person>().is_some_and(|p| p.home.is_none()));

        assert_eq!(read::<String>(&mut nav, "home.city").as_deref(), Some(""));
        assert_eq!(read::<String>(&mut nav, "addresses[2].city").as_deref(), Some(""));

        assert!(!nav.is_readable("lucky[5]"));
        assert!(matches!(
            nav.get_value("lucky[5]"),
            Err(BindError::IndexOutOfRange { index: 5, len: 0, .. })
        ));
        drop(nav);

        assert_eq!(person.home, Some(Address::default()));
        assert_eq!(person.addresses.len(), 3);
        assert!(person.lucky.is_empty());
    }

    #[test]
    fn auto_grow_without_default_fails_conversion() {
        let mut vault = Vault::default();
        let mut nav = PropertyNavigator::with_config(&mut vault, BindConfig::default().auto_grow(4));
        let err = nav.set_value("sealed.code", text("1")).unwrap_err();
        assert!(matches!(err, BindError::TypeConversion { ref path, .. } if path == "sealed"));
    }

    #[test]
    fn maps() {
        let mut person = Person::default();
        let mut nav = PropertyNavigator::new(&mut person);
        nav.set_value("scores['a']", text("7")).unwrap();
        assert_eq!(read::<i64>(&mut nav, "scores[a]"), Some(7));
        assert_eq!(read::<i64>(&mut nav, "scores[\"b\"]"), None);

        assert!(matches!(
            nav.set_value("byId[5].city", text("Oslo")),
            Err(BindError::NullIntermediate { ref path }) if path == "byId[5]"
        ));
        assert!(matches!(
            nav.set_value("byId[x].city", text("Oslo")),
            Err(BindError::TypeConversion { ref path, .. }) if path == "byId"
        ));

        nav.config_mut().auto_grow_nested_paths = true;
        nav.set_value("byId[5].city", text("Oslo")).unwrap();
        drop(nav);
        assert_eq!(person.scores.get("a"), Some(&7));
        assert_eq!(person.by_id[&5].city, "Oslo");
    }

    #[test]
    fn sets_and_scalars_reject_keyed_writes() {
        let mut person = Person {
            tags: BTreeSet::from([String::from("a"), String::from("b")]),
            ..Person::default()
        };
        let mut nav = PropertyNavigator::new(&mut person);
        assert_eq!(read::<String>(&mut nav, "tags[1]").as_deref(), Some("b"));
        assert!(matches!(
            nav.get_value("tags[5]"),
            Err(BindError::IndexOutOfRange { index: 5, len: 2, .. })
        ));
        assert!(matches!(
            nav.set_value("tags[0]", text("c")),
            Err(BindError::InvalidPropertyKind { .. })
        ));
        assert!(matches!(
            nav.get_value("name[0]"),
            Err(BindError::InvalidPropertyKind { found: "alloc::string::String", .. })
        ));
        assert!(matches!(
            nav.get_value("addresses[first]"),
            Err(BindError::InvalidPropertyKind { .. })
        ));
        assert!(matches!(
            nav.get_value("count.value"),
            Err(BindError::UnknownProperty { .. })
        ));
    }

    #[test]
    fn accessor_failures() {
        let mut person = Person::default();
        let mut nav = PropertyNavigator::new(&mut person);

        let err = nav.set_value("limit", text("500")).unwrap_err();
        assert!(matches!(err, BindError::Invocation { ref message, .. } if message.contains("exceeds 100")));
        nav.set_value("limit", text("50")).unwrap();

        assert!(matches!(nav.set_value("id", text("1")), Err(BindError::NotWritable { .. })));
        assert!(matches!(nav.get_value("secret"), Err(BindError::NotReadable { .. })));
        nav.set_value("secret", text("s3")).unwrap();
        drop(nav);

        assert_eq!(person.limit, 50);
        assert_eq!(person.secret, "s3");
    }

    #[test]
    fn declared_types_and_access_checks() {
        let mut person = Person::default();
        let mut nav = PropertyNavigator::new(&mut person);

        assert_eq!(nav.declared_type("addresses[0].city"), Some(TypeDescriptor::of::<String>()));
        assert_eq!(nav.declared_type("byId[1]"), Some(TypeDescriptor::of::<Address>()));
        assert_eq!(nav.declared_type("home"), Some(TypeDescriptor::of::<Address>()));
        assert_eq!(nav.declared_type("lucky"), Some(TypeDescriptor::of::<Vec<u8>>()));
        assert_eq!(nav.declared_type("name[0]"), None);
        assert_eq!(nav.declared_type("nope"), None);

        assert!(nav.is_readable("id") && !nav.is_writable("id"));
        assert!(!nav.is_readable("secret") && nav.is_writable("secret"));
        assert!(nav.is_writable("lucky[4]"));
        assert!(!nav.is_writable("tags[0]"));
        assert!(!nav.is_readable("home.city"));
        assert!(!nav.is_writable("home.city"));
        assert!(nav.is_readable("home"));
        assert!(!nav.is_readable("lucky[5]"));
        assert!(matches!(
            nav.get_value("lucky[5]"),
            Err(BindError::IndexOutOfRange { index: 5, len: 0, .. })
        ));
        assert!(!nav.is_readable("nope") && !nav.is_writable("nope"));

        nav.config_mut().auto_grow_nested_paths = true;
        assert!(nav.is_writable("home.city"));
    }

    #[test]
    fn old_value_reaches_the_converter() {
        let accumulate = || {
            ConverterHandle::from_fn("accumulate", |value, ctx| {
                let add: u32 = value
                    .downcast_ref::<String>()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| ConversionError::new(value, ctx.target()))?;
                let old = ctx.old_value().and_then(|old| old.downcast_ref::<u32>()).copied();
                Ok(Box::new(old.unwrap_or(0) + add) as Box<dyn Reflect>)
            })
        };

        for (extract, expected) in [(false, 5), (true, 15)] {
            let mut person = Person {
                count: 10,
                ..Person::default()
            };
            let config = BindConfig {
                extract_old_value_before_convert: extract,
                ..BindConfig::default()
            };
            let mut nav = PropertyNavigator::with_config(&mut person, config);
            nav.register_path_converter("count", accumulate());
            nav.set_value("count", text("5")).unwrap();
            drop(nav);
            assert_eq!(person.count, expected);
        }
    }

    #[test]
    fn unreadable_old_value_is_skipped() {
        let mut person = Person::default();
        let config = BindConfig {
            extract_old_value_before_convert: true,
            ..BindConfig::default()
        };
        let mut nav = PropertyNavigator::with_config(&mut person, config);
        nav.register_path_converter(
            "secret",
            ConverterHandle::from_fn("no-old-value", |value, ctx| {
                assert!(ctx.old_value().is_none());
                Ok(value.reflect_clone())
            }),
        );
        nav.set_value("secret", text("s4")).unwrap();
        drop(nav);
        assert_eq!(person.secret, "s4");
    }

    struct Echo {
        pending: Option<u32>,
        calls: Arc<AtomicUsize>,
    }

    impl StatefulEditor for Echo {
        fn accept(&mut self, value: &dyn Reflect, ctx: &ConversionContext<'_>) -> Result<(), ConversionError> {
            let parsed = value
                .downcast_ref::<String>()
                .and_then(|text| text.parse().ok())
                .ok_or_else(|| ConversionError::new(value, ctx.target()))?;
            self.pending = Some(parsed);
            Ok(())
        }

        fn read(&mut self) -> Result<Box<dyn Reflect>, ConversionError> {
            std::thread::yield_now();
            self.calls.fetch_add(1, Ordering::Relaxed);
            match self.pending.take() {
                Some(value) => Ok(Box::new(value)),
                None => Err(ConversionError::from_types("()", "u32").with_reason("nothing accepted")),
            }
        }
    }

    #[test]
    fn shared_editor_is_serialized_across_threads() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = ConverterHandle::shared(Echo {
            pending: None,
            calls: Arc::clone(&calls),
        });

        std::thread::scope(|scope| {
            for t in 0..4_u32 {
                let handle = handle.clone();
                scope.spawn(move || {
                    let mut person = Person::default();
                    let mut nav = PropertyNavigator::new(&mut person);
                    nav.register_converter(TypeDescriptor::of::<u32>(), None, handle);
                    for i in 0..50 {
                        let n = t * 1000 + i;
                        nav.set_value("count", Box::new(n.to_string())).unwrap();
                        assert_eq!(read::<u32>(&mut nav, "count"), Some(n));
                    }
                });
            }
        });
        assert_eq!(calls.load(Ordering::Relaxed), 200);
    }

    struct Units;

    impl ConversionService for Units {
        fn can_convert(&self, source: TypeDescriptor, target: TypeDescriptor) -> bool {
            source.is::<String>() && target.is::<u32>()
        }

        fn convert(&self, value: &dyn Reflect, target: TypeDescriptor) -> Result<Box<dyn Reflect>, ConversionError> {
            value
                .downcast_ref::<String>()
                .and_then(|text| text.strip_suffix(" units"))
                .and_then(|n| n.parse::<u32>().ok())
                .map(|n| Box::new(n) as Box<dyn Reflect>)
                .ok_or_else(|| ConversionError::new(value, target).with_reason("expected `<n> units`"))
        }
    }

    #[test]
    fn conversion_service_then_defaults() {
        let mut person = Person::default();
        let mut nav = PropertyNavigator::new(&mut person);
        nav.set_conversion_service(Some(Arc::new(Units)));

        nav.set_value("count", text("7 units")).unwrap();
        assert_eq!(read::<u32>(&mut nav, "count"), Some(7));
        nav.set_value("count", text("8")).unwrap();
        assert_eq!(read::<u32>(&mut nav, "count"), Some(8));

        let BindError::TypeConversion { source, .. } = nav.set_value("count", text("many")).unwrap_err() else {
            panic!("expected a conversion failure");
        };
        assert_eq!(source.reason(), Some("expected `<n> units`"));
    }

    #[test]
    fn replaced_values_rebuild_nested_records() {
        let mut person = Person {
            addresses: vec![Address::new("X")],
            ..Person::default()
        };
        let mut nav = PropertyNavigator::new(&mut person);
        assert_eq!(read::<String>(&mut nav, "addresses[0].city").as_deref(), Some("X"));
        assert_eq!(nav.rebuilds(), 0);
        assert!(nav.nested_paths().any(|path| path == "addresses[0]"));

        nav.set_value("addresses", Box::new(vec![Address::new("Y")])).unwrap();
        assert_eq!(read::<String>(&mut nav, "addresses[0].city").as_deref(), Some("Y"));
        assert_eq!(nav.rebuilds(), 1);
        assert_eq!(read::<String>(&mut nav, "addresses[0].city").as_deref(), Some("Y"));
        assert_eq!(nav.rebuilds(), 1);
    }

    #[test]
    fn scoped_records_are_evicted_together() {
        let cache = IntrospectionCache::new();
        let scope = ScopeId::next();
        let mut person = Person {
            addresses: vec![Address::new("X")],
            ..Person::default()
        };

        let mut nav =
            PropertyNavigator::with_config(&mut person, BindConfig::default().with_scope(scope)).with_cache(&cache);
        nav.get_value("addresses[0].city").unwrap();
        drop(nav);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.evict_scope(scope), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn empty_path_is_unknown() {
        let mut person = Person::default();
        let mut nav = PropertyNavigator::new(&mut person);
        assert!(matches!(nav.get_value(""), Err(BindError::UnknownProperty { .. })));
        assert!(matches!(nav.set_value("", text("x")), Err(BindError::UnknownProperty { .. })));
        assert!(!nav.is_readable(""));
    }
}
