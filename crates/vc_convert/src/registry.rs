//! Converter registration and lookup.

use core::cell::RefCell;
use core::fmt;
use std::sync::Arc;

use log::debug;
use vc_bean::info::TypeDescriptor;
use vc_bean::path::{canonical_name, matches_property, stripped_variants};
use vc_utils::TypeIdMap;
use vc_utils::hash::HashMap;

use crate::ConversionService;
use crate::converter::ConverterHandle;
use crate::defaults;

// -----------------------------------------------------------------------------
// PathEntry

#[derive(Clone)]
struct PathEntry {
    target: Option<TypeDescriptor>,
    handle: ConverterHandle,
}

impl PathEntry {
    /// Whether the entry applies to a value of the requested type.
    fn accepts(&self, requested: Option<TypeDescriptor>) -> bool {
        match (self.target, requested) {
            (None, _) => true,
            (Some(registered), Some(requested)) => registered.is_related_to(requested),
            (Some(registered), None) => !registered.kind().is_container(),
        }
    }
}

// -----------------------------------------------------------------------------
// EditorRegistry

/// The converters available to one binding operation.
///
/// Custom converters are registered for a target type, for a property
/// path, or both. Lookup prefers the path:
///
/// 1. the canonical path itself;
/// 2. the path with bracketed keys stripped, so a converter registered
///    for `items` also applies to `items[0]`;
/// 3. the target type, then its declared supertypes nearest first.
///
/// Type lookups through supertypes are memoized until the next
/// registration. The memo makes the registry `!Sync`; use one registry
/// per thread.
#[derive(Clone)]
pub struct EditorRegistry {
    defaults_active: bool,
    overrides: TypeIdMap<ConverterHandle>,
    custom_by_type: TypeIdMap<ConverterHandle>,
    custom_by_path: HashMap<String, PathEntry>,
    resolved: RefCell<TypeIdMap<Option<ConverterHandle>>>,
    conversion_service: Option<Arc<dyn ConversionService>>,
}

impl Default for EditorRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl EditorRegistry {
    /// Creates a registry with active defaults and no custom converters.
    pub fn new() -> Self {
        Self {
            defaults_active: true,
            overrides: TypeIdMap::new(),
            custom_by_type: TypeIdMap::new(),
            custom_by_path: HashMap::default(),
            resolved: RefCell::new(TypeIdMap::new()),
            conversion_service: None,
        }
    }

    // -------------------------------------------------------------------------
    // Registration

    /// Registers a custom converter for `target`, optionally restricted
    /// to one property path.
    ///
    /// A later registration for the same type or path replaces the
    /// earlier one.
    pub fn register_converter(
        &mut self,
        target: TypeDescriptor,
        path: Option<&str>,
        handle: ConverterHandle,
    ) {
        match path {
            Some(path) => {
                let path = canonical_name(path);
                debug!(
                    "registered converter `{}` for property `{path}` of type `{}`",
                    handle.name(),
                    target.type_path()
                );
                self.custom_by_path.insert(
                    path,
                    PathEntry {
                        target: Some(target),
                        handle,
                    },
                );
            }
            None => {
                debug!(
                    "registered converter `{}` for type `{}`",
                    handle.name(),
                    target.type_path()
                );
                self.custom_by_type.insert(target.type_id(), handle);
            }
        }
        self.resolved.get_mut().clear();
    }

    /// Registers a custom converter for a property path, whatever its type.
    pub fn register_path_converter(&mut self, path: &str, handle: ConverterHandle) {
        let path = canonical_name(path);
        debug!("registered converter `{}` for property `{path}`", handle.name());
        self.custom_by_path.insert(
            path,
            PathEntry {
                target: None,
                handle,
            },
        );
        self.resolved.get_mut().clear();
    }

    /// Replaces the built-in default for `target`.
    ///
    /// The override is not a custom converter: a conversion service still
    /// runs before it.
    pub fn override_default(&mut self, target: TypeDescriptor, handle: ConverterHandle) {
        debug!(
            "overrode default converter of `{}` with `{}`",
            target.type_path(),
            handle.name()
        );
        self.overrides.insert(target.type_id(), handle);
    }

    /// Activates or deactivates the defaults, overrides included.
    #[inline]
    pub fn set_defaults_active(&mut self, active: bool) {
        self.defaults_active = active;
    }

    #[inline]
    pub fn defaults_active(&self) -> bool {
        self.defaults_active
    }

    pub fn set_conversion_service(&mut self, service: Option<Arc<dyn ConversionService>>) {
        self.conversion_service = service;
    }

    #[inline]
    pub fn conversion_service(&self) -> Option<&dyn ConversionService> {
        self.conversion_service.as_deref()
    }

    // -------------------------------------------------------------------------
    // Lookup

    /// The default converter for `target`: an override if present, else
    /// the built-in one.
    pub fn default_converter(&self, target: TypeDescriptor) -> Option<ConverterHandle> {
        if !self.defaults_active {
            return None;
        }
        match self.overrides.get(&target.type_id()) {
            Some(handle) => Some(handle.clone()),
            None => defaults::default_converter(target),
        }
    }

    /// Finds the custom converter for a value of type `target` written to
    /// `path`.
    pub fn find_custom(
        &self,
        target: Option<TypeDescriptor>,
        path: Option<&str>,
    ) -> Option<ConverterHandle> {
        if let Some(path) = path
            && !self.custom_by_path.is_empty()
        {
            let canonical = canonical_name(path);
            if let Some(handle) = self.path_converter(&canonical, target) {
                return Some(handle);
            }
            for variant in stripped_variants(&canonical) {
                if let Some(handle) = self.path_converter(&variant, target) {
                    return Some(handle);
                }
            }
        }
        self.type_converter(target?)
    }

    /// Whether elements of type `element` stored under `path` have a
    /// custom converter.
    pub fn has_custom_for_element(&self, element: Option<TypeDescriptor>, path: Option<&str>) -> bool {
        if let Some(path) = path {
            let canonical = canonical_name(path);
            let by_path = self.custom_by_path.iter().any(|(registered, entry)| {
                matches_property(registered, &canonical) && entry.accepts(element)
            });
            if by_path {
                return true;
            }
        }
        element.is_some_and(|element| self.custom_by_type.contains(&element.type_id()))
    }

    fn path_converter(&self, path: &str, target: Option<TypeDescriptor>) -> Option<ConverterHandle> {
        let entry = self.custom_by_path.get(path)?;
        entry.accepts(target).then(|| entry.handle.clone())
    }

    fn type_converter(&self, target: TypeDescriptor) -> Option<ConverterHandle> {
        if self.custom_by_type.is_empty() {
            return None;
        }
        if let Some(handle) = self.custom_by_type.get(&target.type_id()) {
            return Some(handle.clone());
        }
        if let Some(resolved) = self.resolved.borrow().get(&target.type_id()) {
            return resolved.clone();
        }

        let found = target
            .info()
            .ancestors()
            .into_iter()
            .find_map(|ancestor| self.custom_by_type.get(&ancestor.type_id()).cloned());
        self.resolved
            .borrow_mut()
            .insert(target.type_id(), found.clone());
        found
    }
}

impl fmt::Debug for EditorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorRegistry")
            .field("defaults_active", &self.defaults_active)
            .field("overrides", &self.overrides.len())
            .field("custom_by_type", &self.custom_by_type.len())
            .field("custom_by_path", &self.custom_by_path.keys().collect::<Vec<_>>())
            .field("conversion_service", &self.conversion_service.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use vc_bean::impl_reflect_value;
    use vc_bean::info::TypeDescriptor;

    use super::EditorRegistry;
    use crate::converter::ConverterHandle;

    #[derive(Debug, Clone, Default)]
    struct Animal;

    #[derive(Debug, Clone, Default)]
    struct Dog;

    #[derive(Debug, Clone, Default)]
    struct Puppy;

    impl_reflect_value!(Animal);
    impl_reflect_value!(Dog: Extends(Animal));
    impl_reflect_value!(Puppy: Extends(Dog));

    fn named(name: &'static str) -> ConverterHandle {
        ConverterHandle::from_fn(name, |value, _| Ok(value.reflect_clone()))
    }

    fn name_of(handle: Option<ConverterHandle>) -> Option<String> {
        handle.map(|h| h.name())
    }

    #[test]
    fn path_beats_type() {
        let mut registry = EditorRegistry::new();
        let string = TypeDescriptor::of::<String>();
        registry.register_converter(string, None, named("by-type"));
        registry.register_converter(string, Some("color"), named("by-path"));

        assert_eq!(name_of(registry.find_custom(Some(string), Some("color"))).as_deref(), Some("by-path"));
        assert_eq!(name_of(registry.find_custom(Some(string), Some("shade"))).as_deref(), Some("by-type"));
        assert_eq!(name_of(registry.find_custom(Some(string), None)).as_deref(), Some("by-type"));
    }

    #[test]
    fn stripped_and_canonical_paths() {
        let mut registry = EditorRegistry::new();
        registry.register_path_converter("items", named("items"));
        registry.register_path_converter("map['a.b']", named("quoted"));

        let found = registry.find_custom(Some(TypeDescriptor::of::<i32>()), Some("items[3]"));
        assert_eq!(name_of(found).as_deref(), Some("items"));
        let found = registry.find_custom(None, Some("map[a.b]"));
        assert_eq!(name_of(found).as_deref(), Some("quoted"));
        assert!(registry.find_custom(None, Some("other")).is_none());
    }

    #[test]
    fn typed_path_entries_require_related_types() {
        let mut registry = EditorRegistry::new();
        registry.register_converter(TypeDescriptor::of::<Dog>(), Some("pet"), named("dog"));
        registry.register_converter(TypeDescriptor::of::<Vec<i32>>(), Some("list"), named("list"));

        let pet = Some("pet");
        assert!(registry.find_custom(Some(TypeDescriptor::of::<Animal>()), pet).is_some());
        assert!(registry.find_custom(Some(TypeDescriptor::of::<Puppy>()), pet).is_some());
        assert!(registry.find_custom(Some(TypeDescriptor::of::<String>()), pet).is_none());
        assert!(registry.find_custom(None, pet).is_some());
        assert!(registry.find_custom(None, Some("list")).is_none());
    }

    #[test]
    fn supertype_lookup_is_nearest_first() {
        let mut registry = EditorRegistry::new();
        registry.register_converter(TypeDescriptor::of::<Animal>(), None, named("animal"));
        let puppy = Some(TypeDescriptor::of::<Puppy>());
        assert_eq!(name_of(registry.find_custom(puppy, None)).as_deref(), Some("animal"));

        registry.register_converter(TypeDescriptor::of::<Dog>(), None, named("dog"));
        assert_eq!(name_of(registry.find_custom(puppy, None)).as_deref(), Some("dog"));
    }

    #[test]
    fn defaults_and_overrides() {
        let mut registry = EditorRegistry::new();
        let int = TypeDescriptor::of::<i32>();
        assert!(registry.default_converter(int).is_some());
        assert!(registry.default_converter(TypeDescriptor::of::<String>()).is_none());

        registry.override_default(int, named("custom-int"));
        assert_eq!(name_of(registry.default_converter(int)).as_deref(), Some("custom-int"));
        assert!(registry.find_custom(Some(int), None).is_none());

        registry.set_defaults_active(false);
        assert!(registry.default_converter(int).is_none());
    }

    #[test]
    fn element_converters() {
        let mut registry = EditorRegistry::new();
        let int = Some(TypeDescriptor::of::<i32>());
        assert!(!registry.has_custom_for_element(int, Some("numbers")));

        registry.register_path_converter("numbers[0]", named("first"));
        assert!(registry.has_custom_for_element(int, Some("numbers")));
        assert!(!registry.has_custom_for_element(int, Some("others")));

        registry.register_converter(TypeDescriptor::of::<i32>(), None, named("int"));
        assert!(registry.has_custom_for_element(int, Some("others")));
        assert!(registry.has_custom_for_element(int, None));
    }
}
