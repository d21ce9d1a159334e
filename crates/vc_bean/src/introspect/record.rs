use core::fmt;

use vc_utils::hash::HashMap;

use crate::info::TypeDescriptor;
use crate::introspect::{AccessorDescriptor, Bean, BeanBuilder, IntrospectionError, ScopeId};

// -----------------------------------------------------------------------------
// IntrospectionRecord

/// The accessor table of one bean type.
///
/// Immutable once built. Property order follows the order of declaration.
pub struct IntrospectionRecord {
    ty: TypeDescriptor,
    properties: Box<[AccessorDescriptor]>,
    index: HashMap<&'static str, usize>,
    scope: Option<ScopeId>,
}

impl IntrospectionRecord {
    /// Runs `T::describe` and validates the declared properties.
    pub(crate) fn build<T: Bean>() -> Result<Self, IntrospectionError> {
        let mut builder = BeanBuilder::<T>::new();
        T::describe(&mut builder);
        Self::from_properties(TypeDescriptor::of::<T>(), builder.into_properties())
    }

    fn from_properties(
        ty: TypeDescriptor,
        properties: Vec<AccessorDescriptor>,
    ) -> Result<Self, IntrospectionError> {
        if properties.is_empty() {
            return Err(IntrospectionError::NoProperties(ty.type_path()));
        }

        let mut index: HashMap<&'static str, usize> = HashMap::default();
        for (position, property) in properties.iter().enumerate() {
            if index.insert(property.name(), position).is_some() {
                return Err(IntrospectionError::DuplicateProperty {
                    type_path: ty.type_path(),
                    name: property.name(),
                });
            }
        }

        Ok(Self {
            ty,
            properties: properties.into_boxed_slice(),
            index,
            scope: None,
        })
    }

    #[inline]
    pub(crate) fn with_scope(mut self, scope: Option<ScopeId>) -> Self {
        self.scope = scope;
        self
    }

    /// The bean type.
    #[inline]
    pub fn ty(&self) -> TypeDescriptor {
        self.ty
    }

    /// The scope the record was cached under, if any.
    #[inline]
    pub fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    #[inline]
    pub fn properties(&self) -> &[AccessorDescriptor] {
        &self.properties
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &AccessorDescriptor> {
        self.properties.iter()
    }

    pub fn names(&self) -> impl ExactSizeIterator<Item = &'static str> + '_ {
        self.properties.iter().map(AccessorDescriptor::name)
    }

    /// Looks up a property by its exact name.
    pub fn get_exact(&self, name: &str) -> Option<&AccessorDescriptor> {
        self.index.get(name).map(|&position| &self.properties[position])
    }

    /// Looks up a property by name.
    ///
    /// Falls back to the name with the case of its first character flipped,
    /// so `Name` finds `name` and `uRL` finds `URL`.
    pub fn get(&self, name: &str) -> Option<&AccessorDescriptor> {
        if let Some(property) = self.get_exact(name) {
            return Some(property);
        }
        let flipped = flip_first_char(name)?;
        self.get_exact(&flipped)
    }
}

impl fmt::Debug for IntrospectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntrospectionRecord")
            .field("ty", &self.ty)
            .field("scope", &self.scope)
            .field("properties", &self.properties)
            .finish()
    }
}

fn flip_first_char(name: &str) -> Option<String> {
    let mut chars = name.chars();
    let first = chars.next()?;
    let flipped: String = if first.is_uppercase() {
        first.to_lowercase().collect()
    } else if first.is_lowercase() {
        first.to_uppercase().collect()
    } else {
        return None;
    };
    Some(flipped + chars.as_str())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::impl_reflect_bean;
    use crate::info::{TypeDescriptor, TypeKind};
    use crate::introspect::{AccessFlags, Bean, BeanBuilder, IntrospectionError, IntrospectionRecord};

    #[derive(Debug, Clone, Default)]
    struct Gadget {
        label: String,
        weight: f64,
        serial: u64,
        tags: Vec<String>,
        owner: Option<String>,
        #[allow(dead_code)]
        secret: String,
    }

    impl Bean for Gadget {
        fn describe(bean: &mut BeanBuilder<Self>) {
            bean.field("label", |g| &g.label, |g| &mut g.label)
                .property("weight", |g| &g.weight, |g, weight: f64| {
                    if weight < 0.0 {
                        return Err(String::from("weight must not be negative"));
                    }
                    g.weight = weight;
                    Ok(())
                })
                .read_only("serial", |g| &g.serial)
                .field("tags", |g| &g.tags, |g| &mut g.tags)
                .option_field("owner", |g| &g.owner, |g| &mut g.owner)
                .write_only("secret", |g, secret: String| {
                    g.secret = secret;
                    Ok(())
                });
        }
    }

    impl_reflect_bean!(Gadget: Default);

    #[derive(Debug, Clone, Default)]
    struct Twice {
        a: i32,
    }

    impl Bean for Twice {
        fn describe(bean: &mut BeanBuilder<Self>) {
            bean.field("a", |t| &t.a, |t| &mut t.a)
                .read_only("a", |t| &t.a);
        }
    }

    impl_reflect_bean!(Twice);

    #[derive(Debug, Clone, Default)]
    struct Hollow;

    impl Bean for Hollow {
        fn describe(_: &mut BeanBuilder<Self>) {}
    }

    impl_reflect_bean!(Hollow);

    #[test]
    fn flags_follow_declaration() {
        let record = IntrospectionRecord::build::<Gadget>().unwrap();
        let flags = |name: &str| record.get(name).unwrap().flags();

        assert_eq!(
            flags("label"),
            AccessFlags::READABLE | AccessFlags::WRITABLE | AccessFlags::NAVIGABLE
        );
        assert_eq!(flags("weight"), AccessFlags::READABLE | AccessFlags::WRITABLE);
        assert_eq!(flags("serial"), AccessFlags::READABLE);
        assert!(flags("owner").contains(AccessFlags::NULLABLE));
        assert_eq!(flags("secret"), AccessFlags::WRITABLE);
    }

    #[test]
    fn declared_types() {
        let record = IntrospectionRecord::build::<Gadget>().unwrap();
        let tags = record.get("tags").unwrap();
        assert_eq!(tags.declared_type(), TypeDescriptor::of::<Vec<String>>());
        assert_eq!(tags.element_type(), Some(TypeDescriptor::of::<String>()));
        assert_eq!(tags.declared_type().kind(), TypeKind::List);

        let owner = record.get("owner").unwrap();
        assert_eq!(owner.declared_type(), TypeDescriptor::of::<String>());
    }

    #[test]
    fn read_and_write_through_accessors() {
        let record = IntrospectionRecord::build::<Gadget>().unwrap();
        let mut gadget = Gadget::default();

        let label = record.get("label").unwrap();
        label.set(&mut gadget, Box::new(String::from("lamp"))).unwrap();
        let value = label.get(&gadget).unwrap().unwrap();
        assert_eq!(value.downcast_ref::<String>().unwrap(), "lamp");

        let owner = record.get("owner").unwrap();
        assert!(owner.get(&gadget).unwrap().is_none());
        owner.set(&mut gadget, Box::new(String::from("ada"))).unwrap();
        assert_eq!(gadget.owner.as_deref(), Some("ada"));

        let weight = record.get("weight").unwrap();
        let err = weight.set(&mut gadget, Box::new(-1.0_f64)).unwrap_err();
        assert!(matches!(err, crate::introspect::AccessorError::Failed(_)));
        assert!(weight.get_mut(&mut gadget).is_err());
    }

    #[test]
    fn wrong_value_type_is_reported() {
        let record = IntrospectionRecord::build::<Gadget>().unwrap();
        let mut gadget = Gadget::default();
        let err = record
            .get("label")
            .unwrap()
            .set(&mut gadget, Box::new(3_u8))
            .unwrap_err();
        assert!(matches!(err, crate::introspect::AccessorError::Value { .. }));
    }

    #[test]
    fn case_fallback_lookup() {
        let record = IntrospectionRecord::build::<Gadget>().unwrap();
        assert!(record.get_exact("Label").is_none());
        assert_eq!(record.get("Label").unwrap().name(), "label");
        assert!(record.get("LABEL").is_none());
        assert!(record.get("").is_none());
    }

    #[test]
    fn rebuilding_is_deterministic() {
        let first = IntrospectionRecord::build::<Gadget>().unwrap();
        let second = IntrospectionRecord::build::<Gadget>().unwrap();
        let summary = |record: &IntrospectionRecord| {
            record
                .iter()
                .map(|p| (p.name(), p.flags(), p.declared_type()))
                .collect::<Vec<_>>()
        };
        assert_eq!(summary(&first), summary(&second));
        assert_eq!(
            first.names().collect::<Vec<_>>(),
            ["label", "weight", "serial", "tags", "owner", "secret"]
        );
    }

    #[test]
    fn invalid_declarations() {
        assert!(matches!(
            IntrospectionRecord::build::<Twice>(),
            Err(IntrospectionError::DuplicateProperty { name: "a", .. })
        ));
        assert!(matches!(
            IntrospectionRecord::build::<Hollow>(),
            Err(IntrospectionError::NoProperties(_))
        ));
    }
}
