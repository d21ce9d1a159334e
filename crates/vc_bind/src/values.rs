use core::fmt;

use vc_bean::Reflect;

// -----------------------------------------------------------------------------
// PropertyValue

/// One path and the value to assign to it.
pub struct PropertyValue {
    path: String,
    value: Box<dyn Reflect>,
    optional: bool,
}

impl PropertyValue {
    pub fn new(path: impl Into<String>, value: impl Reflect) -> Self {
        Self::from_boxed(path, Box::new(value))
    }

    pub fn from_boxed(path: impl Into<String>, value: Box<dyn Reflect>) -> Self {
        Self {
            path: path.into(),
            value,
            optional: false,
        }
    }

    /// Marks the value as optional: batch assignment skips it when the
    /// path is unknown or cannot be used.
    #[inline]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn value(&self) -> &dyn Reflect {
        &*self.value
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    #[inline]
    pub(crate) fn into_parts(self) -> (String, Box<dyn Reflect>, bool) {
        (self.path, self.value, self.optional)
    }
}

impl fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyValue")
            .field("path", &self.path)
            .field("value", &self.value)
            .field("optional", &self.optional)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// PropertyValues

/// An ordered batch of [`PropertyValue`]s.
///
/// ```
/// use vc_bind::PropertyValues;
///
/// let values = PropertyValues::new()
///     .with("name", String::from("Bob"))
///     .with("age", String::from("42"));
/// assert_eq!(values.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct PropertyValues {
    values: Vec<PropertyValue>,
}

impl PropertyValues {
    #[inline]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Appends `value` for `path`.
    pub fn with(mut self, path: impl Into<String>, value: impl Reflect) -> Self {
        self.values.push(PropertyValue::new(path, value));
        self
    }

    #[inline]
    pub fn push(&mut self, value: PropertyValue) {
        self.values.push(value);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyValue> {
        self.values.iter()
    }
}

impl FromIterator<PropertyValue> for PropertyValues {
    fn from_iter<I: IntoIterator<Item = PropertyValue>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Extend<PropertyValue> for PropertyValues {
    fn extend<I: IntoIterator<Item = PropertyValue>>(&mut self, iter: I) {
        self.values.extend(iter);
    }
}

impl IntoIterator for PropertyValues {
    type Item = PropertyValue;
    type IntoIter = std::vec::IntoIter<PropertyValue>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
