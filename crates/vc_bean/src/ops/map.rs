use crate::Reflect;
use crate::info::TypeDescriptor;
use crate::ops::MismatchedType;

/// A key to value mapping.
///
/// Lookups with a key of the wrong type find nothing.
pub trait Map: Reflect {
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &dyn Reflect) -> Option<&dyn Reflect>;

    fn get_mut(&mut self, key: &dyn Reflect) -> Option<&mut dyn Reflect>;

    /// Inserts or replaces an entry.
    fn insert(&mut self, key: Box<dyn Reflect>, value: Box<dyn Reflect>) -> Result<(), MismatchedType>;

    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_>;

    fn key_type(&self) -> TypeDescriptor;

    fn value_type(&self) -> TypeDescriptor;
}
