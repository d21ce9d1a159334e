use crate::Reflect;
use crate::info::TypeDescriptor;
use crate::ops::MismatchedType;

/// An unordered collection of unique values.
///
/// Sets have no stable positions. Positional reads follow iteration order,
/// positional writes are rejected by the navigator.
pub trait Set: Reflect {
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, value: &dyn Reflect) -> bool;

    /// Inserts a value, returning whether it was newly added.
    fn insert(&mut self, value: Box<dyn Reflect>) -> Result<bool, MismatchedType>;

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_>;

    fn element_type(&self) -> TypeDescriptor;
}
