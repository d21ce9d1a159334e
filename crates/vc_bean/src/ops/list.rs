use crate::Reflect;
use crate::info::TypeDescriptor;
use crate::ops::MismatchedType;

/// A growable, index-addressed sequence.
///
/// Implemented for `Vec<T>` and `VecDeque<T>`.
pub trait List: Reflect {
    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a value of the element type.
    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), MismatchedType>;

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_>;

    fn element_type(&self) -> TypeDescriptor;
}
