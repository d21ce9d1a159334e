//! Static storage for [`TypeInfo`].
//!
//! A `static` declared inside a generic function is shared by every
//! instantiation, so generic types key their info by [`TypeId`] in a
//! [`GenericTypeInfoCell`]. Non-generic types use the lock-free
//! [`TypeInfoCell`].

use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use vc_utils::TypeIdMap;

use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// TypeInfoCell

/// Storage for the [`TypeInfo`] of a non-generic type.
pub struct TypeInfoCell(OnceLock<TypeInfo>);

impl TypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored info, initializing it with `f` on first access.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &TypeInfo
    where
        F: FnOnce() -> TypeInfo,
    {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericTypeInfoCell

/// Storage for the [`TypeInfo`] of every instantiation of a generic type.
///
/// ```
/// use vc_bean::info::{GenericTypeInfoCell, TypeInfo, Typed};
///
/// struct Wrapper<T>(T);
///
/// impl<T: Send + Sync + 'static> Typed for Wrapper<T> {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///         CELL.get_or_insert::<Self>(TypeInfo::value::<Self>)
///     }
/// }
///
/// assert_eq!(<Wrapper<u8>>::type_info().type_name(), "Wrapper<u8>");
/// assert_eq!(<Wrapper<bool>>::type_info().type_name(), "Wrapper<bool>");
/// ```
pub struct GenericTypeInfoCell(RwLock<TypeIdMap<&'static TypeInfo>>);

impl GenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the info stored for `G`, building it with `f` on first access.
    ///
    /// `f` runs without holding the lock. If two threads race, the first
    /// stored value wins and the other is dropped.
    #[inline]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> TypeInfo) -> &'static TypeInfo {
        let type_id = TypeId::of::<G>();
        match self.get_by_type_id(type_id) {
            Some(info) => info,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: TypeInfo) -> &'static TypeInfo {
        let mut map = self.0.write().unwrap_or_else(PoisonError::into_inner);
        *map.get_or_insert(type_id, move || Box::leak(Box::new(value)))
    }
}
