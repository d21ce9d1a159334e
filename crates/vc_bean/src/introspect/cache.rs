use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, trace};
use vc_utils::TypeIdMap;

use crate::info::TypeDescriptor;
use crate::introspect::{IntrospectionError, IntrospectionRecord};

// -----------------------------------------------------------------------------
// ScopeId

/// Identifies a group of cache entries that can be evicted together,
/// typically the types of one plugin or class-loading unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u64);

impl ScopeId {
    /// Returns a scope id that was never returned before.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

// -----------------------------------------------------------------------------
// IntrospectionCache

static GLOBAL_CACHE: IntrospectionCache = IntrospectionCache::new();

/// Build-once storage of [`IntrospectionRecord`]s, keyed by type.
///
/// Records are built outside the lock. When two threads race on the same
/// type, both build and the first insert wins, so every caller observes
/// the same record. Failed builds are not cached.
pub struct IntrospectionCache {
    records: RwLock<TypeIdMap<Arc<IntrospectionRecord>>>,
}

impl Default for IntrospectionCache {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl IntrospectionCache {
    pub const fn new() -> Self {
        Self {
            records: RwLock::new(TypeIdMap::new()),
        }
    }

    /// The process-wide cache.
    #[inline]
    pub fn global() -> &'static IntrospectionCache {
        &GLOBAL_CACHE
    }

    /// Returns the record of `ty`, building it on first use.
    #[inline]
    pub fn for_type(&self, ty: TypeDescriptor) -> Result<Arc<IntrospectionRecord>, IntrospectionError> {
        self.for_type_in(ty, None)
    }

    /// Like [`for_type`](Self::for_type), tagging a newly built record
    /// with `scope`.
    ///
    /// A record that is already cached keeps its original scope.
    pub fn for_type_in(
        &self,
        ty: TypeDescriptor,
        scope: Option<ScopeId>,
    ) -> Result<Arc<IntrospectionRecord>, IntrospectionError> {
        if let Some(record) = self.get(ty) {
            return Ok(record);
        }

        let info = ty.info();
        let Some(bean) = info.as_bean() else {
            return Err(IntrospectionError::NotABean(info.type_path()));
        };
        let record = Arc::new(bean.build()?.with_scope(scope));
        debug!(
            "introspected `{}`: {} properties",
            ty.type_path(),
            record.len()
        );

        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(records.get_or_insert(ty.type_id(), move || record)))
    }

    /// Returns the cached record of `ty` without building it.
    pub fn get(&self, ty: TypeDescriptor) -> Option<Arc<IntrospectionRecord>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.get(&ty.type_id()).cloned()
    }

    pub fn contains(&self, ty: TypeDescriptor) -> bool {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.contains(&ty.type_id())
    }

    pub fn len(&self) -> usize {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes the record of `ty`. Returns whether it was cached.
    pub fn evict(&self, ty: TypeDescriptor) -> bool {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.remove(&ty.type_id()).is_some()
    }

    /// Removes every record built under `scope`, returning how many were removed.
    ///
    /// Outstanding `Arc`s stay valid.
    pub fn evict_scope(&self, scope: ScopeId) -> usize {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let before = records.len();
        records.retain(|_, record| record.scope() != Some(scope));
        let evicted = before - records.len();
        trace!("evicted {evicted} introspection records of scope {}", scope.get());
        evicted
    }

    pub fn clear(&self) {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.clear();
    }
}

// -----------------------------------------------------------------------------
// Tests
