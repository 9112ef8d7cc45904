//! Resolution sessions and the per-session result cache

use caconfig_resource::{Resource, ResourcePath, ResourceResolver};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered configuration resources resolved for a collection.
///
/// Shared so a cached collection is handed out by identity.
pub type ResourceCollection = Arc<[Resource]>;

/// One resolution session over a resource tree.
///
/// Carries the tree collaborator and the session's result cache. The cache
/// uses interior mutability without locking, so a session is `!Sync` and
/// must stay on one thread; independent sessions never share cached
/// results.
pub struct ResolutionContext<'r> {
    resolver: &'r dyn ResourceResolver,
    cache: RefCell<ResolutionCache>,
}

impl<'r> ResolutionContext<'r> {
    pub fn new(resolver: &'r dyn ResourceResolver) -> Self {
        Self {
            resolver,
            cache: RefCell::new(ResolutionCache::default()),
        }
    }

    pub fn resolver(&self) -> &'r dyn ResourceResolver {
        self.resolver
    }

    /// Number of cached lookups in this session.
    pub fn cached_entries(&self) -> usize {
        self.cache.borrow().entries.len()
    }

    pub(crate) fn cached_resource(&self, key: &CacheKey) -> Option<Resource> {
        match self.cache.borrow().entries.get(key) {
            Some(CachedValue::Single(resource)) => Some(resource.clone()),
            _ => None,
        }
    }

    pub(crate) fn cached_collection(&self, key: &CacheKey) -> Option<ResourceCollection> {
        match self.cache.borrow().entries.get(key) {
            Some(CachedValue::Collection(collection)) => Some(Arc::clone(collection)),
            _ => None,
        }
    }

    pub(crate) fn cache_resource(&self, key: CacheKey, resource: Resource) {
        self.cache
            .borrow_mut()
            .entries
            .insert(key, CachedValue::Single(resource));
    }

    pub(crate) fn cache_collection(&self, key: CacheKey, collection: ResourceCollection) {
        self.cache
            .borrow_mut()
            .entries
            .insert(key, CachedValue::Collection(collection));
    }
}

impl std::fmt::Debug for ResolutionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("cached_entries", &self.cached_entries())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CacheKind {
    Single,
    Collection,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    kind: CacheKind,
    resource_path: ResourcePath,
    bucket_name: String,
    config_name: String,
}

impl CacheKey {
    pub(crate) fn new(
        kind: CacheKind,
        resource: &Resource,
        bucket_name: &str,
        config_name: &str,
    ) -> Self {
        Self {
            kind,
            resource_path: resource.path().clone(),
            bucket_name: bucket_name.to_string(),
            config_name: config_name.to_string(),
        }
    }
}

#[derive(Debug)]
enum CachedValue {
    Single(Resource),
    Collection(ResourceCollection),
}

#[derive(Debug, Default)]
struct ResolutionCache {
    entries: HashMap<CacheKey, CachedValue>,
}
