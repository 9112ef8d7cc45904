//! Model "via" provider
//!
//! Lets a model adapt from the configuration resource of its adaptable
//! instead of the adaptable itself. Resolved resources are memoized in a
//! [`ViaProviderCache`] that lives exactly as long as one [`RequestScope`].

use crate::builder::ConfigurationResolver;
use crate::context::ResolutionContext;
use crate::detection::Request;
use crate::Result;
use caconfig_resource::{Resource, ResourcePath};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

/// Object a model is adapted from.
pub enum Adaptable<'a> {
    Request(&'a dyn Request),
    Resource(Resource),
    /// Anything that can provide a resource
    Other(Option<Resource>),
}

impl Adaptable<'_> {
    fn resource(&self) -> Option<Resource> {
        match self {
            Adaptable::Request(request) => request.resource(),
            Adaptable::Resource(resource) => Some(resource.clone()),
            Adaptable::Other(resource) => resource.clone(),
        }
    }
}

/// Outcome of [`CaConfigViaProvider::get_adaptable`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViaResult {
    /// Adapt from the original adaptable
    Original,
    /// Adapt from the configuration resource, if there is one
    Adapted(Option<Resource>),
}

/// Resolved configuration resources of one unit of work, keyed by content
/// path and configuration name.
#[derive(Debug, Default)]
pub struct ViaProviderCache {
    entries: RefCell<HashMap<(ResourcePath, String), Option<Resource>>>,
}

impl ViaProviderCache {
    pub fn contains(&self, path: &ResourcePath, config_name: &str) -> bool {
        self.entries
            .borrow()
            .contains_key(&(path.clone(), config_name.to_string()))
    }

    /// Cached lookup; the outer `None` is a cache miss.
    pub fn get(&self, path: &ResourcePath, config_name: &str) -> Option<Option<Resource>> {
        self.entries
            .borrow()
            .get(&(path.clone(), config_name.to_string()))
            .cloned()
    }

    pub fn put(&self, path: ResourcePath, config_name: impl Into<String>, resource: Option<Resource>) {
        self.entries
            .borrow_mut()
            .insert((path, config_name.into()), resource);
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// Owns the via cache of one unit of work. Dropping the scope discards the
/// cache, on success, error and panic alike.
#[derive(Debug, Default)]
pub struct RequestScope {
    cache: ViaProviderCache,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &ViaProviderCache {
        &self.cache
    }

    /// Run `chain` with a fresh cache.
    pub fn do_filter<R>(chain: impl FnOnce(&ViaProviderCache) -> R) -> R {
        let scope = Self::new();
        chain(scope.cache())
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        tracing::trace!(entries = self.cache.len(), "Discarding via provider cache");
    }
}

/// Resolves the configuration resource a model is adapted from.
#[derive(Debug)]
pub struct CaConfigViaProvider {
    resolver: Arc<ConfigurationResolver>,
}

impl CaConfigViaProvider {
    pub fn new(resolver: Arc<ConfigurationResolver>) -> Self {
        Self { resolver }
    }

    /// Configuration resource `config_name` of the adaptable's resource.
    ///
    /// A blank name or an adaptable without resource keeps the original.
    ///
    /// # Errors
    ///
    /// Returns an error if `config_name` is invalid.
    pub fn get_adaptable(
        &self,
        ctx: &ResolutionContext<'_>,
        cache: &ViaProviderCache,
        adaptable: &Adaptable<'_>,
        config_name: &str,
    ) -> Result<ViaResult> {
        let config_name = config_name.trim();
        let resource = match adaptable.resource() {
            Some(resource) if !config_name.is_empty() => resource,
            _ => return Ok(ViaResult::Original),
        };

        if let Some(cached) = cache.get(resource.path(), config_name) {
            return Ok(ViaResult::Adapted(cached));
        }
        let adapted = self
            .resolver
            .get(ctx, Some(&resource))
            .name(config_name)
            .as_resource()?;
        cache.put(resource.path().clone(), config_name, adapted.clone());
        Ok(ViaResult::Adapted(adapted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caconfig_resource::ValueMap;

    #[test]
    fn test_cache_keys_include_config_name() {
        let cache = ViaProviderCache::default();
        let path = ResourcePath::new("/content/page");
        let config = Resource::new("/conf/sling:configs/a", ValueMap::new());

        cache.put(path.clone(), "a", Some(config.clone()));
        cache.put(path.clone(), "b", None);

        assert!(Resource::ptr_eq(&cache.get(&path, "a").flatten().unwrap(), &config));
        assert_eq!(cache.get(&path, "b"), Some(None));
        assert_eq!(cache.get(&path, "c"), None);
        assert!(cache.contains(&path, "b"));
    }

    #[test]
    fn test_scope_discards_cache() {
        let path = ResourcePath::new("/content/page");
        let entries = RequestScope::do_filter(|cache| {
            cache.put(path.clone(), "a", None);
            cache.len()
        });
        assert_eq!(entries, 1);

        let fresh = RequestScope::do_filter(|cache| cache.contains(&path, "a"));
        assert!(!fresh);
    }
}
