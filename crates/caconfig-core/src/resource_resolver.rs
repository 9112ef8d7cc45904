//! Configuration resource lookup entry point

use crate::context::{CacheKey, CacheKind, ResolutionContext, ResourceCollection};
use crate::context_path::ContextPathStrategy;
use crate::resolving::ConfigurationResourceResolvingStrategy;
use crate::Result;
use caconfig_meta::ensure_valid_config_name;
use caconfig_resource::{Resource, ResourcePath};
use std::sync::Arc;

/// Resolves raw configuration resources for content resources.
///
/// Results are memoized in the [`ResolutionContext`] when caching is
/// enabled.
pub struct ConfigurationResourceResolver {
    context_paths: Arc<dyn ContextPathStrategy>,
    resolving: Arc<dyn ConfigurationResourceResolvingStrategy>,
    enable_caching: bool,
}

impl std::fmt::Debug for ConfigurationResourceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationResourceResolver")
            .field("enable_caching", &self.enable_caching)
            .finish_non_exhaustive()
    }
}

impl ConfigurationResourceResolver {
    pub fn new(
        context_paths: Arc<dyn ContextPathStrategy>,
        resolving: Arc<dyn ConfigurationResourceResolvingStrategy>,
    ) -> Self {
        Self {
            context_paths,
            resolving,
            enable_caching: false,
        }
    }

    pub fn with_caching(mut self, enable_caching: bool) -> Self {
        tracing::debug!(enable_caching, "Configuration resource caching");
        self.enable_caching = enable_caching;
        self
    }

    /// Configuration resource for `config_name` in `bucket_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config_name` is invalid; the resource tree is
    /// not touched in that case.
    pub fn get_resource(
        &self,
        ctx: &ResolutionContext<'_>,
        resource: &Resource,
        bucket_name: &str,
        config_name: &str,
    ) -> Result<Option<Resource>> {
        ensure_valid_config_name(config_name)?;

        let key = CacheKey::new(CacheKind::Single, resource, bucket_name, config_name);
        if self.enable_caching {
            if let Some(cached) = ctx.cached_resource(&key) {
                tracing::trace!(resource = %resource.path(), bucket_name, config_name, "get_resource (cached)");
                return Ok(Some(cached));
            }
        }

        let result =
            self.resolving
                .get_resource(ctx.resolver(), resource, &[bucket_name], config_name);
        tracing::trace!(resource = %resource.path(), bucket_name, config_name, found = result.is_some(), "get_resource (resolved)");
        if self.enable_caching {
            if let Some(found) = &result {
                ctx.cache_resource(key, found.clone());
            }
        }
        Ok(result)
    }

    /// Configuration collection for `config_name` in `bucket_name`; empty if
    /// nothing is found.
    ///
    /// # Errors
    ///
    /// Returns an error if `config_name` is invalid.
    pub fn get_resource_collection(
        &self,
        ctx: &ResolutionContext<'_>,
        resource: &Resource,
        bucket_name: &str,
        config_name: &str,
    ) -> Result<ResourceCollection> {
        ensure_valid_config_name(config_name)?;

        let key = CacheKey::new(CacheKind::Collection, resource, bucket_name, config_name);
        if self.enable_caching {
            if let Some(cached) = ctx.cached_collection(&key) {
                tracing::trace!(resource = %resource.path(), bucket_name, config_name, "get_resource_collection (cached)");
                return Ok(cached);
            }
        }

        let result: ResourceCollection = self
            .resolving
            .get_resource_collection(ctx.resolver(), resource, &[bucket_name], config_name)
            .unwrap_or_default()
            .into();
        tracing::trace!(resource = %resource.path(), bucket_name, config_name, items = result.len(), "get_resource_collection (resolved)");
        if self.enable_caching {
            ctx.cache_collection(key, Arc::clone(&result));
        }
        Ok(result)
    }

    /// Path of the nearest context resource.
    pub fn get_context_path(
        &self,
        ctx: &ResolutionContext<'_>,
        resource: &Resource,
    ) -> Option<ResourcePath> {
        tracing::trace!(resource = %resource.path(), "get_context_path");
        self.context_paths
            .find_context_resources(ctx.resolver(), resource)
            .next()
            .map(|context| context.resource().path().clone())
    }

    /// Paths of all context resources, nearest first.
    pub fn get_all_context_paths(
        &self,
        ctx: &ResolutionContext<'_>,
        resource: &Resource,
    ) -> Vec<ResourcePath> {
        tracing::trace!(resource = %resource.path(), "get_all_context_paths");
        self.context_paths
            .find_context_resources(ctx.resolver(), resource)
            .map(|context| context.resource().path().clone())
            .collect()
    }

    pub(crate) fn context_paths(&self) -> &Arc<dyn ContextPathStrategy> {
        &self.context_paths
    }

    pub(crate) fn resolving(&self) -> &Arc<dyn ConfigurationResourceResolvingStrategy> {
        &self.resolving
    }
}
