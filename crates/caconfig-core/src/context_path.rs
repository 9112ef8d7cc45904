//! Context path discovery
//!
//! A context resource is a content resource that declares where its
//! configuration lives. Strategies yield the context resources of a content
//! resource nearest first.

use crate::constants::ConfigProperty;
use caconfig_meta::RankedServices;
use caconfig_resource::{Resource, ResourcePath, ResourceResolver, ValueMap, ValueMapExt};
use std::sync::Arc;

/// A context resource paired with its configuration reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextResource {
    resource: Resource,
    config_ref: ResourcePath,
}

impl ContextResource {
    pub fn new(resource: Resource, config_ref: impl Into<ResourcePath>) -> Self {
        Self {
            resource,
            config_ref: config_ref.into(),
        }
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Absolute path of the configuration root referenced by the context.
    pub fn config_ref(&self) -> &ResourcePath {
        &self.config_ref
    }
}

/// Finds the context resources of a content resource.
pub trait ContextPathStrategy: Send + Sync {
    /// Context resources of `resource` (itself included), nearest first.
    fn find_context_resources<'a>(
        &self,
        resolver: &'a dyn ResourceResolver,
        resource: &Resource,
    ) -> Box<dyn Iterator<Item = ContextResource> + 'a>;
}

/// Walks the resource and its ancestors for `sling:configRef` markers.
///
/// Relative references are resolved below the configuration root path.
#[derive(Debug, Clone)]
pub struct DefaultContextPathStrategy {
    enabled: bool,
    config_path: ResourcePath,
}

impl DefaultContextPathStrategy {
    pub fn new(config_path: impl Into<ResourcePath>) -> Self {
        Self {
            enabled: true,
            config_path: config_path.into(),
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl ContextPathStrategy for DefaultContextPathStrategy {
    fn find_context_resources<'a>(
        &self,
        resolver: &'a dyn ResourceResolver,
        resource: &Resource,
    ) -> Box<dyn Iterator<Item = ContextResource> + 'a> {
        if !self.enabled {
            return Box::new(std::iter::empty());
        }

        let config_path = self.config_path.clone();
        let start = resource.clone();
        let ancestors = std::iter::successors(Some(start), move |current| resolver.parent(current));
        Box::new(ancestors.filter_map(move |candidate| {
            let config_ref = candidate
                .value_map()
                .get_str(ConfigProperty::ConfigRef.as_str())
                .map(str::trim)
                .filter(|config_ref| !config_ref.is_empty())?;
            let config_ref = if config_ref.starts_with('/') {
                ResourcePath::new(config_ref)
            } else {
                config_path.join(config_ref)
            };
            tracing::trace!(context = %candidate.path(), config_ref = %config_ref, "Found context resource");
            Some(ContextResource::new(candidate, config_ref))
        }))
    }
}

/// Delegates to the highest ranked strategy that finds any context resource.
#[derive(Debug, Default)]
pub struct ContextPathStrategyMultiplexer {
    strategies: RankedServices<dyn ContextPathStrategy>,
}

impl ContextPathStrategyMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, strategy: Arc<dyn ContextPathStrategy>, properties: &ValueMap) {
        self.strategies.bind(strategy, properties);
    }

    pub fn unbind(&self, strategy: &Arc<dyn ContextPathStrategy>) -> bool {
        self.strategies.unbind(strategy)
    }
}

impl ContextPathStrategy for ContextPathStrategyMultiplexer {
    fn find_context_resources<'a>(
        &self,
        resolver: &'a dyn ResourceResolver,
        resource: &Resource,
    ) -> Box<dyn Iterator<Item = ContextResource> + 'a> {
        for strategy in self.strategies.snapshot().iter() {
            let mut found = strategy.find_context_resources(resolver, resource).peekable();
            if found.peek().is_some() {
                return Box::new(found);
            }
        }
        Box::new(std::iter::empty())
    }
}
