use super::{ConfigurationResourceResolvingStrategy, ResourceChain};
use caconfig_meta::RankedServices;
use caconfig_resource::{Resource, ResourcePath, ResourceResolver, ValueMap};
use std::sync::Arc;

/// Asks the bound resolving strategies in rank order; the first strategy
/// that is responsible answers.
#[derive(Debug, Default)]
pub struct ConfigurationResourceResolvingStrategyMultiplexer {
    strategies: RankedServices<dyn ConfigurationResourceResolvingStrategy>,
}

impl ConfigurationResourceResolvingStrategyMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(
        &self,
        strategy: Arc<dyn ConfigurationResourceResolvingStrategy>,
        properties: &ValueMap,
    ) {
        self.strategies.bind(strategy, properties);
    }

    pub fn unbind(&self, strategy: &Arc<dyn ConfigurationResourceResolvingStrategy>) -> bool {
        self.strategies.unbind(strategy)
    }
}

impl ConfigurationResourceResolvingStrategy for ConfigurationResourceResolvingStrategyMultiplexer {
    fn get_resource(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
        bucket_names: &[&str],
        config_name: &str,
    ) -> Option<Resource> {
        self.strategies
            .snapshot()
            .iter()
            .find_map(|s| s.get_resource(resolver, resource, bucket_names, config_name))
    }

    fn get_resource_collection(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
        bucket_names: &[&str],
        config_name: &str,
    ) -> Option<Vec<Resource>> {
        self.strategies
            .snapshot()
            .iter()
            .find_map(|s| s.get_resource_collection(resolver, resource, bucket_names, config_name))
    }

    fn get_resource_inheritance_chain<'a>(
        &self,
        resolver: &'a dyn ResourceResolver,
        resource: &Resource,
        bucket_names: &[&str],
        config_name: &str,
    ) -> Option<ResourceChain<'a>> {
        self.strategies.snapshot().iter().find_map(|s| {
            s.get_resource_inheritance_chain(resolver, resource, bucket_names, config_name)
        })
    }

    fn get_resource_collection_inheritance_chain(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
        bucket_names: &[&str],
        config_name: &str,
    ) -> Option<Vec<Vec<Resource>>> {
        self.strategies.snapshot().iter().find_map(|s| {
            s.get_resource_collection_inheritance_chain(resolver, resource, bucket_names, config_name)
        })
    }

    fn get_resource_path(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
        bucket_name: &str,
        config_name: &str,
    ) -> Option<ResourcePath> {
        self.strategies
            .snapshot()
            .iter()
            .find_map(|s| s.get_resource_path(resolver, resource, bucket_name, config_name))
    }

    fn get_resource_collection_parent_path(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
        bucket_name: &str,
        config_name: &str,
    ) -> Option<ResourcePath> {
        self.strategies.snapshot().iter().find_map(|s| {
            s.get_resource_collection_parent_path(resolver, resource, bucket_name, config_name)
        })
    }
}
