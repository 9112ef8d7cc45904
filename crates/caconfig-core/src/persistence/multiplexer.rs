use super::{
    ConfigurationCollectionPersistData, ConfigurationPersistData, ConfigurationPersistenceStrategy,
    LegacyConfigurationPersistenceStrategy, LegacyPersistenceAdapter,
};
use crate::Result;
use caconfig_meta::RankedServices;
use caconfig_resource::{Resource, ResourcePath, ResourceResolver, ValueMap};
use parking_lot::Mutex;
use std::sync::Arc;

/// Combines all bound persistence strategies in rank order.
///
/// Translations come from the first strategy that answers. Writes are
/// offered to each strategy in turn until one accepts; a strategy error
/// is returned as is.
#[derive(Default)]
pub struct ConfigurationPersistenceStrategyMultiplexer {
    strategies: RankedServices<dyn ConfigurationPersistenceStrategy>,
    /// Adapters created for legacy strategies, needed to unbind them
    legacy_adapters: Mutex<Vec<Arc<LegacyPersistenceAdapter>>>,
}

impl std::fmt::Debug for ConfigurationPersistenceStrategyMultiplexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationPersistenceStrategyMultiplexer")
            .field("strategies", &self.strategies)
            .finish()
    }
}

impl ConfigurationPersistenceStrategyMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, strategy: Arc<dyn ConfigurationPersistenceStrategy>, properties: &ValueMap) {
        self.strategies.bind(strategy, properties);
    }

    pub fn unbind(&self, strategy: &Arc<dyn ConfigurationPersistenceStrategy>) -> bool {
        self.strategies.unbind(strategy)
    }

    /// Bind a strategy written against the legacy contract.
    pub fn bind_legacy(
        &self,
        strategy: Arc<dyn LegacyConfigurationPersistenceStrategy>,
        properties: &ValueMap,
    ) {
        let adapter = Arc::new(LegacyPersistenceAdapter::new(strategy));
        self.legacy_adapters.lock().push(Arc::clone(&adapter));
        self.strategies.bind(adapter, properties);
    }

    pub fn unbind_legacy(&self, strategy: &Arc<dyn LegacyConfigurationPersistenceStrategy>) -> bool {
        let adapter = {
            let mut adapters = self.legacy_adapters.lock();
            let Some(index) = adapters.iter().position(|a| a.wraps(strategy)) else {
                return false;
            };
            adapters.remove(index)
        };
        let adapter: Arc<dyn ConfigurationPersistenceStrategy> = adapter;
        self.strategies.unbind(&adapter)
    }

    fn first<R>(&self, f: impl Fn(&dyn ConfigurationPersistenceStrategy) -> Option<R>) -> Option<R> {
        self.strategies
            .snapshot()
            .iter()
            .find_map(|strategy| f(strategy.as_ref()))
    }

    fn distinct(&self, f: impl Fn(&dyn ConfigurationPersistenceStrategy) -> Option<String>) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for strategy in self.strategies.snapshot().iter() {
            if let Some(name) = f(strategy.as_ref()) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    fn first_accepting(
        &self,
        f: impl Fn(&dyn ConfigurationPersistenceStrategy) -> Result<bool>,
    ) -> Result<bool> {
        for strategy in self.strategies.snapshot().iter() {
            if f(strategy.as_ref())? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Every distinct name a configuration may be stored under, rank order.
    pub fn all_config_names(&self, config_name: &str) -> Vec<String> {
        self.distinct(|s| s.config_name(config_name))
    }

    pub fn all_collection_parent_config_names(&self, config_name: &str) -> Vec<String> {
        self.distinct(|s| s.collection_parent_config_name(config_name))
    }

    pub fn all_collection_item_config_names(&self, config_name: &str) -> Vec<String> {
        self.distinct(|s| s.collection_item_config_name(config_name))
    }
}

impl ConfigurationPersistenceStrategy for ConfigurationPersistenceStrategyMultiplexer {
    fn resource(&self, resolver: &dyn ResourceResolver, resource: &Resource) -> Option<Resource> {
        self.first(|s| s.resource(resolver, resource))
    }

    fn collection_parent_resource(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
    ) -> Option<Resource> {
        self.first(|s| s.collection_parent_resource(resolver, resource))
    }

    fn collection_item_resource(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
    ) -> Option<Resource> {
        self.first(|s| s.collection_item_resource(resolver, resource))
    }

    fn resource_path(&self, path: &ResourcePath) -> Option<ResourcePath> {
        self.first(|s| s.resource_path(path))
    }

    fn collection_parent_path(&self, path: &ResourcePath) -> Option<ResourcePath> {
        self.first(|s| s.collection_parent_path(path))
    }

    fn collection_item_path(&self, path: &ResourcePath) -> Option<ResourcePath> {
        self.first(|s| s.collection_item_path(path))
    }

    fn config_name(&self, config_name: &str) -> Option<String> {
        self.first(|s| s.config_name(config_name))
    }

    fn collection_parent_config_name(&self, config_name: &str) -> Option<String> {
        self.first(|s| s.collection_parent_config_name(config_name))
    }

    fn collection_item_config_name(&self, config_name: &str) -> Option<String> {
        self.first(|s| s.collection_item_config_name(config_name))
    }

    fn persist_configuration(
        &self,
        resolver: &dyn ResourceResolver,
        config_resource_path: &ResourcePath,
        data: &ConfigurationPersistData,
    ) -> Result<bool> {
        self.first_accepting(|s| s.persist_configuration(resolver, config_resource_path, data))
    }

    fn persist_configuration_collection(
        &self,
        resolver: &dyn ResourceResolver,
        config_resource_collection_parent_path: &ResourcePath,
        data: &ConfigurationCollectionPersistData,
    ) -> Result<bool> {
        self.first_accepting(|s| {
            s.persist_configuration_collection(resolver, config_resource_collection_parent_path, data)
        })
    }

    fn delete_configuration(
        &self,
        resolver: &dyn ResourceResolver,
        config_resource_path: &ResourcePath,
    ) -> Result<bool> {
        self.first_accepting(|s| s.delete_configuration(resolver, config_resource_path))
    }
}
