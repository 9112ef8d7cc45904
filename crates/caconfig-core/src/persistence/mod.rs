//! Configuration persistence strategies
//!
//! A persistence strategy decides how a configuration is laid out in the
//! resource tree: which resource holds the properties of a configuration,
//! of a collection parent and of a collection item, and how configuration
//! names map to relative paths. Strategies written against the older,
//! single-resource contract are adapted once at registration time.

mod default;
mod multiplexer;

pub use default::DefaultConfigurationPersistenceStrategy;
pub use multiplexer::ConfigurationPersistenceStrategyMultiplexer;

use crate::Result;
use caconfig_resource::{Resource, ResourcePath, ResourceResolver, ValueMap};
use std::sync::Arc;

/// Data written for a single configuration or collection item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationPersistData {
    pub properties: ValueMap,
    /// Item name when this is part of a collection
    pub collection_item_name: Option<String>,
}

impl ConfigurationPersistData {
    pub fn new(properties: ValueMap) -> Self {
        Self {
            properties,
            collection_item_name: None,
        }
    }

    pub fn with_item_name(mut self, name: impl Into<String>) -> Self {
        self.collection_item_name = Some(name.into());
        self
    }
}

/// Data written for a whole configuration collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationCollectionPersistData {
    /// Items in their final order
    pub items: Vec<ConfigurationPersistData>,
    /// Properties of the collection parent, if any
    pub properties: Option<ValueMap>,
}

/// Persistence strategy contract.
///
/// Translations return `None` when the strategy is not responsible. Write
/// operations return `Ok(false)` to decline, letting the next strategy try.
pub trait ConfigurationPersistenceStrategy: Send + Sync {
    /// Resource holding the properties of a configuration resource.
    fn resource(&self, resolver: &dyn ResourceResolver, resource: &Resource) -> Option<Resource>;

    /// Resource holding the properties of a collection parent.
    fn collection_parent_resource(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
    ) -> Option<Resource>;

    /// Resource holding the properties of a collection item.
    fn collection_item_resource(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
    ) -> Option<Resource>;

    fn resource_path(&self, path: &ResourcePath) -> Option<ResourcePath>;

    fn collection_parent_path(&self, path: &ResourcePath) -> Option<ResourcePath>;

    fn collection_item_path(&self, path: &ResourcePath) -> Option<ResourcePath>;

    /// Relative name under which a configuration is stored.
    fn config_name(&self, config_name: &str) -> Option<String>;

    fn collection_parent_config_name(&self, config_name: &str) -> Option<String>;

    fn collection_item_config_name(&self, config_name: &str) -> Option<String>;

    fn persist_configuration(
        &self,
        resolver: &dyn ResourceResolver,
        config_resource_path: &ResourcePath,
        data: &ConfigurationPersistData,
    ) -> Result<bool>;

    fn persist_configuration_collection(
        &self,
        resolver: &dyn ResourceResolver,
        config_resource_collection_parent_path: &ResourcePath,
        data: &ConfigurationCollectionPersistData,
    ) -> Result<bool>;

    fn delete_configuration(
        &self,
        resolver: &dyn ResourceResolver,
        config_resource_path: &ResourcePath,
    ) -> Result<bool>;
}

/// Older persistence contract without collection-specific translations.
pub trait LegacyConfigurationPersistenceStrategy: Send + Sync {
    fn resource(&self, resolver: &dyn ResourceResolver, resource: &Resource) -> Option<Resource>;

    fn resource_path(&self, path: &ResourcePath) -> Option<ResourcePath>;

    fn persist_configuration(
        &self,
        resolver: &dyn ResourceResolver,
        config_resource_path: &ResourcePath,
        data: &ConfigurationPersistData,
    ) -> Result<bool>;

    fn persist_configuration_collection(
        &self,
        resolver: &dyn ResourceResolver,
        config_resource_collection_parent_path: &ResourcePath,
        data: &ConfigurationCollectionPersistData,
    ) -> Result<bool>;

    fn delete_configuration(
        &self,
        resolver: &dyn ResourceResolver,
        config_resource_path: &ResourcePath,
    ) -> Result<bool>;
}

/// Presents a legacy strategy through the full contract.
///
/// Collection parents are used as they are, collection items and config
/// names go through the legacy single-resource translation.
pub struct LegacyPersistenceAdapter {
    legacy: Arc<dyn LegacyConfigurationPersistenceStrategy>,
}

impl LegacyPersistenceAdapter {
    pub fn new(legacy: Arc<dyn LegacyConfigurationPersistenceStrategy>) -> Self {
        Self { legacy }
    }

    pub(crate) fn wraps(&self, legacy: &Arc<dyn LegacyConfigurationPersistenceStrategy>) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.legacy), Arc::as_ptr(legacy))
    }

    fn translate_name(&self, config_name: &str) -> Option<String> {
        self.legacy
            .resource_path(&ResourcePath::new(config_name))
            .map(|path| path.as_str().trim_start_matches('/').to_string())
    }
}

impl ConfigurationPersistenceStrategy for LegacyPersistenceAdapter {
    fn resource(&self, resolver: &dyn ResourceResolver, resource: &Resource) -> Option<Resource> {
        self.legacy.resource(resolver, resource)
    }

    fn collection_parent_resource(
        &self,
        _resolver: &dyn ResourceResolver,
        resource: &Resource,
    ) -> Option<Resource> {
        Some(resource.clone())
    }

    fn collection_item_resource(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
    ) -> Option<Resource> {
        self.legacy.resource(resolver, resource)
    }

    fn resource_path(&self, path: &ResourcePath) -> Option<ResourcePath> {
        self.legacy.resource_path(path)
    }

    fn collection_parent_path(&self, path: &ResourcePath) -> Option<ResourcePath> {
        Some(path.clone())
    }

    fn collection_item_path(&self, path: &ResourcePath) -> Option<ResourcePath> {
        self.legacy.resource_path(path)
    }

    fn config_name(&self, config_name: &str) -> Option<String> {
        self.translate_name(config_name)
    }

    fn collection_parent_config_name(&self, config_name: &str) -> Option<String> {
        Some(config_name.to_string())
    }

    fn collection_item_config_name(&self, config_name: &str) -> Option<String> {
        self.translate_name(config_name)
    }

    fn persist_configuration(
        &self,
        resolver: &dyn ResourceResolver,
        config_resource_path: &ResourcePath,
        data: &ConfigurationPersistData,
    ) -> Result<bool> {
        self.legacy
            .persist_configuration(resolver, config_resource_path, data)
    }

    fn persist_configuration_collection(
        &self,
        resolver: &dyn ResourceResolver,
        config_resource_collection_parent_path: &ResourcePath,
        data: &ConfigurationCollectionPersistData,
    ) -> Result<bool> {
        self.legacy.persist_configuration_collection(
            resolver,
            config_resource_collection_parent_path,
            data,
        )
    }

    fn delete_configuration(
        &self,
        resolver: &dyn ResourceResolver,
        config_resource_path: &ResourcePath,
    ) -> Result<bool> {
        self.legacy
            .delete_configuration(resolver, config_resource_path)
    }
}
