//! Default persistence: configurations are stored directly in the resource
//! named after them.

use super::{
    ConfigurationCollectionPersistData, ConfigurationPersistData, ConfigurationPersistenceStrategy,
};
use crate::{Error, Result};
use caconfig_meta::ManagementSettings;
use caconfig_resource::{Resource, ResourcePath, ResourceResolver, ValueMap};
use std::sync::Arc;

/// Identity translations, direct property writes.
///
/// Writes keep the ignored properties already present on a resource and
/// never write ignored properties from the submitted data.
#[derive(Debug, Clone)]
pub struct DefaultConfigurationPersistenceStrategy {
    enabled: bool,
    management: Arc<ManagementSettings>,
}

impl DefaultConfigurationPersistenceStrategy {
    /// Ranking the default strategy is registered with.
    pub const RANKING: i64 = i64::MIN;

    pub fn new(management: Arc<ManagementSettings>) -> Self {
        Self {
            enabled: true,
            management,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    fn replace_properties(
        &self,
        resolver: &dyn ResourceResolver,
        path: &ResourcePath,
        properties: &ValueMap,
    ) -> Result<Resource> {
        let mut merged: ValueMap = resolver
            .get_resource(path)
            .map(|existing| {
                existing
                    .value_map()
                    .iter()
                    .filter(|(name, _)| self.management.is_ignored(name))
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        for (name, value) in properties {
            if !self.management.is_ignored(name) {
                merged.insert(name.clone(), value.clone());
            }
        }
        Ok(resolver.create_or_update(path, merged)?)
    }
}

impl ConfigurationPersistenceStrategy for DefaultConfigurationPersistenceStrategy {
    fn resource(&self, _resolver: &dyn ResourceResolver, resource: &Resource) -> Option<Resource> {
        self.enabled.then(|| resource.clone())
    }

    fn collection_parent_resource(
        &self,
        _resolver: &dyn ResourceResolver,
        resource: &Resource,
    ) -> Option<Resource> {
        self.enabled.then(|| resource.clone())
    }

    fn collection_item_resource(
        &self,
        _resolver: &dyn ResourceResolver,
        resource: &Resource,
    ) -> Option<Resource> {
        self.enabled.then(|| resource.clone())
    }

    fn resource_path(&self, path: &ResourcePath) -> Option<ResourcePath> {
        self.enabled.then(|| path.clone())
    }

    fn collection_parent_path(&self, path: &ResourcePath) -> Option<ResourcePath> {
        self.enabled.then(|| path.clone())
    }

    fn collection_item_path(&self, path: &ResourcePath) -> Option<ResourcePath> {
        self.enabled.then(|| path.clone())
    }

    fn config_name(&self, config_name: &str) -> Option<String> {
        self.enabled.then(|| config_name.to_string())
    }

    fn collection_parent_config_name(&self, config_name: &str) -> Option<String> {
        self.enabled.then(|| config_name.to_string())
    }

    fn collection_item_config_name(&self, config_name: &str) -> Option<String> {
        self.enabled.then(|| config_name.to_string())
    }

    fn persist_configuration(
        &self,
        resolver: &dyn ResourceResolver,
        config_resource_path: &ResourcePath,
        data: &ConfigurationPersistData,
    ) -> Result<bool> {
        if !self.enabled {
            return Ok(false);
        }
        self.replace_properties(resolver, config_resource_path, &data.properties)?;
        tracing::debug!(path = %config_resource_path, "Persisted configuration");
        Ok(true)
    }

    fn persist_configuration_collection(
        &self,
        resolver: &dyn ResourceResolver,
        config_resource_collection_parent_path: &ResourcePath,
        data: &ConfigurationCollectionPersistData,
    ) -> Result<bool> {
        if !self.enabled {
            return Ok(false);
        }

        let mut items = Vec::with_capacity(data.items.len());
        for (index, item) in data.items.iter().enumerate() {
            match item.collection_item_name.as_deref() {
                Some(name) if name.trim().is_empty() => {
                    return Err(Error::MissingCollectionItemName { index });
                }
                Some(name) if !is_single_segment(name) => {
                    return Err(Error::InvalidCollectionItemName {
                        index,
                        name: name.to_string(),
                    });
                }
                Some(name) => items.push((name, item)),
                None => return Err(Error::MissingCollectionItemName { index }),
            }
        }

        let parent_properties = data.properties.clone().unwrap_or_default();
        let parent = self.replace_properties(
            resolver,
            config_resource_collection_parent_path,
            &parent_properties,
        )?;

        // The properties resources of the parent survive, all items are rewritten
        let keep = self.management.config_collection_properties_resource_names();
        for child in resolver.children(&parent) {
            if !keep.iter().any(|name| name == child.name()) {
                resolver.delete(child.path())?;
            }
        }
        for (name, item) in items {
            let item_path = config_resource_collection_parent_path.join(name);
            self.replace_properties(resolver, &item_path, &item.properties)?;
        }

        tracing::debug!(
            path = %config_resource_collection_parent_path,
            items = data.items.len(),
            "Persisted configuration collection"
        );
        Ok(true)
    }

    fn delete_configuration(
        &self,
        resolver: &dyn ResourceResolver,
        config_resource_path: &ResourcePath,
    ) -> Result<bool> {
        if !self.enabled {
            return Ok(false);
        }
        let existed = resolver.delete(config_resource_path)?;
        tracing::debug!(path = %config_resource_path, existed, "Deleted configuration");
        Ok(true)
    }
}

/// Item names must stay directly below the collection parent.
fn is_single_segment(name: &str) -> bool {
    !name.contains(['/', '\\']) && name != "." && name != ".."
}

#[cfg(test)]
mod tests {
    use super::*;
    use caconfig_resource::{MemoryResourceResolver, ValueMapExt};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn props(value: serde_json::Value) -> ValueMap {
        value.as_object().cloned().unwrap_or_default()
    }

    fn strategy() -> DefaultConfigurationPersistenceStrategy {
        DefaultConfigurationPersistenceStrategy::new(Arc::new(ManagementSettings::default()))
    }

    #[test]
    fn test_persist_keeps_existing_ignored_properties() {
        let tree = MemoryResourceResolver::new();
        let path = ResourcePath::new("/conf/site1/sling:configs/my.Config");
        tree.create_or_update(&path, props(json!({"jcr:primaryType": "nt:unstructured", "old": 1})))
            .unwrap();

        let data = ConfigurationPersistData::new(props(json!({"param": "v", "jcr:title": "dropped"})));
        assert!(strategy().persist_configuration(&tree, &path, &data).unwrap());

        let stored = tree.get_resource(&path).unwrap();
        assert_eq!(
            stored.value_map(),
            &props(json!({"jcr:primaryType": "nt:unstructured", "param": "v"}))
        );
    }

    #[test]
    fn test_persist_collection_rewrites_items_in_order() {
        let tree = MemoryResourceResolver::new();
        let parent = ResourcePath::new("/conf/site1/sling:configs/my.List");
        tree.create_or_update(&parent.join("old"), props(json!({"x": 1}))).unwrap();

        let data = ConfigurationCollectionPersistData {
            items: vec![
                ConfigurationPersistData::new(props(json!({"v": 2}))).with_item_name("b"),
                ConfigurationPersistData::new(props(json!({"v": 1}))).with_item_name("a"),
            ],
            properties: Some(props(json!({"sling:configCollectionInherit": true}))),
        };
        assert!(strategy()
            .persist_configuration_collection(&tree, &parent, &data)
            .unwrap());

        let parent_resource = tree.get_resource(&parent).unwrap();
        assert!(parent_resource.value_map().is_true("sling:configCollectionInherit"));
        let names: Vec<String> = tree
            .children(&parent_resource)
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_persist_collection_requires_item_names() {
        let tree = MemoryResourceResolver::new();
        let data = ConfigurationCollectionPersistData {
            items: vec![
                ConfigurationPersistData::new(ValueMap::new()).with_item_name("a"),
                ConfigurationPersistData::new(ValueMap::new()),
            ],
            properties: None,
        };
        let result = strategy().persist_configuration_collection(&tree, &"/conf/x".into(), &data);
        assert!(matches!(result, Err(Error::MissingCollectionItemName { index: 1 })));
        assert!(tree.get_resource(&"/conf/x".into()).is_none());
    }

    #[rstest]
    #[case("../../../apps/evil")]
    #[case("..\\..\\apps\\evil")]
    #[case("nested/item")]
    #[case("..")]
    #[case(".")]
    fn test_persist_collection_rejects_item_names_outside_parent(#[case] name: &str) {
        let tree = MemoryResourceResolver::new();
        let parent = ResourcePath::new("/conf/site1/sling:configs/my.List");
        tree.create_or_update(&parent.join("old"), props(json!({"x": 1}))).unwrap();
        let data = ConfigurationCollectionPersistData {
            items: vec![
                ConfigurationPersistData::new(props(json!({"v": 1}))).with_item_name("a"),
                ConfigurationPersistData::new(props(json!({"v": 2}))).with_item_name(name),
            ],
            properties: None,
        };

        let result = strategy().persist_configuration_collection(&tree, &parent, &data);

        assert!(matches!(
            result,
            Err(Error::InvalidCollectionItemName { index: 1, .. })
        ));
        assert!(tree.get_resource(&parent.join("old")).is_some());
        assert!(tree.get_resource(&parent.join("a")).is_none());
        assert!(tree.get_resource(&"/conf/apps/evil".into()).is_none());
        assert!(tree.get_resource(&"/conf/site1/apps/evil".into()).is_none());
    }

    #[test]
    fn test_disabled_strategy_declines() {
        let tree = MemoryResourceResolver::new();
        let disabled = strategy().with_enabled(false);
        let data = ConfigurationPersistData::default();
        assert!(!disabled.persist_configuration(&tree, &"/conf/x".into(), &data).unwrap());
        assert!(disabled.config_name("x").is_none());
    }
}
