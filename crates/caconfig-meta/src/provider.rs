//! Configuration metadata providers

use crate::{ConfigurationMetadata, RankedServices};
use caconfig_resource::ValueMap;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Supplies metadata for the configurations an application defines.
pub trait ConfigurationMetadataProvider: Send + Sync {
    /// Names of all configurations this provider describes.
    fn configuration_names(&self) -> BTreeSet<String>;

    fn configuration_metadata(&self, name: &str) -> Option<ConfigurationMetadata>;
}

/// Provider backed by a fixed list of metadata.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadataProvider {
    configurations: BTreeMap<String, ConfigurationMetadata>,
}

impl StaticMetadataProvider {
    pub fn new(configurations: impl IntoIterator<Item = ConfigurationMetadata>) -> Self {
        Self {
            configurations: configurations
                .into_iter()
                .map(|metadata| (metadata.name.clone(), metadata))
                .collect(),
        }
    }

    /// Register metadata, replacing any previous entry of the same name.
    pub fn register(&mut self, metadata: ConfigurationMetadata) {
        self.configurations.insert(metadata.name.clone(), metadata);
    }
}

impl ConfigurationMetadataProvider for StaticMetadataProvider {
    fn configuration_names(&self) -> BTreeSet<String> {
        self.configurations.keys().cloned().collect()
    }

    fn configuration_metadata(&self, name: &str) -> Option<ConfigurationMetadata> {
        self.configurations.get(name).cloned()
    }
}

/// Combines all bound metadata providers.
///
/// Names are the union over all providers; metadata comes from the highest
/// ranked provider that knows the name.
#[derive(Debug, Default)]
pub struct ConfigurationMetadataProviderMultiplexer {
    providers: RankedServices<dyn ConfigurationMetadataProvider>,
}

impl ConfigurationMetadataProviderMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, provider: Arc<dyn ConfigurationMetadataProvider>, properties: &ValueMap) {
        self.providers.bind(provider, properties);
    }

    pub fn unbind(&self, provider: &Arc<dyn ConfigurationMetadataProvider>) -> bool {
        self.providers.unbind(provider)
    }
}

impl ConfigurationMetadataProvider for ConfigurationMetadataProviderMultiplexer {
    fn configuration_names(&self) -> BTreeSet<String> {
        self.providers
            .snapshot()
            .iter()
            .flat_map(|provider| provider.configuration_names())
            .collect()
    }

    fn configuration_metadata(&self, name: &str) -> Option<ConfigurationMetadata> {
        self.providers
            .snapshot()
            .iter()
            .find_map(|provider| provider.configuration_metadata(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PropertyMetadata, PropertyType};

    #[test]
    fn test_multiplexer_union_and_rank_order() {
        let low = StaticMetadataProvider::new([
            ConfigurationMetadata::new("a.Config").with_label("low"),
            ConfigurationMetadata::new("b.Config"),
        ]);
        let high = StaticMetadataProvider::new([ConfigurationMetadata::new("a.Config")
            .with_label("high")
            .with_property(PropertyMetadata::new("flag", PropertyType::Boolean))]);

        let multiplexer = ConfigurationMetadataProviderMultiplexer::new();
        multiplexer.bind(Arc::new(low), &ValueMap::new());
        let mut props = ValueMap::new();
        props.insert("service.ranking".into(), 10.into());
        multiplexer.bind(Arc::new(high), &props);

        let names: Vec<String> = multiplexer.configuration_names().into_iter().collect();
        assert_eq!(names, vec!["a.Config", "b.Config"]);

        let metadata = multiplexer.configuration_metadata("a.Config").unwrap();
        assert_eq!(metadata.label.as_deref(), Some("high"));
        assert!(multiplexer.configuration_metadata("c.Config").is_none());
    }
}
