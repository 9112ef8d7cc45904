use super::ConfigurationBuilder;
use crate::constants::{ConfigProperty, DEFAULT_BUCKET};
use crate::context::ResolutionContext;
use crate::inheritance::ConfigurationInheritanceStrategy;
use crate::overrides::ConfigurationOverrideMultiplexer;
use crate::resolving::ConfigurationResourceResolvingStrategy;
use crate::resource_resolver::ConfigurationResourceResolver;
use caconfig_meta::{ConfigurationMetadata, ConfigurationMetadataProvider, ManagementSettings};
use caconfig_resource::{Resource, ResourcePath, ValueMap};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Entry point for reading configurations.
///
/// Combines resource lookup, inheritance, overrides and metadata into
/// [`ConfigurationBuilder`]s bound to a content resource.
pub struct ConfigurationResolver {
    resources: Arc<ConfigurationResourceResolver>,
    inheritance: Arc<dyn ConfigurationInheritanceStrategy>,
    overrides: Arc<ConfigurationOverrideMultiplexer>,
    metadata: Arc<dyn ConfigurationMetadataProvider>,
    management: Arc<ManagementSettings>,
}

impl std::fmt::Debug for ConfigurationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationResolver")
            .field("resources", &self.resources)
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}

/// A resolved collection item.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolvedItem {
    pub name: String,
    pub properties: ValueMap,
}

impl ConfigurationResolver {
    pub fn new(
        resources: Arc<ConfigurationResourceResolver>,
        inheritance: Arc<dyn ConfigurationInheritanceStrategy>,
        overrides: Arc<ConfigurationOverrideMultiplexer>,
        metadata: Arc<dyn ConfigurationMetadataProvider>,
        management: Arc<ManagementSettings>,
    ) -> Self {
        Self {
            resources,
            inheritance,
            overrides,
            metadata,
            management,
        }
    }

    /// Builder for configurations of `resource`.
    ///
    /// Without a content resource every configuration resolves to its
    /// defaults and every collection is empty.
    pub fn get<'c, 'r>(
        &'c self,
        ctx: &'c ResolutionContext<'r>,
        resource: Option<&Resource>,
    ) -> ConfigurationBuilder<'c, 'r> {
        ConfigurationBuilder::new(self, ctx, resource.cloned())
    }

    pub fn resources(&self) -> &ConfigurationResourceResolver {
        &self.resources
    }

    pub(crate) fn metadata(&self, config_name: &str) -> Option<ConfigurationMetadata> {
        self.metadata.configuration_metadata(config_name)
    }

    pub(crate) fn config_names(&self) -> BTreeSet<String> {
        self.metadata.configuration_names()
    }

    /// Path overrides are matched against: the nearest context path, or the
    /// content path itself outside any context.
    fn override_path(&self, ctx: &ResolutionContext<'_>, content: &Resource) -> ResourcePath {
        self.resources
            .get_context_path(ctx, content)
            .unwrap_or_else(|| content.path().clone())
    }

    fn merged(
        &self,
        ctx: &ResolutionContext<'_>,
        content: &Resource,
        config_name: &str,
    ) -> Option<Resource> {
        let mut chain = self.resources.resolving().get_resource_inheritance_chain(
            ctx.resolver(),
            content,
            &[DEFAULT_BUCKET],
            config_name,
        )?;
        self.inheritance.get_resource(&mut chain)
    }

    fn clean(&self, mut properties: ValueMap) -> ValueMap {
        self.management.strip_ignored(&mut properties);
        for flag in ConfigProperty::internal_flags() {
            properties.remove(flag.as_str());
        }
        properties
    }

    /// Effective properties of a single configuration, without defaults.
    pub(crate) fn resolve_properties(
        &self,
        ctx: &ResolutionContext<'_>,
        content: Option<&Resource>,
        config_name: &str,
    ) -> ValueMap {
        let Some(content) = content else {
            return ValueMap::new();
        };
        let override_path = self.override_path(ctx, content);
        let properties = if self.overrides.is_all_overridden(&override_path, config_name) {
            tracing::trace!(resource = %content.path(), config_name, "Configuration fully overridden");
            ValueMap::new()
        } else {
            self.merged(ctx, content, config_name)
                .map(|resource| resource.value_map().clone())
                .unwrap_or_default()
        };
        let properties = self
            .overrides
            .override_properties(&override_path, config_name, &properties)
            .unwrap_or(properties);
        self.clean(properties)
    }

    /// Effective items of a configuration collection, without defaults.
    pub(crate) fn resolve_collection(
        &self,
        ctx: &ResolutionContext<'_>,
        content: Option<&Resource>,
        config_name: &str,
    ) -> Vec<ResolvedItem> {
        let Some(content) = content else {
            return Vec::new();
        };
        let override_path = self.override_path(ctx, content);
        if self.overrides.is_all_overridden(&override_path, config_name) {
            tracing::trace!(resource = %content.path(), config_name, "Configuration collection fully overridden");
            return Vec::new();
        }

        let chains = self
            .resources
            .resolving()
            .get_resource_collection_inheritance_chain(
                ctx.resolver(),
                content,
                &[DEFAULT_BUCKET],
                config_name,
            )
            .unwrap_or_default();
        chains
            .into_iter()
            .filter_map(|chain| self.inheritance.get_resource(&mut chain.into_iter()))
            .map(|item| {
                let name = item.name().to_string();
                let item_config_name = format!("{config_name}/{name}");
                let properties = item.value_map().clone();
                let properties = self
                    .overrides
                    .override_properties(&override_path, &item_config_name, &properties)
                    .unwrap_or(properties);
                ResolvedItem {
                    name,
                    properties: self.clean(properties),
                }
            })
            .collect()
    }

    /// Effective configuration resource with overrides applied.
    ///
    /// A fully overridden configuration is a virtual resource at the path
    /// the configuration would be stored at.
    pub(crate) fn resolve_resource(
        &self,
        ctx: &ResolutionContext<'_>,
        content: Option<&Resource>,
        config_name: &str,
    ) -> Option<Resource> {
        let content = content?;
        let override_path = self.override_path(ctx, content);
        if self.overrides.is_all_overridden(&override_path, config_name) {
            let path = self.resources.resolving().get_resource_path(
                ctx.resolver(),
                content,
                DEFAULT_BUCKET,
                config_name,
            )?;
            let properties = self
                .overrides
                .override_properties(&override_path, config_name, &ValueMap::new())
                .unwrap_or_default();
            return Some(Resource::new(path, properties));
        }
        let merged = self.merged(ctx, content, config_name);
        self.overrides
            .override_resource(&override_path, config_name, merged.as_ref())
    }

    /// Whether a configuration exists for the content resource.
    pub(crate) fn exists(
        &self,
        ctx: &ResolutionContext<'_>,
        content: Option<&Resource>,
        config_name: &str,
    ) -> bool {
        let Some(content) = content else {
            return false;
        };
        if self
            .overrides
            .is_all_overridden(&self.override_path(ctx, content), config_name)
        {
            return true;
        }
        let collection = self
            .metadata(config_name)
            .is_some_and(|metadata| metadata.collection);
        let found = if collection {
            self.resources
                .get_resource_collection(ctx, content, DEFAULT_BUCKET, config_name)
                .map(|items| !items.is_empty())
        } else {
            self.resources
                .get_resource(ctx, content, DEFAULT_BUCKET, config_name)
                .map(|resource| resource.is_some())
        };
        found.unwrap_or(false)
    }
}
