//! Default resolving strategy
//!
//! Lookup paths are the configuration references of all context resources
//! (nearest first) followed by the fallback paths. Below each lookup path
//! the configuration is searched in the preferred buckets:
//!
//! ```text
//! /conf/site1/sling:configs.dev/my.Config   (run mode variant, if enabled)
//! /conf/site1/sling:configs/my.Config
//! /conf/global/sling:configs/my.Config      (fallback)
//! /libs/conf/sling:configs/my.Config        (fallback)
//! ```

use super::{ConfigurationResourceResolvingStrategy, ResourceChain};
use crate::constants::ConfigProperty;
use crate::context_path::ContextPathStrategy;
use crate::inheritance::merge_collection_levels;
use crate::persistence::{
    ConfigurationPersistenceStrategy, ConfigurationPersistenceStrategyMultiplexer,
};
use caconfig_meta::{ManagementSettings, ResolvingConfig, is_valid_config_name};
use caconfig_resource::{Resource, ResourcePath, ResourceResolver, ValueMapExt};
use std::sync::Arc;

/// Resolves configurations below context references and fallback paths.
pub struct DefaultConfigurationResourceResolvingStrategy {
    settings: ResolvingConfig,
    config_path: ResourcePath,
    context_paths: Arc<dyn ContextPathStrategy>,
    persistence: Arc<ConfigurationPersistenceStrategyMultiplexer>,
    management: Arc<ManagementSettings>,
}

impl std::fmt::Debug for DefaultConfigurationResourceResolvingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultConfigurationResourceResolvingStrategy")
            .field("settings", &self.settings)
            .finish()
    }
}

impl DefaultConfigurationResourceResolvingStrategy {
    pub fn new(
        settings: ResolvingConfig,
        context_paths: Arc<dyn ContextPathStrategy>,
        persistence: Arc<ConfigurationPersistenceStrategyMultiplexer>,
        management: Arc<ManagementSettings>,
    ) -> Self {
        let config_path = ResourcePath::new(&settings.config_path);
        Self {
            settings,
            config_path,
            context_paths,
            persistence,
            management,
        }
    }

    /// Context references may only point below the configuration root or at
    /// one of the fallback paths.
    fn is_allowed_config_path(&self, path: &ResourcePath) -> bool {
        path.is_descendant_of(&self.config_path)
            || self
                .settings
                .fallback_paths
                .iter()
                .any(|fallback| ResourcePath::new(fallback) == *path)
    }

    fn config_refs<'a>(
        &'a self,
        resolver: &'a dyn ResourceResolver,
        resource: &Resource,
    ) -> impl Iterator<Item = ResourcePath> + 'a {
        self.context_paths
            .find_context_resources(resolver, resource)
            .filter_map(move |context| {
                if self.is_allowed_config_path(context.config_ref()) {
                    Some(context.config_ref().clone())
                } else {
                    tracing::warn!(
                        context = %context.resource().path(),
                        config_ref = %context.config_ref(),
                        "Ignoring configuration reference outside the allowed paths"
                    );
                    None
                }
            })
    }

    /// Distinct lookup paths, nearest first.
    fn lookup_paths(&self, resolver: &dyn ResourceResolver, resource: &Resource) -> Vec<ResourcePath> {
        let fallbacks = self.settings.fallback_paths.iter().map(ResourcePath::new);
        let mut paths: Vec<ResourcePath> = Vec::new();
        for path in self.config_refs(resolver, resource).chain(fallbacks) {
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths
    }

    /// Candidate bucket names per preferred bucket; run mode variants first.
    fn bucket_variants(&self, bucket_names: &[&str]) -> Vec<Vec<String>> {
        bucket_names
            .iter()
            .map(|bucket| {
                let mut variants = Vec::new();
                if self.settings.run_mode_aware {
                    variants.extend(
                        self.settings
                            .run_modes
                            .iter()
                            .map(|run_mode| format!("{bucket}.{run_mode}")),
                    );
                }
                variants.push(bucket.to_string());
                variants
            })
            .collect()
    }

    fn or_plain(names: Vec<String>, config_name: &str) -> Vec<String> {
        if names.is_empty() {
            vec![config_name.to_string()]
        } else {
            names
        }
    }

    fn is_collection_inheritance(&self, resolver: &dyn ResourceResolver, parent: &Resource) -> bool {
        let property_names: Vec<&str> = std::iter::once(ConfigProperty::CollectionInherit.as_str())
            .chain(
                self.settings
                    .config_collection_inheritance_property_names
                    .iter()
                    .map(String::as_str),
            )
            .collect();

        self.management
            .config_collection_properties_resource_names()
            .iter()
            .filter_map(|name| {
                if name == "." {
                    Some(parent.clone())
                } else {
                    resolver.child(parent, name)
                }
            })
            .any(|properties| {
                property_names
                    .iter()
                    .any(|property| properties.value_map().is_true(property))
            })
    }

    /// Item resources of a collection parent, properties resources excluded.
    fn collection_items(&self, resolver: &dyn ResourceResolver, parent: &Resource) -> Vec<Resource> {
        let excluded = self.management.config_collection_properties_resource_names();
        resolver
            .children(parent)
            .into_iter()
            .filter(|child| !excluded.iter().any(|name| name == child.name()))
            .collect()
    }

    fn context_config_ref(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
    ) -> Option<ResourcePath> {
        self.config_refs(resolver, resource).next()
    }
}

/// Resources found below one lookup path.
///
/// The first preferred bucket holding the configuration wins; within that
/// bucket every existing run mode variant is returned before the plain one.
fn find_at(
    resolver: &dyn ResourceResolver,
    path: &ResourcePath,
    buckets: &[Vec<String>],
    names: &[String],
) -> Vec<Resource> {
    for variants in buckets {
        let found: Vec<Resource> = variants
            .iter()
            .filter_map(|bucket| {
                let bucket_path = path.join(bucket);
                names
                    .iter()
                    .find_map(|name| resolver.get_resource(&bucket_path.join(name)))
            })
            .collect();
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

impl ConfigurationResourceResolvingStrategy for DefaultConfigurationResourceResolvingStrategy {
    fn get_resource(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
        bucket_names: &[&str],
        config_name: &str,
    ) -> Option<Resource> {
        self.get_resource_inheritance_chain(resolver, resource, bucket_names, config_name)?
            .next()
    }

    fn get_resource_collection(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
        bucket_names: &[&str],
        config_name: &str,
    ) -> Option<Vec<Resource>> {
        let chains = self.get_resource_collection_inheritance_chain(
            resolver,
            resource,
            bucket_names,
            config_name,
        )?;
        Some(
            chains
                .into_iter()
                .filter_map(|chain| chain.into_iter().next())
                .collect(),
        )
    }

    fn get_resource_inheritance_chain<'a>(
        &self,
        resolver: &'a dyn ResourceResolver,
        resource: &Resource,
        bucket_names: &[&str],
        config_name: &str,
    ) -> Option<ResourceChain<'a>> {
        if !self.settings.enabled {
            return None;
        }

        let paths = self.lookup_paths(resolver, resource);
        let buckets = self.bucket_variants(bucket_names);
        let names = Self::or_plain(self.persistence.all_config_names(config_name), config_name);
        let persistence = Arc::clone(&self.persistence);
        tracing::trace!(
            resource = %resource.path(),
            config_name,
            lookup_paths = paths.len(),
            "Resolving configuration inheritance chain"
        );

        Some(Box::new(paths.into_iter().flat_map(move |path| {
            let found: Vec<Resource> = find_at(resolver, &path, &buckets, &names)
                .into_iter()
                .map(|found| persistence.resource(resolver, &found).unwrap_or(found))
                .collect();
            found
        })))
    }

    fn get_resource_collection_inheritance_chain(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
        bucket_names: &[&str],
        config_name: &str,
    ) -> Option<Vec<Vec<Resource>>> {
        if !self.settings.enabled {
            return None;
        }

        let buckets = self.bucket_variants(bucket_names);
        let parent_names = Self::or_plain(
            self.persistence
                .all_collection_parent_config_names(config_name),
            config_name,
        );

        let mut levels: Vec<Vec<Resource>> = Vec::new();
        'paths: for path in self.lookup_paths(resolver, resource) {
            for parent in find_at(resolver, &path, &buckets, &parent_names) {
                let parent = self
                    .persistence
                    .collection_parent_resource(resolver, &parent)
                    .unwrap_or(parent);
                let inherit = self.is_collection_inheritance(resolver, &parent);
                tracing::trace!(parent = %parent.path(), inherit, "Found configuration collection level");
                levels.push(self.collection_items(resolver, &parent));
                if !inherit {
                    break 'paths;
                }
            }
        }

        let chains = merge_collection_levels(levels)
            .into_iter()
            .map(|chain| {
                chain
                    .into_iter()
                    .map(|item| {
                        self.persistence
                            .collection_item_resource(resolver, &item)
                            .unwrap_or(item)
                    })
                    .collect()
            })
            .collect();
        Some(chains)
    }

    fn get_resource_path(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
        bucket_name: &str,
        config_name: &str,
    ) -> Option<ResourcePath> {
        if !self.settings.enabled || !is_valid_config_name(config_name) {
            return None;
        }
        self.context_config_ref(resolver, resource)
            .map(|config_ref| config_ref.join(bucket_name).join(config_name))
    }

    fn get_resource_collection_parent_path(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
        bucket_name: &str,
        config_name: &str,
    ) -> Option<ResourcePath> {
        if !self.settings.enabled || !is_valid_config_name(config_name) {
            return None;
        }
        let parent_name = self
            .persistence
            .collection_parent_config_name(config_name)
            .unwrap_or_else(|| config_name.to_string());
        self.context_config_ref(resolver, resource)
            .map(|config_ref| config_ref.join(bucket_name).join(&parent_name))
    }
}
