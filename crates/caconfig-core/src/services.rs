//! Default service wiring
//!
//! Builds the full stack of multiplexers with the default strategies bound,
//! the way a host registry would on activation. Further strategies can be
//! bound to the multiplexers afterwards.

use crate::bindings::ConfigurationBindingsValueProvider;
use crate::builder::ConfigurationResolver;
use crate::context_path::{ContextPathStrategyMultiplexer, DefaultContextPathStrategy};
use crate::detection::{
    ConfigurationBindingsResourceDetectionStrategyMultiplexer,
    ConfigurationInjectResourceDetectionStrategyMultiplexer,
    DefaultConfigurationBindingsResourceDetectionStrategy,
    DefaultConfigurationInjectResourceDetectionStrategy,
};
use crate::inheritance::{
    ConfigurationInheritanceStrategyMultiplexer, DefaultConfigurationInheritanceStrategy,
};
use crate::overrides::{ConfigurationOverrideMultiplexer, StaticOverrideProvider};
use crate::persistence::{
    ConfigurationPersistenceStrategyMultiplexer, DefaultConfigurationPersistenceStrategy,
};
use crate::resolving::{
    ConfigurationResourceResolvingStrategyMultiplexer,
    DefaultConfigurationResourceResolvingStrategy,
};
use crate::resource_resolver::ConfigurationResourceResolver;
use crate::via::CaConfigViaProvider;
use caconfig_meta::{
    CaConfigSettings, ConfigurationMetadataProviderMultiplexer, ManagementSettings,
    SERVICE_RANKING, StaticMetadataProvider,
};
use caconfig_resource::ValueMap;
use std::sync::Arc;

fn ranking(value: i64) -> ValueMap {
    let mut properties = ValueMap::new();
    properties.insert(SERVICE_RANKING.to_string(), value.into());
    properties
}

/// All configuration services, wired with their defaults.
#[derive(Debug)]
pub struct CaConfig {
    pub management: Arc<ManagementSettings>,
    pub metadata: Arc<ConfigurationMetadataProviderMultiplexer>,
    pub context_paths: Arc<ContextPathStrategyMultiplexer>,
    pub persistence: Arc<ConfigurationPersistenceStrategyMultiplexer>,
    pub resolving: Arc<ConfigurationResourceResolvingStrategyMultiplexer>,
    pub inheritance: Arc<ConfigurationInheritanceStrategyMultiplexer>,
    pub overrides: Arc<ConfigurationOverrideMultiplexer>,
    pub bindings_detection: Arc<ConfigurationBindingsResourceDetectionStrategyMultiplexer>,
    pub inject_detection: Arc<ConfigurationInjectResourceDetectionStrategyMultiplexer>,
    pub resources: Arc<ConfigurationResourceResolver>,
    pub resolver: Arc<ConfigurationResolver>,
    pub bindings: ConfigurationBindingsValueProvider,
    pub via: CaConfigViaProvider,
}

impl CaConfig {
    pub fn from_settings(settings: &CaConfigSettings) -> Self {
        let management = Arc::new(ManagementSettings::from_config(&settings.management));

        let metadata = Arc::new(ConfigurationMetadataProviderMultiplexer::new());
        if !settings.metadata.is_empty() {
            metadata.bind(
                Arc::new(StaticMetadataProvider::new(settings.metadata.iter().cloned())),
                &ValueMap::new(),
            );
        }

        let context_paths = Arc::new(ContextPathStrategyMultiplexer::new());
        context_paths.bind(
            Arc::new(
                DefaultContextPathStrategy::new(settings.resolving.config_path.as_str())
                    .with_enabled(settings.resolving.enabled),
            ),
            &ValueMap::new(),
        );

        let persistence = Arc::new(ConfigurationPersistenceStrategyMultiplexer::new());
        persistence.bind(
            Arc::new(DefaultConfigurationPersistenceStrategy::new(Arc::clone(&management))),
            &ranking(DefaultConfigurationPersistenceStrategy::RANKING),
        );

        let resolving = Arc::new(ConfigurationResourceResolvingStrategyMultiplexer::new());
        resolving.bind(
            Arc::new(DefaultConfigurationResourceResolvingStrategy::new(
                settings.resolving.clone(),
                context_paths.clone(),
                Arc::clone(&persistence),
                Arc::clone(&management),
            )),
            &ValueMap::new(),
        );

        let inheritance = Arc::new(ConfigurationInheritanceStrategyMultiplexer::new());
        inheritance.bind(
            Arc::new(DefaultConfigurationInheritanceStrategy::new()),
            &ValueMap::new(),
        );

        let overrides = Arc::new(ConfigurationOverrideMultiplexer::new());
        for config in &settings.overrides {
            overrides.bind(
                Arc::new(StaticOverrideProvider::from(config)),
                &ranking(config.ranking),
            );
        }

        let bindings_detection =
            Arc::new(ConfigurationBindingsResourceDetectionStrategyMultiplexer::new());
        bindings_detection.bind(
            Arc::new(DefaultConfigurationBindingsResourceDetectionStrategy),
            &ranking(DefaultConfigurationBindingsResourceDetectionStrategy::RANKING),
        );
        let inject_detection =
            Arc::new(ConfigurationInjectResourceDetectionStrategyMultiplexer::new());
        inject_detection.bind(
            Arc::new(DefaultConfigurationInjectResourceDetectionStrategy),
            &ValueMap::new(),
        );

        let resources = Arc::new(
            ConfigurationResourceResolver::new(context_paths.clone(), resolving.clone())
                .with_caching(settings.resolver.enable_caching),
        );
        let resolver = Arc::new(ConfigurationResolver::new(
            Arc::clone(&resources),
            inheritance.clone(),
            Arc::clone(&overrides),
            metadata.clone(),
            Arc::clone(&management),
        ));
        let bindings =
            ConfigurationBindingsValueProvider::new(settings.bindings.clone(), inject_detection.clone());
        let via = CaConfigViaProvider::new(Arc::clone(&resolver));

        tracing::debug!(
            config_path = %settings.resolving.config_path,
            run_mode_aware = settings.resolving.run_mode_aware,
            overrides = settings.overrides.len(),
            metadata = settings.metadata.len(),
            "Configuration services activated"
        );

        Self {
            management,
            metadata,
            context_paths,
            persistence,
            resolving,
            inheritance,
            overrides,
            bindings_detection,
            inject_detection,
            resources,
            resolver,
            bindings,
            via,
        }
    }
}

impl Default for CaConfig {
    fn default() -> Self {
        Self::from_settings(&CaConfigSettings::default())
    }
}
