//! Context-aware configuration resolution
//!
//! This crate resolves configurations for content resources:
//!
//! - **Context paths**: content resources declaring `sling:configRef`
//! - **Resolving**: lookup below context references, fallback paths and
//!   run mode buckets
//! - **Persistence**: how configurations are laid out in the tree
//! - **Inheritance**: property and collection merging along the chain
//! - **Overrides**: administrative property overrides
//! - **Builder**: value maps and typed configurations for applications
//!
//! # Architecture
//!
//! Every pluggable strategy sits behind a multiplexer that asks the bound
//! strategies in rank order:
//!
//! ```text
//!                  ConfigurationResolver / ConfigurationBuilder
//!                                  |
//!        +-------------------------+--------------------------+
//!        |                         |                          |
//! ConfigurationResourceResolver  inheritance               overrides
//!        |
//!   +----+--------------------+
//!   |                         |
//! context paths        resolving strategies
//!                             |
//!                      persistence strategies
//! ```
//!
//! # Example
//!
//! ```
//! use caconfig_core::{CaConfig, ResolutionContext};
//! use caconfig_resource::{MemoryResourceResolver, ResourceResolver, ValueMap};
//! use serde_json::json;
//!
//! let tree = MemoryResourceResolver::new();
//! let mut context = ValueMap::new();
//! context.insert("sling:configRef".into(), json!("/conf/site1"));
//! tree.create_or_update(&"/content/site1".into(), context).unwrap();
//! let page = tree.create_or_update(&"/content/site1/page".into(), ValueMap::new()).unwrap();
//! let mut config = ValueMap::new();
//! config.insert("title".into(), json!("Site 1"));
//! tree.create_or_update(&"/conf/site1/sling:configs/my.Config".into(), config).unwrap();
//!
//! let caconfig = CaConfig::default();
//! let ctx = ResolutionContext::new(&tree);
//! let properties = caconfig
//!     .resolver
//!     .get(&ctx, Some(&page))
//!     .name("my.Config")
//!     .as_value_map()
//!     .unwrap();
//! assert_eq!(properties.get("title"), Some(&json!("Site 1")));
//! ```

pub mod bindings;
pub mod builder;
pub mod constants;
pub mod context;
pub mod context_path;
pub mod detection;
pub mod error;
pub mod inheritance;
pub mod overrides;
pub mod persistence;
pub mod resolving;
pub mod resource_resolver;
pub mod services;
pub mod via;

pub use bindings::{Bindings, ConfigMap, ConfigValue, ConfigurationBindingsValueProvider};
pub use builder::{ConfigurationBuilder, ConfigurationResolver, ConfigurationType};
pub use constants::{BINDING_VARIABLE, ConfigProperty, DEFAULT_BUCKET};
pub use context::{ResolutionContext, ResourceCollection};
pub use context_path::{
    ContextPathStrategy, ContextPathStrategyMultiplexer, ContextResource,
    DefaultContextPathStrategy,
};
pub use detection::{
    ConfigurationBindingsResourceDetectionStrategy,
    ConfigurationBindingsResourceDetectionStrategyMultiplexer,
    ConfigurationInjectResourceDetectionStrategy,
    ConfigurationInjectResourceDetectionStrategyMultiplexer,
    DefaultConfigurationBindingsResourceDetectionStrategy,
    DefaultConfigurationInjectResourceDetectionStrategy, Request, SimpleRequest,
};
pub use error::{Error, Result};
pub use inheritance::{
    ConfigurationInheritanceStrategy, ConfigurationInheritanceStrategyMultiplexer,
    DefaultConfigurationInheritanceStrategy, merge_collection_levels,
};
pub use overrides::{
    ConfigurationOverrideMultiplexer, ConfigurationOverrideProvider, OverrideItem,
    StaticOverrideProvider,
};
pub use persistence::{
    ConfigurationCollectionPersistData, ConfigurationPersistData,
    ConfigurationPersistenceStrategy, ConfigurationPersistenceStrategyMultiplexer,
    DefaultConfigurationPersistenceStrategy, LegacyConfigurationPersistenceStrategy,
};
pub use resolving::{
    ConfigurationResourceResolvingStrategy, ConfigurationResourceResolvingStrategyMultiplexer,
    DefaultConfigurationResourceResolvingStrategy, ResourceChain,
};
pub use resource_resolver::ConfigurationResourceResolver;
pub use services::CaConfig;
pub use via::{Adaptable, CaConfigViaProvider, RequestScope, ViaProviderCache, ViaResult};
