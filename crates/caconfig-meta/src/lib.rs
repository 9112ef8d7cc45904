//! Metadata, settings and service registry for context-aware configuration.
//!
//! This crate provides the configuration metadata model, the rank-ordered
//! service registry every multiplexer is built on, configuration name
//! validation and the serde settings model.

pub mod error;
pub mod metadata;
pub mod provider;
pub mod registry;
pub mod settings;
pub mod validation;

pub use error::{Error, Result};
pub use metadata::{ConfigurationMetadata, PropertyMetadata, PropertyType};
pub use provider::{
    ConfigurationMetadataProvider, ConfigurationMetadataProviderMultiplexer,
    StaticMetadataProvider,
};
pub use registry::{RankedServices, SERVICE_RANKING, Snapshot};
pub use settings::{
    BindingsConfig, CaConfigSettings, ManagementConfig, ManagementSettings, OverrideConfig,
    ResolverConfig, ResolvingConfig, load_settings,
};
pub use validation::{ensure_valid_config_name, is_valid_config_name};
