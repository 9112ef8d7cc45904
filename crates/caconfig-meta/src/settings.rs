//! Settings model
//!
//! All settings are plain serde structs with defaults, loaded from a TOML,
//! JSON or YAML file by extension.

use crate::{ConfigurationMetadata, Result};
use caconfig_resource::{DocumentLoader, ValueMap};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "/conf";

/// Default fallback paths searched after the context references.
pub const DEFAULT_FALLBACK_PATHS: [&str; 3] = ["/conf/global", "/apps/conf", "/libs/conf"];

/// Complete settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaConfigSettings {
    pub resolver: ResolverConfig,
    pub resolving: ResolvingConfig,
    pub management: ManagementConfig,
    pub bindings: BindingsConfig,
    pub overrides: Vec<OverrideConfig>,
    /// Configuration metadata served by the static metadata provider
    pub metadata: Vec<ConfigurationMetadata>,
}

/// Top-level resolver settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Memoize lookups within one resolution session
    pub enable_caching: bool,
}

/// Default resolving strategy settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolvingConfig {
    pub enabled: bool,
    /// Prefix for relative configuration references
    pub config_path: String,
    pub fallback_paths: Vec<String>,
    /// Extra property names checked for the collection inheritance flag
    pub config_collection_inheritance_property_names: Vec<String>,
    pub run_mode_aware: bool,
    /// Active run modes, most specific first
    pub run_modes: Vec<String>,
}

impl Default for ResolvingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            config_path: DEFAULT_CONFIG_PATH.to_string(),
            fallback_paths: DEFAULT_FALLBACK_PATHS.iter().map(|p| p.to_string()).collect(),
            config_collection_inheritance_property_names: Vec::new(),
            run_mode_aware: false,
            run_modes: Vec::new(),
        }
    }
}

/// Management settings as written in the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagementConfig {
    pub ignore_property_name_regex: Vec<String>,
    pub config_collection_properties_resource_names: Vec<String>,
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            ignore_property_name_regex: vec![
                "^jcr:.+$".to_string(),
                "^sling:resourceType$".to_string(),
            ],
            config_collection_properties_resource_names: Vec::new(),
        }
    }
}

/// Script bindings settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingsConfig {
    pub enabled: bool,
    pub script_engines: Vec<String>,
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            script_engines: vec!["sightly".to_string()],
        }
    }
}

/// One static override provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideConfig {
    pub ranking: i64,
    pub lines: Vec<String>,
}

/// Load settings from a file, format detected by extension.
pub fn load_settings(path: &Path) -> Result<CaConfigSettings> {
    let settings: CaConfigSettings = DocumentLoader::new().load(path)?;
    tracing::debug!(path = %path.display(), "Loaded settings");
    Ok(settings)
}

/// Compiled management settings shared by reading and writing code.
#[derive(Debug, Clone)]
pub struct ManagementSettings {
    ignore_patterns: Vec<Regex>,
    collection_properties_resource_names: Vec<String>,
}

impl Default for ManagementSettings {
    fn default() -> Self {
        Self::from_config(&ManagementConfig::default())
    }
}

impl ManagementSettings {
    /// Compile the settings. Invalid patterns are logged and skipped.
    pub fn from_config(config: &ManagementConfig) -> Self {
        let ignore_patterns = config
            .ignore_property_name_regex
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    tracing::warn!(pattern = %pattern, error = %e, "Ignoring invalid property name pattern");
                    None
                }
            })
            .collect();

        let mut collection_properties_resource_names =
            config.config_collection_properties_resource_names.clone();
        if collection_properties_resource_names.is_empty() {
            collection_properties_resource_names.push(".".to_string());
        }

        Self {
            ignore_patterns,
            collection_properties_resource_names,
        }
    }

    /// Check whether a property name is excluded from reads and writes.
    pub fn is_ignored(&self, property_name: &str) -> bool {
        self.ignore_patterns
            .iter()
            .any(|pattern| pattern.is_match(property_name))
    }

    /// The subset of `property_names` that is ignored.
    pub fn ignored_property_names<'a>(
        &self,
        property_names: impl IntoIterator<Item = &'a str>,
    ) -> Vec<&'a str> {
        property_names
            .into_iter()
            .filter(|name| self.is_ignored(name))
            .collect()
    }

    /// Remove ignored properties from a map.
    pub fn strip_ignored(&self, properties: &mut ValueMap) {
        properties.retain(|name, _| !self.is_ignored(name));
    }

    /// Relative names probed for collection properties below a collection
    /// parent; `.` is the parent itself.
    pub fn config_collection_properties_resource_names(&self) -> &[String] {
        &self.collection_properties_resource_names
    }
}
