//! Reserved property and resource names

use std::fmt;

/// Name of the default configuration bucket.
pub const DEFAULT_BUCKET: &str = "sling:configs";

/// Script variable the configuration map is bound to.
pub const BINDING_VARIABLE: &str = "caconfig";

/// Properties with a reserved meaning on content and configuration resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigProperty {
    /// Context marker on a content resource, pointing at its configuration
    ConfigRef,
    /// Merge a configuration with the next one in its inheritance chain
    PropertyInherit,
    /// Merge a configuration collection with the next level's items
    CollectionInherit,
}

impl ConfigProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigProperty::ConfigRef => "sling:configRef",
            ConfigProperty::PropertyInherit => "sling:configPropertyInherit",
            ConfigProperty::CollectionInherit => "sling:configCollectionInherit",
        }
    }

    /// Flags that are consumed during resolution and never returned to callers.
    pub fn internal_flags() -> [ConfigProperty; 2] {
        [ConfigProperty::PropertyInherit, ConfigProperty::CollectionInherit]
    }
}

impl AsRef<str> for ConfigProperty {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ConfigProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
