//! Mapping resolved properties onto typed configurations

use crate::{Error, Result};
use caconfig_meta::ConfigurationMetadata;
use caconfig_resource::ValueMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A configuration type that resolved properties can be mapped onto.
///
/// The metadata names the configuration and declares defaults. Property
/// names in the metadata must match the serde field names.
///
/// # Example
///
/// ```
/// use caconfig_core::ConfigurationType;
/// use caconfig_meta::{ConfigurationMetadata, PropertyMetadata, PropertyType};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct SiteConfig {
///     title: Option<String>,
///     max_items: i64,
/// }
///
/// impl ConfigurationType for SiteConfig {
///     fn metadata() -> ConfigurationMetadata {
///         ConfigurationMetadata::new("my.app.SiteConfig")
///             .with_property(PropertyMetadata::new("title", PropertyType::String))
///             .with_property(PropertyMetadata::new("max_items", PropertyType::Integer).with_default(10))
///     }
/// }
/// ```
pub trait ConfigurationType: DeserializeOwned {
    fn metadata() -> ConfigurationMetadata;
}

/// Fill declared defaults and convert stored values to their declared types.
///
/// With `zero_values`, properties without a default get the zero value of
/// their type. Nested properties are left to the caller.
pub(crate) fn apply_metadata(
    properties: &mut ValueMap,
    metadata: &ConfigurationMetadata,
    zero_values: bool,
) {
    for property in metadata
        .properties
        .iter()
        .filter(|p| !p.property_type.is_nested())
    {
        let value = match properties.get(&property.name) {
            Some(value) => Some(property.property_type.coerce(value)),
            None if zero_values => property.effective_default(),
            None => property
                .default_value
                .as_ref()
                .map(|value| property.property_type.coerce(value)),
        };
        if let Some(value) = value {
            properties.insert(property.name.clone(), value);
        }
    }
}

pub(crate) fn deserialize<T: DeserializeOwned>(config_name: &str, properties: ValueMap) -> Result<T> {
    serde_json::from_value(Value::Object(properties))
        .map_err(|e| Error::resolve(config_name, format!("cannot map properties: {e}")))
}
