use super::ConfigurationResolver;
use super::mapping::{ConfigurationType, apply_metadata, deserialize};
use crate::context::ResolutionContext;
use crate::{Error, Result};
use caconfig_meta::{ConfigurationMetadata, PropertyType, ensure_valid_config_name};
use caconfig_resource::{Resource, ValueMap};
use serde_json::Value;

/// Reads one configuration of a content resource in the requested shape.
///
/// ```text
/// resolver.get(&ctx, Some(&page)).name("my.app.Config").as_value_map()?
/// ```
pub struct ConfigurationBuilder<'c, 'r> {
    resolver: &'c ConfigurationResolver,
    ctx: &'c ResolutionContext<'r>,
    content: Option<Resource>,
    config_name: Option<String>,
}

impl<'c, 'r> ConfigurationBuilder<'c, 'r> {
    pub(crate) fn new(
        resolver: &'c ConfigurationResolver,
        ctx: &'c ResolutionContext<'r>,
        content: Option<Resource>,
    ) -> Self {
        Self {
            resolver,
            ctx,
            content,
            config_name: None,
        }
    }

    /// Name of the configuration to read.
    ///
    /// Required for the value map accessors; typed accessors fall back to
    /// the name in the type's metadata.
    pub fn name(mut self, config_name: impl Into<String>) -> Self {
        self.config_name = Some(config_name.into());
        self
    }

    fn required_name(&self) -> Result<&str> {
        let name = self.config_name.as_deref().ok_or(Error::MissingConfigName)?;
        ensure_valid_config_name(name)?;
        Ok(name)
    }

    fn typed_name(&self, metadata: &ConfigurationMetadata) -> Result<String> {
        let name = self
            .config_name
            .clone()
            .unwrap_or_else(|| metadata.name.clone());
        ensure_valid_config_name(&name)?;
        Ok(name)
    }

    fn ensure_shape(&self, config_name: &str, collection: bool) -> Result<()> {
        match self.resolver.metadata(config_name) {
            Some(metadata) if metadata.collection != collection => Err(shape_error(config_name, metadata.collection)),
            _ => Ok(()),
        }
    }

    /// Properties of a single configuration.
    ///
    /// Ignored and internal properties are removed; metadata defaults fill
    /// missing properties. An absent configuration yields the defaults.
    ///
    /// # Errors
    ///
    /// Fails for a missing or invalid name, or when the metadata declares a
    /// collection.
    pub fn as_value_map(&self) -> Result<ValueMap> {
        let name = self.required_name()?;
        self.ensure_shape(name, false)?;
        let mut properties = self
            .resolver
            .resolve_properties(self.ctx, self.content.as_ref(), name);
        if let Some(metadata) = self.resolver.metadata(name) {
            apply_metadata(&mut properties, &metadata, false);
        }
        Ok(properties)
    }

    /// Item properties of a configuration collection, in collection order.
    ///
    /// # Errors
    ///
    /// Fails for a missing or invalid name, or when the metadata declares a
    /// single configuration.
    pub fn as_value_map_collection(&self) -> Result<Vec<ValueMap>> {
        let name = self.required_name()?;
        self.ensure_shape(name, true)?;
        let metadata = self.resolver.metadata(name);
        Ok(self
            .resolver
            .resolve_collection(self.ctx, self.content.as_ref(), name)
            .into_iter()
            .map(|item| {
                let mut properties = item.properties;
                if let Some(metadata) = &metadata {
                    apply_metadata(&mut properties, metadata, false);
                }
                properties
            })
            .collect())
    }

    /// Map the configuration onto `T`.
    ///
    /// An absent configuration still produces a value built from defaults.
    ///
    /// # Errors
    ///
    /// Fails when `T` is a collection type or the properties cannot be
    /// deserialized into `T`.
    pub fn as_type<T: ConfigurationType>(&self) -> Result<T> {
        let metadata = T::metadata();
        let name = self.typed_name(&metadata)?;
        if metadata.collection {
            return Err(shape_error(&name, true));
        }
        let properties = self.typed_properties(&name, &metadata)?;
        deserialize(&name, properties)
    }

    /// Map every collection item onto `T`.
    ///
    /// # Errors
    ///
    /// Fails when `T` is not a collection type or an item cannot be
    /// deserialized into `T`.
    pub fn as_collection<T: ConfigurationType>(&self) -> Result<Vec<T>> {
        let metadata = T::metadata();
        let name = self.typed_name(&metadata)?;
        if !metadata.collection {
            return Err(shape_error(&name, false));
        }
        self.typed_items(&name, &metadata)?
            .into_iter()
            .map(|properties| deserialize(&name, properties))
            .collect()
    }

    /// The effective configuration resource, with inherited and overridden
    /// properties applied.
    ///
    /// # Errors
    ///
    /// Fails for a missing or invalid name.
    pub fn as_resource(&self) -> Result<Option<Resource>> {
        let name = self.required_name()?;
        Ok(self
            .resolver
            .resolve_resource(self.ctx, self.content.as_ref(), name))
    }

    /// Whether the named configuration exists. Invalid names never exist.
    pub fn has(&self, config_name: &str) -> bool {
        if ensure_valid_config_name(config_name).is_err() {
            tracing::trace!(config_name, "Invalid configuration name");
            return false;
        }
        self.resolver
            .exists(self.ctx, self.content.as_ref(), config_name)
    }

    /// Whether the configuration of type `T` exists.
    pub fn has_type<T: ConfigurationType>(&self) -> bool {
        let metadata = T::metadata();
        let name = self.config_name.as_deref().unwrap_or(&metadata.name);
        self.has(name)
    }

    fn typed_properties(&self, config_name: &str, metadata: &ConfigurationMetadata) -> Result<ValueMap> {
        let properties =
            self.resolver
                .resolve_properties(self.ctx, self.content.as_ref(), config_name);
        self.complete(config_name, properties, metadata)
    }

    fn typed_items(&self, config_name: &str, metadata: &ConfigurationMetadata) -> Result<Vec<ValueMap>> {
        self.resolver
            .resolve_collection(self.ctx, self.content.as_ref(), config_name)
            .into_iter()
            .map(|item| {
                let item_config_name = format!("{config_name}/{}", item.name);
                self.complete(&item_config_name, item.properties, metadata)
            })
            .collect()
    }

    /// Fill defaults and zero values and resolve nested configurations
    /// below `config_name`.
    fn complete(
        &self,
        config_name: &str,
        mut properties: ValueMap,
        metadata: &ConfigurationMetadata,
    ) -> Result<ValueMap> {
        apply_metadata(&mut properties, metadata, true);
        for property in &metadata.properties {
            let nested_name = format!("{config_name}/{}", property.name);
            let value = match &property.property_type {
                PropertyType::Nested(nested) => {
                    Value::Object(self.typed_properties(&nested_name, nested)?)
                }
                PropertyType::NestedCollection(nested) => Value::Array(
                    self.typed_items(&nested_name, nested)?
                        .into_iter()
                        .map(Value::Object)
                        .collect(),
                ),
                _ => continue,
            };
            properties.insert(property.name.clone(), value);
        }
        Ok(properties)
    }
}

fn shape_error(config_name: &str, collection: bool) -> Error {
    let message = if collection {
        "configuration is a collection"
    } else {
        "configuration is not a collection"
    };
    Error::resolve(config_name, message)
}
