//! Script bindings
//!
//! Binds the `caconfig` variable into a scripting context. The bound
//! [`ConfigMap`] is read-only and lazy: configuration names come from the
//! metadata providers and each configuration is resolved on first access.

use crate::builder::ConfigurationResolver;
use crate::constants::BINDING_VARIABLE;
use crate::context::ResolutionContext;
use crate::detection::{ConfigurationInjectResourceDetectionStrategy, Request};
use crate::{Error, Result};
use caconfig_meta::BindingsConfig;
use caconfig_resource::{Resource, ValueMap};
use std::cell::{OnceCell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;
use std::sync::Arc;

/// Variables of one script evaluation.
pub struct Bindings<'a> {
    pub request: Option<&'a dyn Request>,
    pub resource: Option<Resource>,
    pub script_engine: String,
    caconfig: Option<ConfigMap<'a>>,
}

impl<'a> Bindings<'a> {
    pub fn new(script_engine: impl Into<String>) -> Self {
        Self {
            request: None,
            resource: None,
            script_engine: script_engine.into(),
            caconfig: None,
        }
    }

    pub fn with_request(mut self, request: &'a dyn Request) -> Self {
        self.request = Some(request);
        self
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Value bound to the `caconfig` variable.
    pub fn get(&self, name: &str) -> Option<&ConfigMap<'a>> {
        if name == BINDING_VARIABLE {
            self.caconfig.as_ref()
        } else {
            None
        }
    }

    pub fn caconfig(&self) -> Option<&ConfigMap<'a>> {
        self.caconfig.as_ref()
    }
}

impl std::fmt::Debug for Bindings<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bindings")
            .field("resource", &self.resource)
            .field("script_engine", &self.script_engine)
            .field("caconfig", &self.caconfig.is_some())
            .finish_non_exhaustive()
    }
}

/// A configuration value exposed to scripts.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Single(ValueMap),
    Collection(Vec<ValueMap>),
}

/// Lazy, read-only map from configuration name to configuration value.
pub struct ConfigMap<'a> {
    resolver: &'a ConfigurationResolver,
    ctx: &'a ResolutionContext<'a>,
    resource: Resource,
    names: OnceCell<BTreeSet<String>>,
    values: RefCell<HashMap<String, Rc<ConfigValue>>>,
}

impl<'a> ConfigMap<'a> {
    pub fn new(
        resolver: &'a ConfigurationResolver,
        ctx: &'a ResolutionContext<'a>,
        resource: Resource,
    ) -> Self {
        Self {
            resolver,
            ctx,
            resource,
            names: OnceCell::new(),
            values: RefCell::new(HashMap::new()),
        }
    }

    /// Configuration names known to the metadata providers.
    pub fn names(&self) -> &BTreeSet<String> {
        self.names.get_or_init(|| self.resolver.config_names())
    }

    pub fn len(&self) -> usize {
        self.names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }

    pub fn contains_key(&self, config_name: &str) -> bool {
        self.names().contains(config_name)
    }

    /// Resolve a configuration, memoized for the lifetime of the map.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid.
    pub fn get(&self, config_name: &str) -> Result<Rc<ConfigValue>> {
        if let Some(value) = self.values.borrow().get(config_name) {
            return Ok(Rc::clone(value));
        }

        let collection = self
            .resolver
            .metadata(config_name)
            .is_some_and(|metadata| metadata.collection);
        let builder = self
            .resolver
            .get(self.ctx, Some(&self.resource))
            .name(config_name);
        let value = Rc::new(if collection {
            ConfigValue::Collection(builder.as_value_map_collection()?)
        } else {
            ConfigValue::Single(builder.as_value_map()?)
        });
        self.values
            .borrow_mut()
            .insert(config_name.to_string(), Rc::clone(&value));
        Ok(value)
    }

    pub fn insert(&self, _config_name: &str, _value: ConfigValue) -> Result<()> {
        Err(Error::UnsupportedOperation { operation: "insert" })
    }

    pub fn remove(&self, _config_name: &str) -> Result<()> {
        Err(Error::UnsupportedOperation { operation: "remove" })
    }

    pub fn clear(&self) -> Result<()> {
        Err(Error::UnsupportedOperation { operation: "clear" })
    }
}

/// Adds the `caconfig` variable to script bindings.
pub struct ConfigurationBindingsValueProvider {
    settings: BindingsConfig,
    detection: Arc<dyn ConfigurationInjectResourceDetectionStrategy>,
}

impl ConfigurationBindingsValueProvider {
    pub fn new(
        settings: BindingsConfig,
        detection: Arc<dyn ConfigurationInjectResourceDetectionStrategy>,
    ) -> Self {
        Self {
            settings,
            detection,
        }
    }

    /// Bind `caconfig` if enabled for the script engine and a content
    /// resource is found: the request's, detected through the inject
    /// strategies, otherwise the bound resource.
    pub fn add_bindings<'a>(
        &self,
        bindings: &mut Bindings<'a>,
        resolver: &'a ConfigurationResolver,
        ctx: &'a ResolutionContext<'a>,
    ) {
        if !self.settings.enabled {
            return;
        }
        if !self
            .settings
            .script_engines
            .iter()
            .any(|engine| *engine == bindings.script_engine)
        {
            tracing::trace!(script_engine = %bindings.script_engine, "Script engine not bound");
            return;
        }

        let resource = match bindings.request {
            Some(request) => self.detection.detect_resource(request),
            None => bindings.resource.clone(),
        };
        let Some(resource) = resource else {
            return;
        };
        tracing::trace!(resource = %resource.path(), "Binding {}", BINDING_VARIABLE);
        bindings.caconfig = Some(ConfigMap::new(resolver, ctx, resource));
    }
}

impl std::fmt::Debug for ConfigurationBindingsValueProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationBindingsValueProvider")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
