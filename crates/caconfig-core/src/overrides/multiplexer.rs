use super::{ConfigurationOverrideProvider, OverrideItem, parse_override_lines};
use caconfig_meta::RankedServices;
use caconfig_resource::{Resource, ResourcePath, ValueMap};
use std::sync::Arc;

/// A bound provider with its lines parsed once at bind time.
struct BoundProvider {
    provider: Arc<dyn ConfigurationOverrideProvider>,
    items: Vec<OverrideItem>,
}

/// Applies the overrides of all bound providers.
///
/// Providers are applied lowest ranking first, so a higher ranked provider
/// wins for the same property. Within one provider later lines win.
/// Lines are read when the provider is bound; rebind to pick up changes.
#[derive(Debug, Default)]
pub struct ConfigurationOverrideMultiplexer {
    providers: RankedServices<BoundProvider>,
}

impl ConfigurationOverrideMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, provider: Arc<dyn ConfigurationOverrideProvider>, properties: &ValueMap) {
        let items = parse_override_lines(&provider.override_strings());
        tracing::debug!(items = items.len(), "Bound override provider");
        self.providers
            .bind(Arc::new(BoundProvider { provider, items }), properties);
    }

    pub fn unbind(&self, provider: &Arc<dyn ConfigurationOverrideProvider>) -> bool {
        let snapshot = self.providers.snapshot();
        let bound = snapshot
            .iter()
            .find(|bound| std::ptr::addr_eq(Arc::as_ptr(&bound.provider), Arc::as_ptr(provider)))
            .cloned();
        bound.is_some_and(|bound| self.providers.unbind(&bound))
    }

    /// Parsed items of all providers, lowest ranking first.
    fn items(&self) -> Vec<OverrideItem> {
        self.providers
            .snapshot()
            .iter()
            .rev()
            .flat_map(|bound| bound.items.iter().cloned())
            .collect()
    }

    /// Whether an override replaces the whole configuration, in which case
    /// the resource tree is not consulted at all.
    pub fn is_all_overridden(&self, context_path: &ResourcePath, config_name: &str) -> bool {
        self.items()
            .iter()
            .any(|item| item.all_properties && item.matches(context_path, config_name))
    }

    /// Apply overrides to resolved properties.
    ///
    /// Returns `None` if no override applies; the caller keeps the original
    /// properties in that case.
    pub fn override_properties(
        &self,
        context_path: &ResourcePath,
        config_name: &str,
        properties: &ValueMap,
    ) -> Option<ValueMap> {
        let mut overridden: Option<ValueMap> = None;
        for item in self
            .items()
            .into_iter()
            .filter(|item| item.matches(context_path, config_name))
        {
            let current = overridden.get_or_insert_with(|| properties.clone());
            if item.all_properties {
                current.clear();
            }
            current.extend(item.properties);
        }
        if overridden.is_some() {
            tracing::debug!(context = %context_path, config_name, "Applied configuration overrides");
        }
        overridden
    }

    /// Apply overrides to a resolved configuration resource.
    ///
    /// Returns the original resource if no override applies.
    pub fn override_resource(
        &self,
        context_path: &ResourcePath,
        config_name: &str,
        resource: Option<&Resource>,
    ) -> Option<Resource> {
        let resource = resource?;
        match self.override_properties(context_path, config_name, resource.value_map()) {
            Some(properties) => Some(Resource::new(resource.path().clone(), properties)),
            None => Some(resource.clone()),
        }
    }
}
