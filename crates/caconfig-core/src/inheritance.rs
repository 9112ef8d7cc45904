//! Property and collection inheritance
//!
//! Property inheritance merges a configuration resource with the rest of
//! its inheritance chain while the resources ask for it:
//!
//! ```text
//! level 0  {a:4, c:5, sling:configPropertyInherit:true}
//! level 1  {a:1, b:2, c:3}
//! result   {a:4, b:2, c:5}
//! ```
//!
//! Collection inheritance matches items across levels by name; see
//! [`merge_collection_levels`].

use crate::constants::ConfigProperty;
use caconfig_meta::RankedServices;
use caconfig_resource::{Resource, ValueMap, ValueMapExt};
use std::sync::Arc;

/// Reduces an inheritance chain to the effective configuration resource.
pub trait ConfigurationInheritanceStrategy: Send + Sync {
    /// Effective resource for `chain` (nearest first), or `None` when the
    /// strategy is not responsible.
    fn get_resource(&self, chain: &mut dyn Iterator<Item = Resource>) -> Option<Resource>;
}

/// Merges along the chain while `sling:configPropertyInherit` is set.
#[derive(Debug, Clone)]
pub struct DefaultConfigurationInheritanceStrategy {
    enabled: bool,
}

impl Default for DefaultConfigurationInheritanceStrategy {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl DefaultConfigurationInheritanceStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    fn merge(chain: &mut dyn Iterator<Item = Resource>) -> Option<Resource> {
        let primary = chain.next()?;
        if !is_property_inheritance(&primary) {
            return Some(primary);
        }
        let Some(inherited) = Self::merge(chain) else {
            return Some(primary);
        };

        let mut merged: ValueMap = inherited.value_map().clone();
        for (name, value) in primary.value_map() {
            merged.insert(name.clone(), value.clone());
        }
        merged.remove(ConfigProperty::PropertyInherit.as_str());
        tracing::trace!(primary = %primary.path(), inherited = %inherited.path(), "Merged inherited properties");
        Some(Resource::new(primary.path().clone(), merged))
    }
}

impl ConfigurationInheritanceStrategy for DefaultConfigurationInheritanceStrategy {
    fn get_resource(&self, chain: &mut dyn Iterator<Item = Resource>) -> Option<Resource> {
        if !self.enabled {
            return None;
        }
        Self::merge(chain)
    }
}

fn is_property_inheritance(resource: &Resource) -> bool {
    resource
        .value_map()
        .is_true(ConfigProperty::PropertyInherit.as_str())
}

/// Merge collection item levels (nearest first) into one chain per item.
///
/// Items are matched by name. Items of the nearest level come first in their
/// own order, followed by the items only ancestors define, in ancestor
/// order. Each chain lists the same-named item of every level, nearest first.
pub fn merge_collection_levels(levels: Vec<Vec<Resource>>) -> Vec<Vec<Resource>> {
    let mut chains: Vec<(String, Vec<Resource>)> = Vec::new();
    for level in levels {
        for item in level {
            let name = item.name().to_string();
            match chains.iter_mut().find(|(existing, _)| *existing == name) {
                Some((_, chain)) => chain.push(item),
                None => chains.push((name, vec![item])),
            }
        }
    }
    chains.into_iter().map(|(_, chain)| chain).collect()
}

/// Asks the bound inheritance strategies in rank order.
#[derive(Debug, Default)]
pub struct ConfigurationInheritanceStrategyMultiplexer {
    strategies: RankedServices<dyn ConfigurationInheritanceStrategy>,
}

impl ConfigurationInheritanceStrategyMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, strategy: Arc<dyn ConfigurationInheritanceStrategy>, properties: &ValueMap) {
        self.strategies.bind(strategy, properties);
    }

    pub fn unbind(&self, strategy: &Arc<dyn ConfigurationInheritanceStrategy>) -> bool {
        self.strategies.unbind(strategy)
    }
}

impl ConfigurationInheritanceStrategy for ConfigurationInheritanceStrategyMultiplexer {
    fn get_resource(&self, chain: &mut dyn Iterator<Item = Resource>) -> Option<Resource> {
        let strategies = self.strategies.snapshot();
        match strategies.len() {
            0 => None,
            // a single strategy may consume the chain lazily
            1 => strategies.iter().next()?.get_resource(chain),
            _ => {
                let resources: Vec<Resource> = chain.collect();
                strategies
                    .iter()
                    .find_map(|strategy| strategy.get_resource(&mut resources.iter().cloned()))
            }
        }
    }
}
