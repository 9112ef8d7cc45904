//! Configuration resource resolving strategies
//!
//! A resolving strategy locates configuration resources for a content
//! resource: it turns the context resources into an ordered list of lookup
//! paths and searches the bucket below each of them.

mod default;
mod multiplexer;

pub use default::DefaultConfigurationResourceResolvingStrategy;
pub use multiplexer::ConfigurationResourceResolvingStrategyMultiplexer;

use caconfig_resource::{Resource, ResourcePath, ResourceResolver};

/// Lazy sequence of configuration resources, nearest first.
pub type ResourceChain<'a> = Box<dyn Iterator<Item = Resource> + 'a>;

/// Resolving strategy contract.
///
/// Every operation returns `None` when the strategy is not responsible.
/// `bucket_names` are in order of preference and are never reordered.
pub trait ConfigurationResourceResolvingStrategy: Send + Sync {
    /// Nearest configuration resource.
    fn get_resource(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
        bucket_names: &[&str],
        config_name: &str,
    ) -> Option<Resource>;

    /// Nearest resource of every collection item, in collection order.
    fn get_resource_collection(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
        bucket_names: &[&str],
        config_name: &str,
    ) -> Option<Vec<Resource>>;

    /// Every configuration resource that may contribute to the configuration,
    /// nearest first.
    fn get_resource_inheritance_chain<'a>(
        &self,
        resolver: &'a dyn ResourceResolver,
        resource: &Resource,
        bucket_names: &[&str],
        config_name: &str,
    ) -> Option<ResourceChain<'a>>;

    /// One inheritance chain per collection item, in collection order.
    fn get_resource_collection_inheritance_chain(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
        bucket_names: &[&str],
        config_name: &str,
    ) -> Option<Vec<Vec<Resource>>>;

    /// Path a configuration for the content resource would be written to.
    fn get_resource_path(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
        bucket_name: &str,
        config_name: &str,
    ) -> Option<ResourcePath>;

    /// Path a configuration collection parent would be written to.
    fn get_resource_collection_parent_path(
        &self,
        resolver: &dyn ResourceResolver,
        resource: &Resource,
        bucket_name: &str,
        config_name: &str,
    ) -> Option<ResourcePath>;
}
