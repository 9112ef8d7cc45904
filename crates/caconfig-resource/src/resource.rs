//! Resource handles and the resource tree collaborator

use crate::{ResourcePath, Result, ValueMap, ValueMapExt};
use std::sync::Arc;

/// Property holding the resource type of a resource.
pub const RESOURCE_TYPE_PROPERTY: &str = "sling:resourceType";

/// Immutable handle to a resource in the tree.
///
/// Cloning is cheap and keeps identity: two handles are the *same* resource
/// only if [`Resource::ptr_eq`] holds. `==` compares path and properties.
#[derive(Debug, Clone)]
pub struct Resource(Arc<ResourceData>);

#[derive(Debug, PartialEq)]
struct ResourceData {
    path: ResourcePath,
    properties: ValueMap,
}

impl Resource {
    pub fn new(path: impl Into<ResourcePath>, properties: ValueMap) -> Self {
        Self(Arc::new(ResourceData {
            path: path.into(),
            properties,
        }))
    }

    pub fn path(&self) -> &ResourcePath {
        &self.0.path
    }

    pub fn name(&self) -> &str {
        self.0.path.name()
    }

    /// The resource's property map.
    pub fn value_map(&self) -> &ValueMap {
        &self.0.properties
    }

    pub fn resource_type(&self) -> Option<&str> {
        self.0.properties.get_str(RESOURCE_TYPE_PROPERTY)
    }

    /// Identity comparison.
    pub fn ptr_eq(a: &Resource, b: &Resource) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other) || self.0 == other.0
    }
}

/// Hierarchical resource tree supplied by the host.
///
/// Reads never fail: a missing resource is `None`. Child order is
/// significant and must be stable.
pub trait ResourceResolver: Send + Sync {
    fn get_resource(&self, path: &ResourcePath) -> Option<Resource>;

    /// Direct children of `resource` in tree order.
    fn children(&self, resource: &Resource) -> Vec<Resource>;

    fn parent(&self, resource: &Resource) -> Option<Resource> {
        resource
            .path()
            .parent()
            .and_then(|parent| self.get_resource(&parent))
    }

    /// Child (or deeper descendant) at a relative path.
    fn child(&self, resource: &Resource, relative_path: &str) -> Option<Resource> {
        self.get_resource(&resource.path().join(relative_path))
    }

    /// Create the resource at `path` (with any missing ancestors) or replace
    /// the property map of the existing one.
    fn create_or_update(&self, path: &ResourcePath, properties: ValueMap) -> Result<Resource>;

    /// Delete the resource and its subtree. Returns `false` if nothing existed.
    fn delete(&self, path: &ResourcePath) -> Result<bool>;
}

impl<T: ResourceResolver + ?Sized> ResourceResolver for Arc<T> {
    fn get_resource(&self, path: &ResourcePath) -> Option<Resource> {
        (**self).get_resource(path)
    }

    fn children(&self, resource: &Resource) -> Vec<Resource> {
        (**self).children(resource)
    }

    fn parent(&self, resource: &Resource) -> Option<Resource> {
        (**self).parent(resource)
    }

    fn child(&self, resource: &Resource, relative_path: &str) -> Option<Resource> {
        (**self).child(resource, relative_path)
    }

    fn create_or_update(&self, path: &ResourcePath, properties: ValueMap) -> Result<Resource> {
        (**self).create_or_update(path, properties)
    }

    fn delete(&self, path: &ResourcePath) -> Result<bool> {
        (**self).delete(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_and_equality() {
        let mut props = ValueMap::new();
        props.insert(RESOURCE_TYPE_PROPERTY.into(), json!("app/page"));

        let a = Resource::new("/content/a", props.clone());
        let b = a.clone();
        let c = Resource::new("/content/a", props);

        assert!(Resource::ptr_eq(&a, &b));
        assert!(!Resource::ptr_eq(&a, &c));
        assert_eq!(a, c);
        assert_eq!(a.name(), "a");
        assert_eq!(a.resource_type(), Some("app/page"));
    }
}
