//! Ordered in-memory resource tree

use crate::{Error, Resource, ResourcePath, ResourceResolver, Result, ValueMap};
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Debug)]
struct Node {
    resource: Resource,
    /// Child names in insertion order
    children: Vec<String>,
}

impl Node {
    fn new(path: ResourcePath, properties: ValueMap) -> Self {
        Self {
            resource: Resource::new(path, properties),
            children: Vec::new(),
        }
    }
}

/// In-memory [`ResourceResolver`].
///
/// The root resource always exists. Children keep their insertion order;
/// replacing a resource's properties keeps its position.
#[derive(Debug)]
pub struct MemoryResourceResolver {
    nodes: RwLock<BTreeMap<ResourcePath, Node>>,
}

impl Default for MemoryResourceResolver {
    fn default() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            ResourcePath::root(),
            Node::new(ResourcePath::root(), ValueMap::new()),
        );
        Self {
            nodes: RwLock::new(nodes),
        }
    }
}

impl MemoryResourceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of resources in the tree, root included.
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// All resource paths in sorted order.
    pub fn paths(&self) -> Vec<ResourcePath> {
        self.nodes.read().keys().cloned().collect()
    }

    fn ensure_ancestors(nodes: &mut BTreeMap<ResourcePath, Node>, path: &ResourcePath) {
        let mut missing: Vec<ResourcePath> = path
            .ancestors()
            .skip(1)
            .take_while(|ancestor| !nodes.contains_key(ancestor))
            .collect();
        missing.reverse();
        for ancestor in missing {
            Self::link(nodes, &ancestor);
            nodes.insert(ancestor.clone(), Node::new(ancestor, ValueMap::new()));
        }
    }

    fn link(nodes: &mut BTreeMap<ResourcePath, Node>, path: &ResourcePath) {
        if let Some(parent) = path.parent().and_then(|parent| nodes.get_mut(&parent)) {
            parent.children.push(path.name().to_string());
        }
    }
}

impl ResourceResolver for MemoryResourceResolver {
    fn get_resource(&self, path: &ResourcePath) -> Option<Resource> {
        self.nodes.read().get(path).map(|node| node.resource.clone())
    }

    fn children(&self, resource: &Resource) -> Vec<Resource> {
        let nodes = self.nodes.read();
        let Some(node) = nodes.get(resource.path()) else {
            return Vec::new();
        };
        node.children
            .iter()
            .filter_map(|name| nodes.get(&resource.path().join(name)))
            .map(|child| child.resource.clone())
            .collect()
    }

    fn create_or_update(&self, path: &ResourcePath, properties: ValueMap) -> Result<Resource> {
        if path.is_root() {
            return Err(Error::RootModification);
        }

        let mut nodes = self.nodes.write();
        let resource = Resource::new(path.clone(), properties);
        if let Some(node) = nodes.get_mut(path) {
            node.resource = resource.clone();
            tracing::trace!(path = %path, "Updated resource");
            return Ok(resource);
        }

        Self::ensure_ancestors(&mut nodes, path);
        Self::link(&mut nodes, path);
        nodes.insert(
            path.clone(),
            Node {
                resource: resource.clone(),
                children: Vec::new(),
            },
        );
        tracing::trace!(path = %path, "Created resource");
        Ok(resource)
    }

    fn delete(&self, path: &ResourcePath) -> Result<bool> {
        if path.is_root() {
            return Err(Error::RootModification);
        }

        let mut nodes = self.nodes.write();
        if !nodes.contains_key(path) {
            return Ok(false);
        }

        nodes.retain(|candidate, _| !candidate.is_descendant_of(path));
        if let Some(parent) = path.parent().and_then(|parent| nodes.get_mut(&parent)) {
            parent.children.retain(|name| name != path.name());
        }
        tracing::trace!(path = %path, "Deleted resource subtree");
        Ok(true)
    }
}
