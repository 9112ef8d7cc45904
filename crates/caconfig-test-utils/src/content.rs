//! [`ContentBuilder`] for resource tree fixtures.

use caconfig_resource::{MemoryResourceResolver, Resource, ResourcePath, ResourceResolver, ValueMap};
use serde_json::Value;
use std::sync::Arc;

/// Builds an in-memory resource tree for tests.
///
/// # Example
///
/// ```rust
/// use caconfig_test_utils::ContentBuilder;
/// use serde_json::json;
///
/// let builder = ContentBuilder::new();
/// builder
///     .context("/content/site1", "/conf/site1")
///     .resource("/conf/site1/sling:configs/my.Config", json!({"param1": "value1"}))
///     .siblings(
///         "/conf/site1/sling:configs/my.List",
///         &[("item1", json!({"a": 1})), ("item2", json!({"a": 2}))],
///     );
///
/// assert_eq!(builder.get("/conf/site1/sling:configs/my.List/item2").name(), "item2");
/// ```
pub struct ContentBuilder {
    tree: Arc<MemoryResourceResolver>,
}

impl Default for ContentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentBuilder {
    pub fn new() -> Self {
        Self {
            tree: Arc::new(MemoryResourceResolver::new()),
        }
    }

    /// Create or replace a resource. `properties` must be a JSON object.
    pub fn resource(&self, path: &str, properties: Value) -> &Self {
        self.tree
            .create_or_update(&ResourcePath::new(path), object(path, properties))
            .unwrap_or_else(|e| panic!("ContentBuilder::resource: cannot create {path}: {e}"));
        self
    }

    /// Mark a content resource as context resource referencing `config_ref`.
    ///
    /// Existing properties of the resource are kept.
    pub fn context(&self, path: &str, config_ref: &str) -> &Self {
        let path = ResourcePath::new(path);
        let mut properties = self
            .tree
            .get_resource(&path)
            .map(|resource| resource.value_map().clone())
            .unwrap_or_default();
        properties.insert("sling:configRef".to_string(), Value::from(config_ref));
        self.tree
            .create_or_update(&path, properties)
            .unwrap_or_else(|e| panic!("ContentBuilder::context: cannot create {path}: {e}"));
        self
    }

    /// Create ordered child resources below `parent`.
    pub fn siblings(&self, parent: &str, children: &[(&str, Value)]) -> &Self {
        let parent_path = ResourcePath::new(parent);
        if self.tree.get_resource(&parent_path).is_none() {
            self.resource(parent, Value::Object(ValueMap::new()));
        }
        for (name, properties) in children {
            self.resource(parent_path.join(name).as_str(), properties.clone());
        }
        self
    }

    /// Resource at `path`; panics if it does not exist.
    pub fn get(&self, path: &str) -> Resource {
        self.tree
            .get_resource(&ResourcePath::new(path))
            .unwrap_or_else(|| panic!("ContentBuilder::get: no resource at {path}"))
    }

    pub fn tree(&self) -> Arc<MemoryResourceResolver> {
        Arc::clone(&self.tree)
    }
}

fn object(path: &str, properties: Value) -> ValueMap {
    match properties {
        Value::Object(map) => map,
        other => panic!("ContentBuilder: properties of {path} must be an object, got {other}"),
    }
}
