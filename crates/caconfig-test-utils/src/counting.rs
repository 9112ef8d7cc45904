//! [`CountingResolver`] recording how often the tree is read.

use caconfig_resource::{Resource, ResourcePath, ResourceResolver, Result, ValueMap};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Wraps a resolver and counts every read.
pub struct CountingResolver<R> {
    inner: R,
    lookups: AtomicUsize,
}

impl<R: ResourceResolver> CountingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            lookups: AtomicUsize::new(0),
        }
    }

    /// Number of `get_resource` and `children` calls so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.lookups.store(0, Ordering::SeqCst);
    }
}

impl<R: ResourceResolver> ResourceResolver for CountingResolver<R> {
    fn get_resource(&self, path: &ResourcePath) -> Option<Resource> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_resource(path)
    }

    fn children(&self, resource: &Resource) -> Vec<Resource> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.children(resource)
    }

    fn create_or_update(&self, path: &ResourcePath, properties: ValueMap) -> Result<Resource> {
        self.inner.create_or_update(path, properties)
    }

    fn delete(&self, path: &ResourcePath) -> Result<bool> {
        self.inner.delete(path)
    }
}
