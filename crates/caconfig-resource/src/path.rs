//! Normalized resource path handling

use serde::{Deserialize, Serialize};

/// An absolute resource path normalized to forward slashes.
///
/// Empty and `.` segments are dropped, backslashes are treated as
/// separators and `..` pops the previous segment without ever climbing
/// above the root. The root itself is `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ResourcePath {
    /// Always starts with `/`, never ends with `/` unless it is the root
    inner: String,
}

impl ResourcePath {
    /// Create a new path from any string input.
    pub fn new(path: impl AsRef<str>) -> Self {
        Self {
            inner: clean(path.as_ref()),
        }
    }

    /// The root path `/`.
    pub fn root() -> Self {
        Self {
            inner: "/".to_string(),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    pub fn is_root(&self) -> bool {
        self.inner == "/"
    }

    /// Join this path with a relative segment (which may itself contain slashes).
    pub fn join(&self, segment: &str) -> Self {
        Self::new(format!("{}/{}", self.inner, segment))
    }

    /// Get the parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.inner.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            None => None,
        }
    }

    /// The last path segment; empty for the root.
    pub fn name(&self) -> &str {
        self.inner.rsplit('/').next().unwrap_or_default()
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        if self.is_root() {
            0
        } else {
            self.inner.matches('/').count()
        }
    }

    /// This path followed by all its ancestors up to the root, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = ResourcePath> {
        std::iter::successors(Some(self.clone()), |path| path.parent())
    }

    /// Check whether this path equals `other` or lies below it.
    pub fn is_descendant_of(&self, other: &ResourcePath) -> bool {
        if other.is_root() || self.inner == other.inner {
            return true;
        }
        self.inner.starts_with(&other.inner) && self.inner[other.inner.len()..].starts_with('/')
    }
}

fn clean(raw: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in raw.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

impl AsRef<str> for ResourcePath {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl std::fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for ResourcePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ResourcePath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&ResourcePath> for ResourcePath {
    fn from(p: &ResourcePath) -> Self {
        p.clone()
    }
}

impl From<ResourcePath> for String {
    fn from(p: ResourcePath) -> Self {
        p.inner
    }
}
