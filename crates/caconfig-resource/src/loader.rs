//! Format-agnostic document loading

use crate::{Error, MemoryResourceResolver, ResourcePath, ResourceResolver, Result, ValueMap};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();
        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

/// Loads settings files and content trees.
///
/// Format is detected from file extension:
/// - `.toml` -> TOML
/// - `.json` -> JSON
/// - `.yaml`, `.yml` -> YAML
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentLoader;

impl DocumentLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load and deserialize a document.
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let format = DocumentFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        self.parse(&content, format)
            .map_err(|message| Error::DocumentParse {
                path: path.to_path_buf(),
                format: format.as_str().into(),
                message,
            })
    }

    fn parse<T: DeserializeOwned>(
        &self,
        content: &str,
        format: DocumentFormat,
    ) -> std::result::Result<T, String> {
        match format {
            DocumentFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }

    /// Load a content tree document into a fresh in-memory tree.
    ///
    /// Object-valued keys become child resources, every other value becomes
    /// a property of the enclosing resource.
    pub fn load_tree(&self, path: &Path) -> Result<MemoryResourceResolver> {
        let document: Value = self.load(path)?;
        let tree = tree_from_value(&document)?;
        tracing::debug!(path = %path.display(), resources = tree.len(), "Loaded content tree");
        Ok(tree)
    }
}

/// Build an in-memory tree from a nested document value.
pub fn tree_from_value(document: &Value) -> Result<MemoryResourceResolver> {
    let tree = MemoryResourceResolver::new();
    let Value::Object(root) = document else {
        return Err(Error::InvalidTree {
            message: "document root must be an object".into(),
        });
    };
    if let Some((key, _)) = root.iter().find(|(_, value)| !value.is_object()) {
        return Err(Error::InvalidTree {
            message: format!("property '{key}' cannot be set on the root resource"),
        });
    }
    add_children(&tree, &ResourcePath::root(), root)?;
    Ok(tree)
}

fn add_children(
    tree: &MemoryResourceResolver,
    parent: &ResourcePath,
    entries: &ValueMap,
) -> Result<()> {
    for (name, value) in entries {
        let Value::Object(body) = value else {
            continue;
        };
        let path = parent.join(name);
        let properties: ValueMap = body
            .iter()
            .filter(|(_, v)| !v.is_object())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        tree.create_or_update(&path, properties)?;
        add_children(tree, &path, body)?;
    }
    Ok(())
}
