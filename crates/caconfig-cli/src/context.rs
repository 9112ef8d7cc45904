//! Loaded content tree and configuration services for one invocation

use caconfig_core::CaConfig;
use caconfig_meta::{CaConfigSettings, load_settings};
use caconfig_resource::{DocumentLoader, MemoryResourceResolver, Resource, ResourcePath, ResourceResolver};
use std::path::Path;

use crate::error::{CliError, Result};

pub struct CliContext {
    pub tree: MemoryResourceResolver,
    pub caconfig: CaConfig,
}

impl CliContext {
    /// Load the content tree and settings. Extra run modes switch on run
    /// mode aware resolution.
    pub fn load(tree: Option<&Path>, settings: Option<&Path>, run_modes: &[String]) -> Result<Self> {
        let tree_path = tree.ok_or_else(|| {
            CliError::user("No content tree given. Use --tree <FILE> or set CACONFIG_TREE.")
        })?;
        let tree = DocumentLoader::new().load_tree(tree_path)?;

        let mut settings = match settings {
            Some(path) => load_settings(path)?,
            None => CaConfigSettings::default(),
        };
        if !run_modes.is_empty() {
            settings.resolving.run_mode_aware = true;
            settings.resolving.run_modes.splice(0..0, run_modes.iter().cloned());
        }
        tracing::debug!(
            tree = %tree_path.display(),
            resources = tree.len(),
            run_modes = ?settings.resolving.run_modes,
            "Loaded CLI context"
        );

        Ok(Self {
            tree,
            caconfig: CaConfig::from_settings(&settings),
        })
    }

    /// The content resource at `path`.
    pub fn resource(&self, path: &str) -> Result<Resource> {
        self.tree
            .get_resource(&ResourcePath::new(path))
            .ok_or_else(|| CliError::user(format!("No resource at {path}")))
    }
}
