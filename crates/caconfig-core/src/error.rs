//! Error types for caconfig-core

/// Result type for caconfig-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in caconfig-core operations
///
/// A configuration that does not exist is never an error; lookups return
/// `None` or an empty collection instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Metadata error from caconfig-meta, including invalid configuration names
    #[error(transparent)]
    Meta(#[from] caconfig_meta::Error),

    /// Resource tree error from caconfig-resource
    #[error(transparent)]
    Resource(#[from] caconfig_resource::Error),

    /// The configuration could not be mapped to the requested shape or type
    #[error("Cannot resolve configuration '{config_name}': {message}")]
    ConfigurationResolve {
        config_name: String,
        message: String,
    },

    #[error("No configuration name given")]
    MissingConfigName,

    #[error("Collection item at index {index} has no name")]
    MissingCollectionItemName { index: usize },

    #[error("Invalid collection item name '{name}' at index {index}")]
    InvalidCollectionItemName { index: usize, name: String },

    #[error("Invalid override '{line}': {reason}")]
    InvalidOverride { line: String, reason: &'static str },

    #[error("Unsupported operation: {operation}")]
    UnsupportedOperation { operation: &'static str },
}

impl Error {
    pub(crate) fn resolve(config_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigurationResolve {
            config_name: config_name.into(),
            message: message.into(),
        }
    }
}
