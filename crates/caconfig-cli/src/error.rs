//! Error types for caconfig-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from caconfig-core
    #[error(transparent)]
    Core(#[from] caconfig_core::Error),

    /// Error from caconfig-meta
    #[error(transparent)]
    Meta(#[from] caconfig_meta::Error),

    /// Error from caconfig-resource
    #[error(transparent)]
    Resource(#[from] caconfig_resource::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
