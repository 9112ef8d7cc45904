//! Error types for caconfig-meta

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Resource(#[from] caconfig_resource::Error),

    #[error("Invalid configuration name '{name}': {reason}")]
    InvalidConfigName { name: String, reason: &'static str },

    #[error("Invalid settings: {message}")]
    InvalidSettings { message: String },
}
