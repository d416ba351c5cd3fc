//! Error types for the registry, simulator, and CLI surfaces.

use thiserror::Error;

/// Failures of the persistent key-value medium.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Key-value store error: {0}")]
    Sled(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// User-facing validation failures. These never alter persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No file selected: please select a file to upload")]
    NoFileSelected,

    #[error("Invalid user name: please enter a valid user name")]
    EmptyUserName,

    #[error("Unknown user: {0}")]
    UnknownUser(String),
}

/// Top-level error returned by CLI and service entry points.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
