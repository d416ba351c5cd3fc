//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::DfsConfig;
use crate::error::ApiError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file and environment.
    pub fn load() -> Result<DfsConfig, ApiError> {
        Self::validated(MergeService::load()?)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<DfsConfig, ApiError> {
        Self::validated(MergeService::load_from_file(path)?)
    }

    /// Load from `path` when given, otherwise from standard sources.
    pub fn load_with_override(path: Option<&Path>) -> Result<DfsConfig, ApiError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    /// Create default configuration.
    pub fn default() -> DfsConfig {
        DfsConfig::default()
    }

    fn validated(config: DfsConfig) -> Result<DfsConfig, ApiError> {
        config.validate().map_err(ApiError::ConfigError)?;
        Ok(config)
    }
}
