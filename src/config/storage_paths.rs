//! StorageConfig and resolution of the registry database path.

use super::xdg;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name of the registry database inside the data directory
pub const REGISTRY_DB_NAME: &str = "registry.sled";

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the registry database; None means the XDG data dir
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the data directory, honoring an explicit override first
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ApiError> {
        match &self.data_dir {
            Some(dir) if !dir.as_os_str().is_empty() => Ok(dir.clone()),
            _ => xdg::app_data_dir(),
        }
    }

    pub fn registry_db_path(&self) -> Result<PathBuf, ApiError> {
        Ok(self.resolve_data_dir()?.join(REGISTRY_DB_NAME))
    }
}
