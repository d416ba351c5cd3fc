//! MergeService: layers config sources and deserializes them into DfsConfig.

use crate::config::sources::{environment, global_file};
use crate::config::DfsConfig;
use config::{Config, ConfigError, File, FileFormat};
use std::path::Path;

/// Merge service for config composition.
///
/// Field defaults live on the serde structs, so a section or key missing
/// from every source still deserializes.
pub struct MergeService;

impl MergeService {
    /// Load config from standard sources.
    /// Precedence: global file (lowest) -> environment (highest).
    pub fn load() -> Result<DfsConfig, ConfigError> {
        let builder = Config::builder();
        let builder = global_file::add_to_builder(builder)?;
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    /// The global file is skipped; the explicit file must exist.
    pub fn load_from_file(path: &Path) -> Result<DfsConfig, ConfigError> {
        let builder = Config::builder();
        let builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }
}
