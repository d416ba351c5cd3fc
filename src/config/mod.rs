//! Configuration
//!
//! Layered settings: built-in defaults, global file, explicit file, environment.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod storage_paths;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use storage_paths::StorageConfig;

use crate::logging::LoggingConfig;
use crate::registry::CHUNK_SIZE_BYTES;
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides, e.g. `DFS_CONSOLE__SIMULATION__SEED=7`
pub const ENV_PREFIX: &str = "DFS_CONSOLE";

/// Application directory name under XDG roots
pub const APP_DIR: &str = "dfs-console";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DfsConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DfsConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.simulation.validate()
    }
}

/// Upload simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Time between progress ticks
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Upper bound (exclusive) of a single progress increment, in percent
    #[serde(default = "default_max_increment")]
    pub max_increment: f64,

    /// Number of catalog nodes labels are drawn from
    #[serde(default = "default_node_count")]
    pub node_count: u32,

    /// Replica labels attached to each uploaded record
    #[serde(default = "default_replica_count")]
    pub replica_count: usize,

    #[serde(default = "default_chunk_size_bytes")]
    pub chunk_size_bytes: u64,

    /// Fixed RNG seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,

    /// Owner used when an upload names no user
    #[serde(default = "default_user")]
    pub default_user: String,
}

fn default_tick_interval_ms() -> u64 {
    500
}

fn default_max_increment() -> f64 {
    15.0
}

fn default_node_count() -> u32 {
    5
}

fn default_replica_count() -> usize {
    2
}

fn default_chunk_size_bytes() -> u64 {
    CHUNK_SIZE_BYTES
}

fn default_user() -> String {
    "aditya".to_string()
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            max_increment: default_max_increment(),
            node_count: default_node_count(),
            replica_count: default_replica_count(),
            chunk_size_bytes: default_chunk_size_bytes(),
            seed: None,
            default_user: default_user(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_interval_ms == 0 {
            return Err("simulation.tick_interval_ms must be greater than zero".to_string());
        }
        if !self.max_increment.is_finite() || self.max_increment <= 0.0 {
            return Err(format!(
                "simulation.max_increment must be a positive number, got {}",
                self.max_increment
            ));
        }
        if self.node_count == 0 {
            return Err("simulation.node_count must be at least 1".to_string());
        }
        if self.chunk_size_bytes == 0 {
            return Err("simulation.chunk_size_bytes must be greater than zero".to_string());
        }
        if self.default_user.trim().is_empty() {
            return Err("simulation.default_user cannot be empty".to_string());
        }
        Ok(())
    }
}
