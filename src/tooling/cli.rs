//! CLI Tooling
//!
//! Command-line interface for the console: browse and manage the file
//! registry, manage users, run simulated uploads, and view analytics.

use crate::config::DfsConfig;
use crate::error::{ApiError, StorageError, ValidationError};
use crate::nodes::catalog;
use crate::registry::{FileRecord, RegistryStore, SledRegistryRepository};
use crate::tooling::format::{
    format_analytics_text, format_dashboard_text, format_file_detail_text, format_files_text,
    format_nodes_text, format_upload_progress, format_upload_result_text, format_users_text,
};
use crate::upload::{LocalFile, UploadSimulator};
use crate::views::{
    dashboard_summary, download_placeholder, file_size_distribution, filter_files, node_storage,
    recent_files, uploads_per_user, RECENT_FILES,
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// DFS Console - simulated distributed file storage
#[derive(Parser)]
#[command(name = "dfs-console")]
#[command(about = "Console for a simulated distributed file storage system")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (replaces the global config file)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the registry database
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold command-line overrides into loaded configuration.
    pub fn apply_overrides(&self, config: &mut DfsConfig) {
        if let Some(ref dir) = self.data_dir {
            config.storage.data_dir = Some(dir.clone());
        }
        if let Some(ref level) = self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(ref format) = self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(ref output) = self.log_output {
            config.logging.output = output.clone();
        }
        if let Some(ref file) = self.log_file {
            config.logging.file = Some(file.clone());
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show storage totals, node status, and the most recent uploads
    Dashboard {
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Browse and manage file records
    Files {
        #[command(subcommand)]
        command: FilesCommands,
    },
    /// Manage known users
    Users {
        #[command(subcommand)]
        command: UsersCommands,
    },
    /// Simulate uploading a local file
    Upload {
        /// File to upload
        path: Option<PathBuf>,
        /// Owner of the upload (defaults to simulation.default_user)
        #[arg(long)]
        user: Option<String>,
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Uploads per user, per-file sizes, and capacity summary
    Analytics {
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// List storage nodes
    Nodes {
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Subcommand)]
pub enum FilesCommands {
    /// List files, most recent first
    List {
        /// Case-insensitive filter on filename or owner
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Show metadata for one file
    Show {
        id: String,
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Delete a file record
    Delete { id: String },
    /// Write placeholder content for a file
    Download {
        id: String,
        /// Destination file or directory (defaults to the current directory).
        /// Existing files are never overwritten.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum UsersCommands {
    /// List known users with their upload counts
    List {
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Register a user (names are lowercased)
    Add { name: String },
}

/// CLI context holding configuration and the opened registry
pub struct CliContext {
    config: DfsConfig,
    store: Arc<RegistryStore>,
}

impl CliContext {
    /// Open the sled-backed registry under the configured data directory.
    pub fn new(config: DfsConfig) -> Result<Self, ApiError> {
        let db_path = config.storage.registry_db_path()?;
        let repository = SledRegistryRepository::open(&db_path)?;
        info!(path = %db_path.display(), "Opened registry");
        let store = RegistryStore::open(Arc::new(repository));
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Context over an already opened store
    pub fn with_store(config: DfsConfig, store: Arc<RegistryStore>) -> Self {
        Self { config, store }
    }

    pub fn store(&self) -> &Arc<RegistryStore> {
        &self.store
    }

    /// Execute a command and return its printable output
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Dashboard { format } => self.handle_dashboard(format),
            Commands::Files { command } => self.handle_files(command),
            Commands::Users { command } => self.handle_users(command),
            Commands::Upload { path, user, format } => {
                self.handle_upload(path.as_deref(), user.as_deref(), format)
            }
            Commands::Analytics { format } => self.handle_analytics(format),
            Commands::Nodes { format } => {
                let nodes = catalog();
                if format == "json" {
                    to_json(&nodes)
                } else {
                    Ok(format_nodes_text(&nodes))
                }
            }
            Commands::Config => toml::to_string_pretty(&self.config)
                .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e))),
        }
    }

    fn handle_dashboard(&self, format: &str) -> Result<String, ApiError> {
        let files = self.store.list_files();
        let nodes = catalog();
        let summary = dashboard_summary(&files, &nodes);
        let recent = recent_files(&files, RECENT_FILES);
        if format == "json" {
            to_json(&json!({
                "summary": summary,
                "nodes": nodes,
                "recentFiles": recent,
            }))
        } else {
            Ok(format_dashboard_text(&summary, &nodes, recent))
        }
    }

    fn handle_files(&self, command: &FilesCommands) -> Result<String, ApiError> {
        match command {
            FilesCommands::List { search, format } => {
                let files = self.store.list_files();
                let query = search.as_deref().unwrap_or("");
                let matched = filter_files(&files, query);
                if format == "json" {
                    to_json(&matched)
                } else {
                    Ok(format_files_text(&matched, search.as_deref()))
                }
            }
            FilesCommands::Show { id, format } => {
                let record = self.require_file(id)?;
                if format == "json" {
                    to_json(&record)
                } else {
                    Ok(format_file_detail_text(&record))
                }
            }
            FilesCommands::Delete { id } => {
                if self.store.delete_file(id) {
                    Ok(format!("Deleted file {}", id))
                } else {
                    Ok(format!("No file with id {}; nothing deleted", id))
                }
            }
            FilesCommands::Download { id, output } => {
                let record = self.require_file(id)?;
                let body = download_placeholder(&record.filename, &Utc::now());
                let target = match output {
                    Some(path) if !path.is_dir() => {
                        write_new_file(path, &body)?;
                        path.clone()
                    }
                    Some(dir) => write_into_dir(dir, &record.filename, &body)?,
                    None => write_into_dir(Path::new("."), &record.filename, &body)?,
                };
                info!(id = %id, target = %target.display(), "Wrote download placeholder");
                Ok(format!(
                    "Downloaded {} to {}",
                    record.filename,
                    target.display()
                ))
            }
        }
    }

    fn handle_users(&self, command: &UsersCommands) -> Result<String, ApiError> {
        match command {
            UsersCommands::List { format } => {
                let users = self.store.list_users();
                let counts = uploads_per_user(&self.store.list_files());
                if format == "json" {
                    let rows: Vec<_> = users
                        .iter()
                        .map(|user| {
                            let uploads = counts
                                .iter()
                                .find(|c| &c.user == user)
                                .map(|c| c.uploads)
                                .unwrap_or(0);
                            json!({ "user": user, "uploads": uploads })
                        })
                        .collect();
                    to_json(&rows)
                } else {
                    Ok(format_users_text(&users, &counts))
                }
            }
            UsersCommands::Add { name } => {
                let normalized = name.trim().to_lowercase();
                if self.store.add_user(name)? {
                    Ok(format!("Added user {}", normalized))
                } else {
                    Ok(format!("User {} already exists", normalized))
                }
            }
        }
    }

    fn handle_analytics(&self, format: &str) -> Result<String, ApiError> {
        let files = self.store.list_files();
        let nodes = catalog();
        let summary = dashboard_summary(&files, &nodes);
        let per_node = node_storage(&nodes);
        let per_user = uploads_per_user(&files);
        let sizes = file_size_distribution(&files);
        if format == "json" {
            to_json(&json!({
                "summary": summary,
                "storagePerNode": per_node,
                "uploadsPerUser": per_user,
                "fileSizes": sizes,
            }))
        } else {
            Ok(format_analytics_text(&summary, &per_node, &per_user, &sizes))
        }
    }

    /// Run one simulated upload to completion, reporting each tick on stderr.
    fn handle_upload(
        &self,
        path: Option<&Path>,
        user: Option<&str>,
        format: &str,
    ) -> Result<String, ApiError> {
        let owner = user
            .unwrap_or(&self.config.simulation.default_user)
            .trim()
            .to_lowercase();
        if !self.store.contains_user(&owner) {
            return Err(ValidationError::UnknownUser(owner).into());
        }
        let file = path.map(LocalFile::from_path).transpose()?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;

        let finished = runtime.block_on(async {
            let simulator =
                UploadSimulator::from_config(Arc::clone(&self.store), &self.config.simulation);
            let handle = simulator.start_upload(file, &owner)?;

            let mut seen = 0.0;
            while let Some(task) = simulator.wait_for_progress(handle.task_id(), seen).await {
                eprintln!("{}", format_upload_progress(&task));
                seen = task.progress_percent;
                if task.status.is_terminal() {
                    return Ok::<_, ApiError>(Some(task));
                }
            }
            Ok(None)
        })?;

        let Some(task) = finished else {
            warn!(owner = %owner, "Upload ended without a result");
            return Err(ApiError::NotFound("upload task".to_string()));
        };
        let record = task.file_id.as_deref().and_then(|id| self.store.get_file(id));

        if format == "json" {
            to_json(&json!({ "task": task, "file": record }))
        } else {
            Ok(format_upload_result_text(&task, record.as_ref()))
        }
    }

    fn require_file(&self, id: &str) -> Result<FileRecord, ApiError> {
        self.store
            .get_file(id)
            .ok_or_else(|| ApiError::NotFound(format!("file {}", id)))
    }
}

/// Name used when a record's filename has no final path component
const FALLBACK_DOWNLOAD_NAME: &str = "download";

const MAX_NAME_ATTEMPTS: u32 = 1000;

fn create_new_file(path: &Path, body: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(body.as_bytes())
}

/// Write `body` to `path`, refusing to replace anything already there.
fn write_new_file(path: &Path, body: &str) -> Result<(), ApiError> {
    create_new_file(path, body).map_err(|e| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            ApiError::IoError(io::Error::new(
                e.kind(),
                format!("{} already exists", path.display()),
            ))
        } else {
            ApiError::IoError(e)
        }
    })
}

/// Write `body` into `dir` under the last component of `filename`.
///
/// Stored filenames may carry directories or `..`; only the bare name is used.
/// A taken name gets a ` (n)` suffix before its extension.
fn write_into_dir(dir: &Path, filename: &str, body: &str) -> Result<PathBuf, ApiError> {
    let base = Path::new(filename)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DOWNLOAD_NAME));

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let candidate = dir.join(numbered_name(&base, attempt));
        match create_new_file(&candidate, body) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(ApiError::IoError(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("No free name for {} in {}", base.display(), dir.display()),
    )))
}

/// `report.pdf` -> `report (2).pdf`; attempt 0 keeps the name as is
fn numbered_name(base: &Path, attempt: u32) -> PathBuf {
    if attempt == 0 {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match base.extension() {
        Some(ext) => PathBuf::from(format!("{} ({}).{}", stem, attempt, ext.to_string_lossy())),
        None => PathBuf::from(format!("{} ({})", stem, attempt)),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| StorageError::from(e).into())
}
