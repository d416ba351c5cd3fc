//! RegistryStore: file records and known users, written through on every change.

use super::record::{FileRecord, RecordIdGenerator};
use super::repository::{MemoryRegistryRepository, RegistryRepository};
use super::seed;
use crate::error::{StorageError, ValidationError};
use crate::types::FileId;
use chrono::Utc;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Registry of file records and usernames.
///
/// Constructed once and shared by `Arc`. Each collection has its own lock;
/// a mutation holds the write lock until the repository save returns, so
/// writes to one collection are serialized and always persisted in order.
pub struct RegistryStore {
    files: RwLock<Vec<FileRecord>>,
    users: RwLock<Vec<String>>,
    repository: Arc<dyn RegistryRepository>,
    ids: RecordIdGenerator,
}

impl RegistryStore {
    /// Load both collections from the repository, falling back to seed data
    /// for any collection that is missing or unreadable.
    pub fn open(repository: Arc<dyn RegistryRepository>) -> Self {
        let files = match repository.load_files() {
            Ok(Some(files)) => {
                debug!(count = files.len(), "Loaded file records");
                files
            }
            Ok(None) => {
                info!("No persisted file records, using seed data");
                let files = seed::seed_files();
                persist_files(repository.as_ref(), &files);
                files
            }
            Err(e) => {
                warn!(error = %e, "Persisted file records unreadable, using seed data");
                let files = seed::seed_files();
                persist_files(repository.as_ref(), &files);
                files
            }
        };

        let users = match repository.load_users() {
            Ok(Some(users)) => {
                debug!(count = users.len(), "Loaded users");
                users
            }
            Ok(None) => {
                info!("No persisted users, using seed data");
                let users = seed::seed_users();
                persist_users(repository.as_ref(), &users);
                users
            }
            Err(e) => {
                warn!(error = %e, "Persisted users unreadable, using seed data");
                let users = seed::seed_users();
                persist_users(repository.as_ref(), &users);
                users
            }
        };

        let floor = files
            .iter()
            .filter_map(|f| f.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        Self {
            files: RwLock::new(files),
            users: RwLock::new(users),
            repository,
            ids: RecordIdGenerator::starting_after(floor),
        }
    }

    /// Store backed by a fresh in-memory repository
    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryRegistryRepository::new()))
    }

    /// All records, most recently added first
    pub fn list_files(&self) -> Vec<FileRecord> {
        self.files.read().clone()
    }

    pub fn get_file(&self, id: &str) -> Option<FileRecord> {
        self.files.read().iter().find(|f| f.id == id).cloned()
    }

    pub fn file_count(&self) -> usize {
        self.files.read().len()
    }

    /// Insert at the head of the list. Contents are not validated.
    pub fn add_file(&self, record: FileRecord) {
        let mut files = self.files.write();
        info!(
            id = %record.id,
            filename = %record.filename,
            owner = %record.owner,
            size_bytes = record.size_bytes,
            "Adding file record"
        );
        files.insert(0, record);
        persist_files(self.repository.as_ref(), &files);
    }

    /// Remove the record with `id`. Returns false (and changes nothing) if absent.
    pub fn delete_file(&self, id: &str) -> bool {
        let mut files = self.files.write();
        let before = files.len();
        files.retain(|f| f.id != id);
        let removed = files.len() != before;
        if removed {
            info!(id = %id, "Deleted file record");
        } else {
            debug!(id = %id, "Delete requested for unknown file id");
        }
        persist_files(self.repository.as_ref(), &files);
        removed
    }

    /// Known usernames in insertion order
    pub fn list_users(&self) -> Vec<String> {
        self.users.read().clone()
    }

    pub fn contains_user(&self, name: &str) -> bool {
        let normalized = name.trim().to_lowercase();
        self.users.read().iter().any(|u| *u == normalized)
    }

    /// Add a user by lowercased name.
    ///
    /// Returns `Ok(true)` when the user was new, `Ok(false)` when already known.
    pub fn add_user(&self, name: &str) -> Result<bool, ValidationError> {
        let normalized = name.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::EmptyUserName);
        }

        let mut users = self.users.write();
        let added = !users.contains(&normalized);
        if added {
            info!(user = %normalized, "Added user");
            users.push(normalized);
        }
        persist_users(self.repository.as_ref(), &users);
        Ok(added)
    }

    /// Issue an id that no record in this store has used
    pub fn next_file_id(&self) -> FileId {
        self.ids.next_id(Utc::now())
    }
}

fn persist_files(repository: &dyn RegistryRepository, files: &[FileRecord]) {
    if let Err(e) = repository.save_files(files) {
        report_save_failure("files", &e);
    }
}

fn persist_users(repository: &dyn RegistryRepository, users: &[String]) {
    if let Err(e) = repository.save_users(users) {
        report_save_failure("users", &e);
    }
}

fn report_save_failure(collection: &str, e: &StorageError) {
    error!(collection, error = %e, "Failed to persist registry collection");
}
