//! Sled-backed adapter: one database, one key per collection, JSON values.

use super::contract::{decode, encode, RegistryRepository, FILES_KEY, USERS_KEY};
use crate::error::StorageError;
use crate::registry::record::FileRecord;
use std::path::Path;
use tracing::debug;

pub struct SledRegistryRepository {
    db: sled::Db,
}

impl SledRegistryRepository {
    /// Open (or create) the database at `path`
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = sled::open(path)?;
        debug!(path = %path.display(), "Opened registry database");
        Ok(Self { db })
    }

    fn get(&self, key: &str) -> Result<Option<sled::IVec>, StorageError> {
        Ok(self.db.get(key)?)
    }

    fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        self.db.insert(key, bytes)?;
        self.db.flush()?;
        Ok(())
    }
}

impl RegistryRepository for SledRegistryRepository {
    fn load_files(&self) -> Result<Option<Vec<FileRecord>>, StorageError> {
        let value = self.get(FILES_KEY)?;
        decode(value.as_deref())
    }

    fn save_files(&self, files: &[FileRecord]) -> Result<(), StorageError> {
        self.put(FILES_KEY, encode(files)?)
    }

    fn load_users(&self) -> Result<Option<Vec<String>>, StorageError> {
        let value = self.get(USERS_KEY)?;
        decode(value.as_deref())
    }

    fn save_users(&self, users: &[String]) -> Result<(), StorageError> {
        self.put(USERS_KEY, encode(users)?)
    }
}
