//! In-memory adapter for tests and throwaway sessions.

use super::contract::{decode, encode, RegistryRepository, FILES_KEY, USERS_KEY};
use crate::error::StorageError;
use crate::registry::record::FileRecord;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Keeps the encoded collections in a map, byte-for-byte as the sled adapter would.
#[derive(Debug, Default)]
pub struct MemoryRegistryRepository {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryRegistryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text under a key, bypassing encoding
    pub fn with_raw(self, key: &str, raw: &str) -> Self {
        self.entries
            .lock()
            .insert(key.to_string(), raw.as_bytes().to_vec());
        self
    }

    /// Raw text currently stored under a key
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .get(key)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

impl RegistryRepository for MemoryRegistryRepository {
    fn load_files(&self) -> Result<Option<Vec<FileRecord>>, StorageError> {
        decode(self.entries.lock().get(FILES_KEY).map(Vec::as_slice))
    }

    fn save_files(&self, files: &[FileRecord]) -> Result<(), StorageError> {
        let bytes = encode(files)?;
        self.entries.lock().insert(FILES_KEY.to_string(), bytes);
        Ok(())
    }

    fn load_users(&self) -> Result<Option<Vec<String>>, StorageError> {
        decode(self.entries.lock().get(USERS_KEY).map(Vec::as_slice))
    }

    fn save_users(&self, users: &[String]) -> Result<(), StorageError> {
        let bytes = encode(users)?;
        self.entries.lock().insert(USERS_KEY.to_string(), bytes);
        Ok(())
    }
}
