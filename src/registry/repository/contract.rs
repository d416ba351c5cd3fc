use crate::error::StorageError;
use crate::registry::record::FileRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key holding the serialized file-record collection
pub const FILES_KEY: &str = "uploaded-files";

/// Key holding the serialized username collection
pub const USERS_KEY: &str = "users";

/// Persistence port for the two registry collections.
///
/// `Ok(None)` means nothing has been stored under the key yet. The collections
/// are independent; no operation spans both.
pub trait RegistryRepository: Send + Sync {
    fn load_files(&self) -> Result<Option<Vec<FileRecord>>, StorageError>;
    fn save_files(&self, files: &[FileRecord]) -> Result<(), StorageError>;
    fn load_users(&self) -> Result<Option<Vec<String>>, StorageError>;
    fn save_users(&self, users: &[String]) -> Result<(), StorageError>;
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: Option<&[u8]>) -> Result<Option<T>, StorageError> {
    match bytes {
        Some(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
        None => Ok(None),
    }
}

pub(crate) fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, StorageError> {
    Ok(serde_json::to_vec(value)?)
}
