//! Registry Store
//!
//! Authoritative in-process copy of file records and known users. Every
//! mutation is written through a repository port to the local key-value medium.

pub mod record;
pub mod repository;
pub mod seed;
pub mod store;

pub use record::{chunk_count, FileRecord, RecordIdGenerator, CHUNK_SIZE_BYTES, DEFAULT_MIME_TYPE};
pub use repository::{MemoryRegistryRepository, RegistryRepository, SledRegistryRepository};
pub use store::RegistryStore;
