//! FileRecord and record id generation.

use crate::types::FileId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Fixed chunk size used to derive `chunk_count` (10 MiB)
pub const CHUNK_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Content type recorded when the selected file declares none
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Metadata for one tracked file.
///
/// Field names on the wire keep the flat encoding the dashboard has always
/// written (`size`, `user`, `uploadDate`, ...), so existing data stays readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: FileId,
    pub filename: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    #[serde(rename = "user")]
    pub owner: String,
    #[serde(rename = "uploadDate")]
    pub uploaded_at: DateTime<Utc>,
    #[serde(rename = "storageNode")]
    pub primary_node: String,
    #[serde(rename = "replicationNodes")]
    pub replica_nodes: Vec<String>,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "chunks")]
    pub chunk_count: u64,
}

/// Number of chunks a file of `size_bytes` occupies.
///
/// Zero-byte files still occupy one chunk.
pub fn chunk_count(size_bytes: u64, chunk_size_bytes: u64) -> u64 {
    let chunk_size_bytes = chunk_size_bytes.max(1);
    size_bytes.div_ceil(chunk_size_bytes).max(1)
}

/// Issues record ids from the wall clock in milliseconds.
///
/// Ids are strictly increasing: a request landing in the same millisecond as
/// the previous one (or after a clock step backwards) gets `last + 1`.
#[derive(Debug, Default)]
pub struct RecordIdGenerator {
    last: AtomicU64,
}

impl RecordIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator that never issues an id at or below `floor`
    pub fn starting_after(floor: u64) -> Self {
        Self {
            last: AtomicU64::new(floor),
        }
    }

    pub fn next_id(&self, now: DateTime<Utc>) -> FileId {
        let candidate = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let mut prev = self.last.load(Ordering::Acquire);
        loop {
            let next = candidate.max(prev.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return next.to_string(),
                Err(actual) => prev = actual,
            }
        }
    }
}
