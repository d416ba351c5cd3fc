//! Core identifier types.

/// FileId: monotonic token derived from the record's creation time
pub type FileId = String;

/// TaskId: generated per upload, correlates every progress update
pub type TaskId = uuid::Uuid;
