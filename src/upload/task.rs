//! UploadTask state machine.

use crate::types::{FileId, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress value of a finished upload
pub const COMPLETE_PERCENT: f64 = 100.0;

/// Upload lifecycle state.
///
/// `Failed` is part of the vocabulary but no transition produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Uploading,
    Completed,
    Failed,
}

impl UploadStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, UploadStatus::Uploading)
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UploadStatus::Uploading => "uploading",
            UploadStatus::Completed => "completed",
            UploadStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Result of applying one progress tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Still uploading, at the given percentage
    Progressed(f64),
    /// This tick reached 100%
    Completed,
    /// Task was already terminal; nothing changed
    Ignored,
}

/// State of one simulated upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadTask {
    pub id: TaskId,
    /// Display name of the source file
    pub filename: String,
    /// User selected when the upload started
    pub owner: String,
    pub progress_percent: f64,
    pub status: UploadStatus,
    pub started_at: DateTime<Utc>,
    /// Record produced on completion
    #[serde(default)]
    pub file_id: Option<FileId>,
}

impl UploadTask {
    pub fn new(filename: String, owner: String) -> Self {
        Self {
            id: TaskId::new_v4(),
            filename,
            owner,
            progress_percent: 0.0,
            status: UploadStatus::Uploading,
            started_at: Utc::now(),
            file_id: None,
        }
    }

    /// Advance progress by `increment` percentage points.
    ///
    /// Progress never exceeds 100 and the transition to `Completed` happens at
    /// most once. Negative or non-finite increments count as zero.
    pub fn advance(&mut self, increment: f64) -> TickOutcome {
        if self.status.is_terminal() {
            return TickOutcome::Ignored;
        }

        let increment = if increment.is_finite() {
            increment.max(0.0)
        } else {
            0.0
        };
        let next = self.progress_percent + increment;
        if next >= COMPLETE_PERCENT {
            self.progress_percent = COMPLETE_PERCENT;
            self.status = UploadStatus::Completed;
            TickOutcome::Completed
        } else {
            self.progress_percent = next;
            TickOutcome::Progressed(next)
        }
    }
}
