//! Dashboard Views
//!
//! Read-only projections over the registry and node catalog: search, recent
//! files, per-user upload counts, capacity totals, and display formatting.

use crate::nodes::{NodeStatus, StorageNode};
use crate::registry::FileRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const BYTE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Number of files shown in the dashboard's recent list
pub const RECENT_FILES: usize = 3;

/// Label length before truncation in the size distribution
const SIZE_LABEL_CHARS: usize = 20;

/// Case-insensitive substring match against filename or owner.
/// An empty query matches everything.
pub fn filter_files<'a>(files: &'a [FileRecord], query: &str) -> Vec<&'a FileRecord> {
    let query = query.trim().to_lowercase();
    files
        .iter()
        .filter(|f| {
            query.is_empty()
                || f.filename.to_lowercase().contains(&query)
                || f.owner.to_lowercase().contains(&query)
        })
        .collect()
}

/// First `limit` records (the list is already most-recent-first)
pub fn recent_files(files: &[FileRecord], limit: usize) -> &[FileRecord] {
    &files[..files.len().min(limit)]
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_files: usize,
    pub used_bytes: u64,
    pub capacity_bytes: u64,
    pub free_bytes: u64,
    pub utilization_percent: f64,
    pub active_nodes: usize,
    pub total_nodes: usize,
}

pub fn dashboard_summary(files: &[FileRecord], nodes: &[StorageNode]) -> DashboardSummary {
    let used_bytes: u64 = nodes.iter().map(|n| n.used_bytes).sum();
    let capacity_bytes: u64 = nodes.iter().map(|n| n.capacity_bytes).sum();
    let utilization_percent = if capacity_bytes == 0 {
        0.0
    } else {
        used_bytes as f64 / capacity_bytes as f64 * 100.0
    };

    DashboardSummary {
        total_files: files.len(),
        used_bytes,
        capacity_bytes,
        free_bytes: capacity_bytes.saturating_sub(used_bytes),
        utilization_percent,
        active_nodes: nodes
            .iter()
            .filter(|n| n.status == NodeStatus::Online)
            .count(),
        total_nodes: nodes.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStorageEntry {
    pub node: String,
    pub used_gib: f64,
    pub free_gib: f64,
}

/// Used and free space per node in GiB, in catalog order
pub fn node_storage(nodes: &[StorageNode]) -> Vec<NodeStorageEntry> {
    nodes
        .iter()
        .map(|n| NodeStorageEntry {
            node: n.name.clone(),
            used_gib: n.used_bytes as f64 / GIB,
            free_gib: n.free_bytes() as f64 / GIB,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUploadCount {
    pub user: String,
    pub uploads: usize,
}

/// Upload count per owner, in order of each owner's first appearance
pub fn uploads_per_user(files: &[FileRecord]) -> Vec<UserUploadCount> {
    let mut counts: Vec<UserUploadCount> = Vec::new();
    for file in files {
        match counts.iter_mut().find(|c| c.user == file.owner) {
            Some(entry) => entry.uploads += 1,
            None => counts.push(UserUploadCount {
                user: file.owner.clone(),
                uploads: 1,
            }),
        }
    }
    counts
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSizeEntry {
    pub label: String,
    pub size_gib: f64,
}

/// Per-file sizes in GiB with shortened labels, in list order
pub fn file_size_distribution(files: &[FileRecord]) -> Vec<FileSizeEntry> {
    files
        .iter()
        .map(|f| FileSizeEntry {
            label: format!(
                "{}...",
                f.filename.chars().take(SIZE_LABEL_CHARS).collect::<String>()
            ),
            size_gib: f.size_bytes as f64 / GIB,
        })
        .collect()
}

/// Human-readable byte count, e.g. `500 MB`, `1.5 KB`, `0 Bytes`.
///
/// Values are rounded to two decimals with trailing zeros dropped.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut exponent = 0;
    while exponent + 1 < BYTE_UNITS.len() && bytes >> (10 * (exponent + 1)) > 0 {
        exponent += 1;
    }
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, BYTE_UNITS[exponent])
}

/// Display timestamp, e.g. `Jan 15, 2024, 12:00 AM`
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// Placeholder body written when a file is "downloaded"
pub fn download_placeholder(filename: &str, now: &DateTime<Utc>) -> String {
    format!(
        "Filename: {}\nDownloaded: {}\n\nThis is a sample file from the distributed storage system.",
        filename,
        now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    )
}
