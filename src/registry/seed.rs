//! Built-in sample data used when nothing has been persisted yet.

use super::record::FileRecord;
use chrono::{TimeZone, Utc};

/// Usernames present on first run
pub const SEED_USERS: [&str; 3] = ["aditya", "kanish", "ganesh"];

struct SeedFile {
    id: &'static str,
    filename: &'static str,
    size_bytes: u64,
    owner: &'static str,
    date: (i32, u32, u32),
    primary_node: &'static str,
    replica_nodes: [&'static str; 2],
    mime_type: &'static str,
    chunk_count: u64,
}

const SEED_FILES: [SeedFile; 5] = [
    SeedFile {
        id: "1",
        filename: "sales_data_2024.csv",
        size_bytes: 524_288_000,
        owner: "aditya",
        date: (2024, 1, 15),
        primary_node: "node-1",
        replica_nodes: ["node-2", "node-3"],
        mime_type: "text/csv",
        chunk_count: 50,
    },
    SeedFile {
        id: "2",
        filename: "customer_analytics.parquet",
        size_bytes: 1_073_741_824,
        owner: "aditya",
        date: (2024, 1, 20),
        primary_node: "node-2",
        replica_nodes: ["node-1", "node-4"],
        mime_type: "application/octet-stream",
        chunk_count: 100,
    },
    SeedFile {
        id: "3",
        filename: "logs_archive.tar.gz",
        size_bytes: 2_147_483_648,
        owner: "kanish",
        date: (2024, 1, 25),
        primary_node: "node-3",
        replica_nodes: ["node-2", "node-5"],
        mime_type: "application/gzip",
        chunk_count: 200,
    },
    SeedFile {
        id: "4",
        filename: "ml_model_weights.h5",
        size_bytes: 786_432_000,
        owner: "aditya",
        date: (2024, 2, 1),
        primary_node: "node-4",
        replica_nodes: ["node-1", "node-3"],
        mime_type: "application/octet-stream",
        chunk_count: 75,
    },
    SeedFile {
        id: "5",
        filename: "video_dataset.zip",
        size_bytes: 3_221_225_472,
        owner: "ganesh",
        date: (2024, 2, 5),
        primary_node: "node-5",
        replica_nodes: ["node-2", "node-4"],
        mime_type: "application/zip",
        chunk_count: 300,
    },
];

/// Sample file records, in display order
pub fn seed_files() -> Vec<FileRecord> {
    SEED_FILES
        .iter()
        .map(|seed| {
            let (year, month, day) = seed.date;
            FileRecord {
                id: seed.id.to_string(),
                filename: seed.filename.to_string(),
                size_bytes: seed.size_bytes,
                owner: seed.owner.to_string(),
                uploaded_at: Utc
                    .with_ymd_and_hms(year, month, day, 0, 0, 0)
                    .single()
                    .unwrap_or_default(),
                primary_node: seed.primary_node.to_string(),
                replica_nodes: seed.replica_nodes.iter().map(|n| n.to_string()).collect(),
                mime_type: seed.mime_type.to_string(),
                chunk_count: seed.chunk_count,
            }
        })
        .collect()
}

/// Sample usernames, in display order
pub fn seed_users() -> Vec<String> {
    SEED_USERS.iter().map(|u| u.to_string()).collect()
}
