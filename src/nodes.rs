//! Storage Node Catalog
//!
//! The fixed, decorative set of storage nodes displayed by the dashboard.
//! Nothing is ever stored on these nodes; labels on file records refer to
//! them by id only.

use serde::{Deserialize, Serialize};
use std::fmt;

const GIB: u64 = 1024 * 1024 * 1024;

/// Health of a storage node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Online,
    Offline,
    Degraded,
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeStatus::Online => "online",
            NodeStatus::Offline => "offline",
            NodeStatus::Degraded => "degraded",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageNode {
    pub id: String,
    pub name: String,
    pub capacity_bytes: u64,
    pub used_bytes: u64,
    pub status: NodeStatus,
    pub location: String,
}

impl StorageNode {
    pub fn free_bytes(&self) -> u64 {
        self.capacity_bytes.saturating_sub(self.used_bytes)
    }

    pub fn utilization_percent(&self) -> f64 {
        if self.capacity_bytes == 0 {
            return 0.0;
        }
        self.used_bytes as f64 / self.capacity_bytes as f64 * 100.0
    }
}

/// Label for the node at 1-based position `index`
pub fn node_label(index: u32) -> String {
    format!("node-{}", index)
}

/// The five catalog nodes, in display order
pub fn catalog() -> Vec<StorageNode> {
    let nodes: [(u64, NodeStatus, &str); 5] = [
        (5_242_880_000, NodeStatus::Online, "US-East"),
        (7 * GIB, NodeStatus::Online, "US-West"),
        (4 * GIB, NodeStatus::Online, "EU-Central"),
        (6 * GIB, NodeStatus::Online, "Asia-Pacific"),
        (8 * GIB, NodeStatus::Degraded, "EU-West"),
    ];

    nodes
        .iter()
        .zip(1u32..)
        .map(|(&(used_bytes, status, location), index)| StorageNode {
            id: node_label(index),
            name: format!("Storage Node {}", index),
            capacity_bytes: 10 * GIB,
            used_bytes,
            status,
            location: location.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        let nodes = catalog();
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[0].id, "node-1");
        assert_eq!(nodes[4].name, "Storage Node 5");
        assert_eq!(nodes[4].status, NodeStatus::Degraded);
        assert!(nodes.iter().all(|n| n.capacity_bytes == 10 * GIB));
    }

    #[test]
    fn test_utilization() {
        let node = &catalog()[2];
        assert_eq!(node.utilization_percent(), 40.0);
        assert_eq!(node.free_bytes(), 6 * GIB);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&NodeStatus::Degraded).unwrap(),
            "\"degraded\""
        );
        assert_eq!(NodeStatus::Online.to_string(), "online");
    }
}
