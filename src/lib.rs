//! DFS Console: Simulated Distributed File Storage
//!
//! A registry of file records and users backed by a local key-value store, an
//! upload simulator that fabricates transfer progress, and read-only views that
//! summarize the (decorative) storage cluster.

pub mod config;
pub mod error;
pub mod logging;
pub mod nodes;
pub mod registry;
pub mod tooling;
pub mod types;
pub mod upload;
pub mod views;
