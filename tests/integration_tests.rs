//! Integration tests for the DFS console

mod integration;
