//! Tooling Layer
//!
//! Command-line interface and text rendering for the console.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands, FilesCommands, UsersCommands};
