//! Upload Simulator
//!
//! Emulates a time-extended upload for a selected local file and materializes
//! a file record in the registry when the simulated transfer completes. No
//! bytes are moved; only the file's name, size and content type are used.

pub mod local_file;
pub mod simulator;
pub mod strategy;
pub mod task;

pub use local_file::LocalFile;
pub use simulator::{SimulatorSettings, UploadHandle, UploadSimulator};
pub use strategy::{RandomStrategy, ScriptedStrategy, SimulationStrategy};
pub use task::{TickOutcome, UploadStatus, UploadTask, COMPLETE_PERCENT};
