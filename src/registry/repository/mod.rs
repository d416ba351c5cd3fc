//! Registry repository port and adapters.

pub mod contract;
pub mod memory;
pub mod sled_store;

pub use contract::{RegistryRepository, FILES_KEY, USERS_KEY};
pub use memory::MemoryRegistryRepository;
pub use sled_store::SledRegistryRepository;
