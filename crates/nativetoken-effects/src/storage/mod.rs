//! Token file storage handlers

pub mod filesystem;
pub mod memory;

pub use filesystem::{FilesystemTokenStore, StoreOptions};
pub use memory::MemoryTokenStore;
