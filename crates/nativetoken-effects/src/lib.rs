//! Effect handlers for the native token registry
//!
//! Implementations of the traits in `nativetoken_core::effects`:
//!
//! - [`OsRandomHandler`]: the operating system entropy source
//! - [`FilesystemTokenStore`]: the on-disk registry file
//! - [`MemoryTokenStore`]: an in-process file stand-in for tests and tools

pub mod random;
pub mod storage;

pub use random::OsRandomHandler;
pub use storage::{FilesystemTokenStore, MemoryTokenStore, StoreOptions};
