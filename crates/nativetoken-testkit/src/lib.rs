//! Test utilities for the native token registry
//!
//! - [`random`]: seeded, scripted and failing entropy handlers
//! - [`store`]: a store wrapper that fails on demand
//! - [`builders`]: fluent request construction

pub mod builders;
pub mod random;
pub mod store;

pub use builders::RequestBuilder;
pub use random::{FailingRandomHandler, MockRandomHandler, ScriptedRandomHandler};
pub use store::FaultyStore;

/// Re-exported so tests need only one dev-dependency for an in-memory file
pub use nativetoken_effects::MemoryTokenStore;
