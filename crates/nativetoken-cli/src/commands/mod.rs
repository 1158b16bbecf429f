//! Command implementations

/// Config loading and registry construction
pub mod common;

/// Request a token for a process
pub mod get;

/// Print every registered entry
pub mod list;

/// Print one entry as JSON
pub mod show;

/// Remove a registration
pub mod delete;
