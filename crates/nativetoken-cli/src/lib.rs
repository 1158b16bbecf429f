//! Operator commands for the native token registry
//!
//! The `nativetoken` binary is a thin clap front end over [`commands`].
//! Each command runs against any [`nativetoken_registry::TokenRegistry`]
//! and writes its report to a caller-supplied writer.

pub mod commands;
