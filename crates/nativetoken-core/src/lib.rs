//! Core types for the native token registry
//!
//! Native (non-app) processes ask the registry for a security token by
//! process name. This crate holds what every layer shares:
//!
//! - [`types`]: packed [`TokenId`]s, [`TokenEntry`] records and requests
//! - [`effects`]: the entropy and file capabilities the registry runs on
//! - [`config`]: [`RegistryConfig`], loaded from TOML
//! - [`errors`]: the unified [`TokenError`]

pub mod config;
pub mod effects;
pub mod errors;
pub mod limits;
pub mod types;

pub use config::RegistryConfig;
pub use effects::{RandomEffects, TokenStoreEffects};
pub use errors::{Result, TokenError};
pub use types::{
    Apl, Declaration, ListBounds, TokenEntry, TokenId, TokenIdEx, TokenInfoParams, TokenRequest,
    TokenType, INVALID_TOKEN_ID,
};
