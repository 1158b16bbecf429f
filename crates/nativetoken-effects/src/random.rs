//! Random effect handlers
//!
//! This module provides the production implementation of the `RandomEffects`
//! trait defined in `nativetoken-core`, backed by the operating system
//! entropy source.

use nativetoken_core::{RandomEffects, Result, TokenError};
use rand::rngs::OsRng;
use rand::RngCore;

/// Random handler reading from the OS entropy source
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandomHandler;

impl OsRandomHandler {
    /// Create a new OS random handler
    pub fn new() -> Self {
        Self
    }
}

impl RandomEffects for OsRandomHandler {
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; len];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| TokenError::entropy(format!("OS entropy source failed: {e}")))?;
        Ok(bytes)
    }
}
