//! Deterministic random handlers
//!
//! Uses `parking_lot::Mutex` for interior state: tests drive the registry
//! from a single thread and only need `&self` access through the trait.

use nativetoken_core::{RandomEffects, Result, TokenError};
use parking_lot::Mutex;
use rand::RngCore;
use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
use std::collections::VecDeque;
use std::sync::Arc;

/// Seeded ChaCha20 random handler for reproducible tests
#[derive(Debug, Clone)]
pub struct MockRandomHandler {
    rng: Arc<Mutex<ChaCha20Rng>>,
}

impl MockRandomHandler {
    /// Create deterministic handler with fixed seed
    pub fn deterministic() -> Self {
        Self::with_seed([42; 32])
    }

    /// Create handler with specific seed
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            rng: Arc::new(Mutex::new(ChaCha20Rng::from_seed(seed))),
        }
    }
}

impl Default for MockRandomHandler {
    fn default() -> Self {
        Self::deterministic()
    }
}

impl RandomEffects for MockRandomHandler {
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; len];
        self.rng.lock().fill_bytes(&mut bytes);
        Ok(bytes)
    }
}

/// Replays a fixed sequence of 32-bit draws, then fails
///
/// Each call to `random_bytes` consumes one scripted value and returns its
/// little-endian bytes, truncated or zero-padded to the requested length.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandomHandler {
    draws: Arc<Mutex<VecDeque<u32>>>,
    consumed: Arc<Mutex<usize>>,
}

impl ScriptedRandomHandler {
    /// Script the given draws in order
    pub fn new(draws: impl IntoIterator<Item = u32>) -> Self {
        Self {
            draws: Arc::new(Mutex::new(draws.into_iter().collect())),
            consumed: Arc::new(Mutex::new(0)),
        }
    }

    /// Draws consumed so far
    pub fn consumed(&self) -> usize {
        *self.consumed.lock()
    }

    /// Draws still queued
    pub fn remaining(&self) -> usize {
        self.draws.lock().len()
    }
}

impl RandomEffects for ScriptedRandomHandler {
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>> {
        let draw = self
            .draws
            .lock()
            .pop_front()
            .ok_or_else(|| TokenError::entropy("scripted draws exhausted"))?;
        *self.consumed.lock() += 1;
        let mut bytes = draw.to_le_bytes().to_vec();
        bytes.resize(len, 0);
        Ok(bytes)
    }
}

/// Entropy source that is always unavailable
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingRandomHandler;

impl RandomEffects for FailingRandomHandler {
    fn random_bytes(&self, _len: usize) -> Result<Vec<u8>> {
        Err(TokenError::entropy("entropy device unavailable"))
    }
}
