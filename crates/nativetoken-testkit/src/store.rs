//! Fault-injecting store wrapper

use nativetoken_core::{Result, TokenError, TokenStoreEffects};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Faults {
    reads: AtomicBool,
    writes: AtomicBool,
    creates: AtomicBool,
}

/// Wraps a store and fails selected operations on demand
///
/// Clones share their fault switches, so a test can keep one clone to flip
/// switches while the registry owns another.
#[derive(Debug, Clone)]
pub struct FaultyStore<S> {
    inner: S,
    faults: Arc<Faults>,
}

impl<S> FaultyStore<S> {
    /// Wrap `inner` with every fault switched off
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            faults: Arc::new(Faults::default()),
        }
    }

    /// Fail every read while set
    pub fn fail_reads(&self, fail: bool) {
        self.faults.reads.store(fail, Ordering::SeqCst);
    }

    /// Fail every write while set
    pub fn fail_writes(&self, fail: bool) {
        self.faults.writes.store(fail, Ordering::SeqCst);
    }

    /// Fail file creation while set
    pub fn fail_creates(&self, fail: bool) {
        self.faults.creates.store(fail, Ordering::SeqCst);
    }

    /// The wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: TokenStoreEffects> TokenStoreEffects for FaultyStore<S> {
    fn location(&self) -> String {
        format!("faulty({})", self.inner.location())
    }

    fn read(&self, max_len: u64) -> Result<Option<String>> {
        if self.faults.reads.load(Ordering::SeqCst) {
            return Err(TokenError::storage("injected read failure"));
        }
        self.inner.read(max_len)
    }

    fn write(&self, contents: &str) -> Result<()> {
        if self.faults.writes.load(Ordering::SeqCst) {
            return Err(TokenError::storage("injected write failure"));
        }
        self.inner.write(contents)
    }

    fn create_empty(&self) -> Result<()> {
        if self.faults.creates.load(Ordering::SeqCst) {
            return Err(TokenError::storage("injected create failure"));
        }
        self.inner.create_empty()
    }
}
