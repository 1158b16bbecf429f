//! Effect trait definitions
//!
//! The registry reaches the outside world only through these traits: an
//! entropy source and the single file that mirrors the registry. Production
//! handlers live in `nativetoken-effects`; deterministic and fault-injecting
//! handlers live in `nativetoken-testkit`.
//!
//! Every call blocks and runs to completion. There is no async path.

use crate::errors::{Result, TokenError};

/// Source of random bytes
pub trait RandomEffects {
    /// Produce exactly `len` random bytes, or fail
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>>;

    /// Draw a 32-bit sample. A short read is an error.
    fn random_u32(&self) -> Result<u32> {
        let bytes = self.random_bytes(4)?;
        let sample: [u8; 4] = bytes.as_slice().try_into().map_err(|_| {
            TokenError::entropy(format!("short sample: {} of 4 bytes", bytes.len()))
        })?;
        Ok(u32::from_le_bytes(sample))
    }
}

/// Whole-file access to the persisted registry
///
/// A store is bound to one location. Writes replace the file atomically and
/// leave it with the configured mode, owner and security label.
pub trait TokenStoreEffects {
    /// Human-readable location, for logs
    fn location(&self) -> String;

    /// Read the whole file. `Ok(None)` means the file does not exist.
    /// Files larger than `max_len` bytes fail with `FileTooLarge`.
    fn read(&self, max_len: u64) -> Result<Option<String>>;

    /// Atomically replace the file contents
    fn write(&self, contents: &str) -> Result<()>;

    /// Create an empty file, fixing up mode, owner and label
    fn create_empty(&self) -> Result<()>;
}

impl<T: RandomEffects + ?Sized> RandomEffects for &T {
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>> {
        (**self).random_bytes(len)
    }
}

impl<T: TokenStoreEffects + ?Sized> TokenStoreEffects for &T {
    fn location(&self) -> String {
        (**self).location()
    }

    fn read(&self, max_len: u64) -> Result<Option<String>> {
        (**self).read(max_len)
    }

    fn write(&self, contents: &str) -> Result<()> {
        (**self).write(contents)
    }

    fn create_empty(&self) -> Result<()> {
        (**self).create_empty()
    }
}
