//! In-memory token file for testing and dry runs

use nativetoken_core::{Result, TokenError, TokenStoreEffects};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct MemoryFile {
    contents: Option<String>,
    writes: usize,
}

/// In-memory stand-in for the registry file
///
/// Clones share the same backing file, so a test can hand one clone to a
/// registry and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    file: Arc<Mutex<MemoryFile>>,
}

impl MemoryTokenStore {
    /// Create a store whose file does not exist yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose file already holds `contents`
    pub fn with_contents(contents: impl Into<String>) -> Self {
        let store = Self::new();
        store.file.lock().contents = Some(contents.into());
        store
    }

    /// Current file contents, `None` if the file does not exist
    pub fn contents(&self) -> Option<String> {
        self.file.lock().contents.clone()
    }

    /// Overwrite the file behind the registry's back
    pub fn set_contents(&self, contents: Option<String>) {
        self.file.lock().contents = contents;
    }

    /// Number of successful writes, including file creation
    pub fn write_count(&self) -> usize {
        self.file.lock().writes
    }
}

impl TokenStoreEffects for MemoryTokenStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn read(&self, max_len: u64) -> Result<Option<String>> {
        let file = self.file.lock();
        match &file.contents {
            Some(contents) if contents.len() as u64 > max_len => Err(TokenError::FileTooLarge {
                size: contents.len() as u64,
                limit: max_len,
            }),
            other => Ok(other.clone()),
        }
    }

    fn write(&self, contents: &str) -> Result<()> {
        let mut file = self.file.lock();
        file.contents = Some(contents.to_string());
        file.writes += 1;
        Ok(())
    }

    fn create_empty(&self) -> Result<()> {
        self.write("")
    }
}
