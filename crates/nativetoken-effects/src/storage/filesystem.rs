//! Filesystem storage handler for the registry file
//!
//! This module provides the on-disk store with:
//! - Size-bounded whole-file reads
//! - Atomic write operations with temp files
//! - Restrictive file permissions (owner rw, group r by default)
//! - Ownership synced to the containing directory
//! - Optional security label restoration via `restorecon`

use nativetoken_core::limits::DEFAULT_TOKEN_FILE_MODE;
use nativetoken_core::{RegistryConfig, Result, TokenError, TokenStoreEffects};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// How written files are finished off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Permission bits applied to the file
    pub file_mode: u32,
    /// Chown the file to the owner and group of its directory
    pub sync_owner_with_parent: bool,
    /// Run `restorecon` on the file after writing
    pub restore_security_label: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            file_mode: DEFAULT_TOKEN_FILE_MODE,
            sync_owner_with_parent: true,
            restore_security_label: false,
        }
    }
}

impl From<&RegistryConfig> for StoreOptions {
    fn from(config: &RegistryConfig) -> Self {
        Self {
            file_mode: config.file_mode,
            sync_owner_with_parent: config.sync_owner_with_parent,
            restore_security_label: config.restore_security_label,
        }
    }
}

/// Registry file on the local filesystem
#[derive(Debug, Clone)]
pub struct FilesystemTokenStore {
    path: PathBuf,
    options: StoreOptions,
}

impl FilesystemTokenStore {
    /// Create a store for `path` with default options
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_options(path, StoreOptions::default())
    }

    /// Create a store for `path` with explicit options
    pub fn with_options(path: impl Into<PathBuf>, options: StoreOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    /// Create the store described by a registry config
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::with_options(config.token_file.clone(), StoreOptions::from(config))
    }

    /// Path of the registry file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write to a sibling temp file, then rename over the target
    fn write_atomic(&self, contents: &[u8]) -> Result<()> {
        let temp_path = self.temp_path();

        let mut file = open_for_write(&temp_path, self.options.file_mode).map_err(|e| {
            TokenError::storage(format!(
                "Failed to create temp file {}: {e}",
                temp_path.display()
            ))
        })?;

        let written = file
            .write_all(contents)
            .and_then(|()| file.sync_all())
            .and_then(|()| set_mode(&temp_path, self.options.file_mode));
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(TokenError::storage(format!(
                "Failed to write {}: {e}",
                temp_path.display()
            )));
        }
        drop(file);

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            TokenError::storage(format!(
                "Failed to rename temp file onto {}: {e}",
                self.path.display()
            ))
        })?;

        self.fix_attributes();
        Ok(())
    }

    /// Owner sync and relabel are best effort; failures are logged only
    fn fix_attributes(&self) {
        if self.options.sync_owner_with_parent {
            if let Err(e) = sync_owner_with_parent(&self.path) {
                warn!(
                    "Failed to sync owner of {} with its directory: {}",
                    self.path.display(),
                    e
                );
            }
        }

        if self.options.restore_security_label {
            match Command::new("restorecon").arg(&self.path).status() {
                Ok(status) if status.success() => {
                    debug!("Restored security label on {}", self.path.display());
                }
                Ok(status) => warn!(
                    "restorecon exited with {} for {}",
                    status,
                    self.path.display()
                ),
                Err(e) => warn!("Failed to run restorecon: {}", e),
            }
        }
    }
}

#[cfg(unix)]
fn open_for_write(path: &Path, mode: u32) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)
}

#[cfg(not(unix))]
fn open_for_write(path: &Path, _mode: u32) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

// Applied explicitly since the umask may have narrowed the create mode
#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn sync_owner_with_parent(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::MetadataExt;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let dir = fs::metadata(parent)?;
    let file = fs::metadata(path)?;
    if file.uid() == dir.uid() && file.gid() == dir.gid() {
        return Ok(());
    }
    std::os::unix::fs::chown(path, Some(dir.uid()), Some(dir.gid()))
}

#[cfg(not(unix))]
fn sync_owner_with_parent(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

impl TokenStoreEffects for FilesystemTokenStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self, max_len: u64) -> Result<Option<String>> {
        let metadata = match fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(TokenError::storage(format!(
                    "Failed to stat {}: {e}",
                    self.path.display()
                )))
            }
        };

        if !metadata.is_file() {
            return Err(TokenError::storage(format!(
                "{} is not a regular file",
                self.path.display()
            )));
        }
        if metadata.len() > max_len {
            return Err(TokenError::FileTooLarge {
                size: metadata.len(),
                limit: max_len,
            });
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            TokenError::storage(format!("Failed to read {}: {e}", self.path.display()))
        })?;
        debug!("Read {} bytes from {}", contents.len(), self.path.display());
        Ok(Some(contents))
    }

    fn write(&self, contents: &str) -> Result<()> {
        self.write_atomic(contents.as_bytes())?;
        debug!("Wrote {} bytes to {}", contents.len(), self.path.display());
        Ok(())
    }

    fn create_empty(&self) -> Result<()> {
        self.write_atomic(&[])?;
        info!("Created empty token file {}", self.path.display());
        Ok(())
    }
}
