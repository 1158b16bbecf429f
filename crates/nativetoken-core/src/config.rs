//! Registry configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file or a
//! missing file yields the stock configuration.

use crate::errors::{Result, TokenError};
use crate::limits::{
    DEFAULT_SHELL_PROCESS_NAME, DEFAULT_TOKEN_FILE_MODE, DEFAULT_TOKEN_FILE_PATH,
    MAX_JSON_FILE_LEN, MAX_RETRY_TIMES,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for the registry and its filesystem store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Location of the persisted JSON array
    pub token_file: PathBuf,
    /// Files larger than this are refused on read
    pub max_file_size: u64,
    /// Permission bits applied on every write
    pub file_mode: u32,
    /// Chown the file to the owner and group of its directory
    pub sync_owner_with_parent: bool,
    /// Run `restorecon` on the file after it is written
    pub restore_security_label: bool,
    /// Draws attempted before id generation gives up
    pub max_retry: u32,
    /// Process name that receives a shell-typed token
    pub shell_process_name: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE_PATH),
            max_file_size: MAX_JSON_FILE_LEN,
            file_mode: DEFAULT_TOKEN_FILE_MODE,
            sync_owner_with_parent: true,
            restore_security_label: false,
            max_retry: MAX_RETRY_TIMES,
            shell_process_name: DEFAULT_SHELL_PROCESS_NAME.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Defaults with a different token file
    pub fn with_token_file(path: impl Into<PathBuf>) -> Self {
        Self {
            token_file: path.into(),
            ..Self::default()
        }
    }

    /// Load and validate a TOML config. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            TokenError::configuration(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let config: RegistryConfig = toml::from_str(&content).map_err(|e| {
            TokenError::configuration(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the registry cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.token_file.as_os_str().is_empty() {
            return Err(TokenError::configuration("token_file is empty"));
        }
        if self.max_file_size == 0 {
            return Err(TokenError::configuration("max_file_size must be non-zero"));
        }
        if self.file_mode > 0o777 {
            return Err(TokenError::configuration(format!(
                "file_mode {:o} has bits outside 0o777",
                self.file_mode
            )));
        }
        if self.max_retry == 0 {
            return Err(TokenError::configuration("max_retry must be non-zero"));
        }
        if self.shell_process_name.is_empty() {
            return Err(TokenError::configuration("shell_process_name is empty"));
        }
        Ok(())
    }
}
