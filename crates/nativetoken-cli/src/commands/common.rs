use anyhow::{Context, Result};
use nativetoken_core::RegistryConfig;
use nativetoken_effects::{FilesystemTokenStore, OsRandomHandler};
use nativetoken_registry::TokenRegistry;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Registry backed by OS entropy and the on-disk token file
pub type CliRegistry = TokenRegistry<OsRandomHandler, FilesystemTokenStore>;

/// Load the registry config, then apply the command-line file override
pub fn load_config(config_path: &Path, token_file: Option<PathBuf>) -> Result<RegistryConfig> {
    let mut config = RegistryConfig::load_from_file(config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    if let Some(token_file) = token_file {
        config.token_file = token_file;
    }
    debug!("Using token file {}", config.token_file.display());
    Ok(config)
}

/// Registry over the file named in `config`
pub fn open_registry(config: RegistryConfig) -> CliRegistry {
    let store = FilesystemTokenStore::from_config(&config);
    TokenRegistry::new(OsRandomHandler::new(), store, config)
}
