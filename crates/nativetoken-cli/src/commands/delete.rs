use anyhow::{bail, Context, Result};
use nativetoken_core::{RandomEffects, TokenStoreEffects};
use nativetoken_registry::TokenRegistry;
use std::io::Write;
use tracing::info;

/// Drop the registration for `name` from memory and the token file
pub fn run<R, S, W>(registry: &mut TokenRegistry<R, S>, name: &str, out: &mut W) -> Result<()>
where
    R: RandomEffects,
    S: TokenStoreEffects,
    W: Write,
{
    let removed = registry
        .remove_token(name)
        .with_context(|| format!("Failed to delete {name}"))?;
    if !removed {
        bail!("{name} is not registered");
    }
    info!(
        "Deleted {} from {}",
        name,
        registry.config().token_file.display()
    );
    writeln!(out, "deleted {name}")?;
    Ok(())
}
