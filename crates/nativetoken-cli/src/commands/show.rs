use anyhow::{bail, Result};
use nativetoken_core::{RandomEffects, TokenStoreEffects};
use nativetoken_registry::{codec, TokenRegistry};
use std::io::Write;

/// Print the stored record for `name` as pretty JSON
pub fn run<R, S, W>(registry: &mut TokenRegistry<R, S>, name: &str, out: &mut W) -> Result<()>
where
    R: RandomEffects,
    S: TokenStoreEffects,
    W: Write,
{
    let Some(entry) = registry.lookup(name)? else {
        bail!("{name} is not registered");
    };
    let json = serde_json::to_string_pretty(&codec::to_json(entry))?;
    writeln!(out, "{json}")?;
    Ok(())
}
