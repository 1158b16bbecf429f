use anyhow::Result;
use nativetoken_core::{RandomEffects, TokenStoreEffects};
use nativetoken_registry::TokenRegistry;
use std::io::Write;

/// One line per entry, newest first
pub fn run<R, S, W>(registry: &mut TokenRegistry<R, S>, out: &mut W) -> Result<()>
where
    R: RandomEffects,
    S: TokenStoreEffects,
    W: Write,
{
    let list = registry.entries()?;
    for entry in list.iter() {
        writeln!(
            out,
            "{}\t{}\t{}\tdcaps={} perms={} acls={}",
            entry.process_name,
            entry.token_id,
            entry.apl,
            entry.dcaps.len(),
            entry.perms.len(),
            entry.acls.len()
        )?;
    }
    writeln!(out, "{} entries", list.len())?;
    Ok(())
}
