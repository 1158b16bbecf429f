use anyhow::{Context, Result};
use clap::Args;
use nativetoken_core::{RandomEffects, TokenRequest, TokenStoreEffects};
use nativetoken_registry::TokenRegistry;
use std::io::Write;

/// Arguments for `nativetoken get`
#[derive(Debug, Clone, Args)]
pub struct GetArgs {
    /// Process name to register or look up
    #[arg(long)]
    pub name: String,

    /// Ability privilege level (normal, system_basic, system_core)
    #[arg(long)]
    pub apl: String,

    /// Distributed capability; repeat for several
    #[arg(long = "dcap")]
    pub dcaps: Vec<String>,

    /// Declared permission; repeat for several
    #[arg(long = "perm")]
    pub perms: Vec<String>,

    /// Permission granted by ACL; repeat for several
    #[arg(long = "acl")]
    pub acls: Vec<String>,
}

impl From<GetArgs> for TokenRequest {
    fn from(args: GetArgs) -> Self {
        TokenRequest {
            process_name: args.name,
            dcaps: args.dcaps,
            perms: args.perms,
            acls: args.acls,
            apl: Some(args.apl),
        }
    }
}

/// Register the process and print its 64-bit token in hex and decimal
pub fn run<R, S, W>(registry: &mut TokenRegistry<R, S>, args: GetArgs, out: &mut W) -> Result<()>
where
    R: RandomEffects,
    S: TokenStoreEffects,
    W: Write,
{
    let name = args.name.clone();
    let token = registry
        .register(&TokenRequest::from(args))
        .with_context(|| format!("Failed to get token for {name}"))?;
    writeln!(out, "{:#018x} {}", token.as_u64(), token.as_u64())?;
    Ok(())
}
