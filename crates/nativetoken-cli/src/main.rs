//! Native token registry CLI
//!
//! Operator tooling for inspecting and maintaining the token file that
//! native processes are registered in.

use anyhow::Result;
use clap::{Parser, Subcommand};
use nativetoken_cli::commands::{common, delete, get, list, show};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nativetoken")]
#[command(about = "Native process token registry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, default_value = "/etc/nativetoken/registry.toml")]
    config: PathBuf,

    /// Token file to use instead of the configured one
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Get (registering if needed) the token for a process
    Get(get::GetArgs),

    /// List registered processes
    List,

    /// Show the stored record of a process
    Show {
        /// Process name
        name: String,
    },

    /// Delete the registration of a process
    Delete {
        /// Process name
        name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(io::stderr)
        .init();

    let config = common::load_config(&cli.config, cli.token_file)?;
    let mut registry = common::open_registry(config);
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Get(args) => get::run(&mut registry, args, &mut out)?,
        Commands::List => list::run(&mut registry, &mut out)?,
        Commands::Show { name } => show::run(&mut registry, &name, &mut out)?,
        Commands::Delete { name } => delete::run(&mut registry, &name, &mut out)?,
    }

    Ok(())
}
