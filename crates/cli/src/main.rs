//! Yieldlens CLI - inspect vault yield, rewards and balances.

mod cli;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use yieldlens_core::Snapshot;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let snapshot_path = cli
        .snapshot
        .context("--snapshot <file> is required (or set YIELDLENS_SNAPSHOT)")?;
    let json = std::fs::read_to_string(&snapshot_path)
        .with_context(|| format!("failed to read snapshot {}", snapshot_path.display()))?;
    let mut store = Snapshot::from_json_str(&json)
        .context("failed to parse snapshot")?
        .into_store();

    match cli.command {
        Commands::Yield(args) => commands::run_yield(&store, &args, cli.format)?,
        Commands::Rewards(args) => commands::run_rewards(&mut store, &args, cli.format).await?,
        Commands::Balance(args) => commands::run_balance(&store, &args, cli.format)?,
    }

    Ok(())
}
