//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use yieldlens_core::DisplayPeriod;

/// Yieldlens CLI - inspect vault yield, rewards and balances
#[derive(Parser, Debug)]
#[command(name = "yieldlens")]
#[command(about = "Inspect vault yield composition, rewards and balances", long_about = None)]
pub struct Cli {
    /// Store snapshot JSON file
    #[arg(long, global = true, env = "YIELDLENS_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a vault's yield composition and display labels
    Yield(YieldArgs),
    /// Show unified rewards for a vault
    Rewards(RewardsArgs),
    /// Show a wallet's balance locations and asset breakdown
    Balance(BalanceArgs),
}

#[derive(Parser, Debug)]
pub struct YieldArgs {
    /// Vault id
    pub vault_id: String,

    /// Display period
    #[arg(long, default_value = "yearly")]
    pub period: PeriodArg,
}

#[derive(Parser, Debug)]
pub struct RewardsArgs {
    /// Vault id
    pub vault_id: String,

    /// Wallet address (omit for the campaign-only potential-yield view)
    #[arg(long)]
    pub wallet: Option<String>,

    /// Refresh the off-chain reward providers before deriving
    #[arg(long)]
    pub fetch: bool,

    /// Arm a one-shot recency-gate bypass before fetching
    #[arg(long, requires = "fetch")]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct BalanceArgs {
    /// Vault id
    pub vault_id: String,

    /// Wallet address
    #[arg(long)]
    pub wallet: String,

    /// Address-book JSON for promo display metadata
    #[arg(long)]
    pub address_book: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum PeriodArg {
    Daily,
    #[default]
    Yearly,
}

impl PeriodArg {
    pub fn to_period(self) -> DisplayPeriod {
        match self {
            PeriodArg::Daily => DisplayPeriod::Daily,
            PeriodArg::Yearly => DisplayPeriod::Yearly,
        }
    }
}
