//! `rewards` command: unified reward view for one vault.

use std::str::FromStr;

use alloy_primitives::Address;
use anyhow::{Context, Result};
use serde_json::json;

use yieldlens_api::{ClientConfig, RewardDispatcher};
use yieldlens_core::{unify, RewardProvider, Store};

use crate::cli::{OutputFormat, RewardsArgs};
use crate::output;

pub async fn run_rewards(store: &mut Store, args: &RewardsArgs, format: OutputFormat) -> Result<()> {
    let wallet = args
        .wallet
        .as_deref()
        .map(Address::from_str)
        .transpose()
        .context("invalid wallet address")?;

    if args.fetch {
        let chain = store.vault(&args.vault_id)?.chain;
        let wallet = wallet.context("--fetch requires --wallet")?;
        let dispatcher = RewardDispatcher::new(&ClientConfig::new())?;
        if args.force {
            dispatcher.force_refresh(RewardProvider::Merkl, chain, wallet);
            dispatcher.force_refresh(RewardProvider::Stellaswap, chain, wallet);
        }
        dispatcher
            .refresh_merkl(store, chain, wallet)
            .await
            .context("merkl refresh failed; retry with --force to bypass the cool-down")?;
        dispatcher
            .refresh_stellaswap(store, chain, wallet)
            .await
            .context("stellaswap refresh failed; retry with --force to bypass the cool-down")?;
    }

    let unified = unify(store, &args.vault_id, wallet)?;

    match format {
        OutputFormat::Table => match unified {
            None => output::print_loading_notice(),
            // an empty result renders nothing: no error, no empty-state noise
            Some(entries) if entries.is_empty() => {}
            Some(entries) => output::print_rewards_table(&entries),
        },
        OutputFormat::Json => {
            let body = json!({
                "vaultId": args.vault_id,
                "rewards": unified,
            });
            output::print_json(&body)?;
        }
    }
    Ok(())
}
