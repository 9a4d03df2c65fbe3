//! `balance` command: balance locations and asset decomposition.

use std::str::FromStr;

use alloy_primitives::Address;
use anyhow::{Context, Result};
use serde_json::json;

use yieldlens_core::{breakdown, full_breakdown, AddressBook, Store};

use crate::cli::{BalanceArgs, OutputFormat};
use crate::output;

pub fn run_balance(store: &Store, args: &BalanceArgs, format: OutputFormat) -> Result<()> {
    let wallet = Address::from_str(&args.wallet).context("invalid wallet address")?;
    let vault = store.vault(&args.vault_id)?;

    let address_book = match &args.address_book {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read address book {}", path.display()))?;
            Some(AddressBook::from_json_str(&json).context("failed to parse address book")?)
        }
        None => None,
    };

    let locations = full_breakdown(store, &args.vault_id, wallet)?;
    let assets = breakdown(store, &args.vault_id, wallet)?;

    match format {
        OutputFormat::Table => {
            output::print_locations_table(store, vault, &locations, address_book.as_ref());
            if let Some(calculated) = &assets {
                output::print_assets_table(calculated);
            }
        }
        OutputFormat::Json => {
            let body = json!({
                "vaultId": vault.id,
                "locations": locations,
                "assets": assets,
            });
            output::print_json(&body)?;
        }
    }
    Ok(())
}
