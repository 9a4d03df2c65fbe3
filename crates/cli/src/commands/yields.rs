//! `yield` command: yield composition and display labels for one vault.

use anyhow::{Context, Result};
use serde_json::json;

use yieldlens_core::{apy_labels, classify, components, total_for_period, Store};

use crate::cli::{OutputFormat, YieldArgs};
use crate::output;

pub fn run_yield(store: &Store, args: &YieldArgs, format: OutputFormat) -> Result<()> {
    let vault = store.vault(&args.vault_id)?;
    let raw = store
        .apy_breakdown(&args.vault_id)
        .with_context(|| format!("no yield data for vault {}", args.vault_id))?;

    let period = args.period.to_period();
    let variant = classify(vault);
    let labels = apy_labels(variant, raw.total_type);
    let component_rates = components(raw, period);
    let total = total_for_period(raw, period);

    match format {
        OutputFormat::Table => {
            output::print_yield_table(vault, &component_rates, total, &labels, period);
        }
        OutputFormat::Json => {
            let body = json!({
                "vaultId": vault.id,
                "period": period,
                "total": total,
                "components": component_rates,
                "labels": labels,
            });
            output::print_json(&body)?;
        }
    }
    Ok(())
}
