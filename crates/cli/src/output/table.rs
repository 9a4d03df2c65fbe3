//! Table formatting for yield, reward and balance views.

use anyhow::Result;
use colored::Colorize;
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use yieldlens_core::{
    AddressBook, ApyLabels, BreakdownEntry, CalculatedBreakdown, ComponentRate, DisplayPeriod,
    RewardEntry, Store, VaultEntity,
};

#[derive(Tabled)]
struct ComponentRow {
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

#[derive(Tabled)]
struct RewardRow {
    #[tabled(rename = "Token")]
    token: String,
    #[tabled(rename = "Claimable")]
    claimable: String,
    #[tabled(rename = "Value (USD)")]
    value_usd: String,
    #[tabled(rename = "Campaign APR")]
    apr: String,
}

#[derive(Tabled)]
struct LocationRow {
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

#[derive(Tabled)]
struct AssetRow {
    #[tabled(rename = "Asset")]
    symbol: String,
    #[tabled(rename = "Per Token")]
    one: String,
    #[tabled(rename = "Pool Total")]
    total: String,
    #[tabled(rename = "Your Share")]
    user: String,
    #[tabled(rename = "% of Pool")]
    percent: String,
}

fn truncate_address(addr: &str) -> String {
    if addr.len() > 10 {
        format!("{}...{}", &addr[..6], &addr[addr.len() - 4..])
    } else {
        addr.to_string()
    }
}

fn format_rate(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

fn format_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}

fn format_usd(value: Decimal) -> String {
    format!("${:.2}", value)
}

fn styled(table: &mut Table) -> &mut Table {
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::left()))
}

#[allow(clippy::print_stdout)]
pub fn print_json(body: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(body)?);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn print_yield_table(
    vault: &VaultEntity,
    components: &[ComponentRate],
    total: f64,
    labels: &ApyLabels,
    period: DisplayPeriod,
) {
    let rows: Vec<ComponentRow> = components
        .iter()
        .map(|c| ComponentRow {
            component: c.component.key().to_string(),
            rate: format_rate(c.rate),
        })
        .collect();

    println!("{} ({})", vault.name.bold(), vault.id);
    if rows.is_empty() {
        println!("No yield components.");
    } else {
        let mut table = Table::new(rows);
        styled(&mut table);
        println!("{table}");
    }

    let (period_name, label_chain) = match period {
        DisplayPeriod::Daily => ("daily", &labels.daily),
        DisplayPeriod::Yearly => ("yearly", &labels.yearly),
    };
    println!("Total ({period_name}): {}", format_rate(total).bold());
    println!("Label chain: {}", label_chain.join(" > "));
}

#[allow(clippy::print_stdout)]
pub fn print_loading_notice() {
    println!("{}", "Rewards not fetched yet - run with --fetch.".yellow());
}

#[allow(clippy::print_stdout)]
pub fn print_rewards_table(entries: &[RewardEntry]) {
    let rows: Vec<RewardRow> = entries
        .iter()
        .map(|entry| {
            let value_usd = entry
                .price
                .map_or_else(|| "-".to_string(), |p| format_usd(entry.amount * p));
            let apr = match entry.apr {
                Some(apr) if entry.active => format_rate(apr),
                _ => "-".to_string(),
            };
            RewardRow {
                token: entry.token.symbol.clone(),
                claimable: format_amount(entry.amount),
                value_usd,
                apr,
            }
        })
        .collect();

    let mut table = Table::new(rows);
    styled(&mut table);
    println!("{table}");
}

#[allow(clippy::print_stdout)]
pub fn print_locations_table(
    store: &Store,
    vault: &VaultEntity,
    locations: &[BreakdownEntry],
    address_book: Option<&AddressBook>,
) {
    let rows: Vec<LocationRow> = locations
        .iter()
        .map(|entry| {
            let location = match entry {
                BreakdownEntry::Vault { .. } => "Direct".to_string(),
                BreakdownEntry::Boost { boost_id, .. } => describe_boost(
                    store,
                    vault,
                    boost_id,
                    address_book,
                ),
                BreakdownEntry::Bridged { chain, .. } => format!("Bridged ({chain})"),
                BreakdownEntry::PendingWithdrawal { request_id, .. } => {
                    format!("Pending withdrawal #{request_id}")
                }
            };
            LocationRow {
                location,
                amount: format_amount(entry.amount()),
            }
        })
        .collect();

    println!("{} ({})", vault.name.bold(), vault.id);
    let mut table = Table::new(rows);
    styled(&mut table);
    println!("{table}");
}

fn describe_boost(
    store: &Store,
    vault: &VaultEntity,
    boost_id: &str,
    address_book: Option<&AddressBook>,
) -> String {
    let Ok(boost) = store.boost(boost_id) else {
        return format!("Boost {boost_id}");
    };
    let promo = address_book
        .and_then(|book| book.lookup(vault.chain, boost.contract_address))
        .map(|record| format!(" [{}]", record.title))
        .unwrap_or_default();
    format!(
        "Boost {} ({}){}",
        boost.name,
        truncate_address(&format!("{:#x}", boost.contract_address)),
        promo
    )
}

#[allow(clippy::print_stdout)]
pub fn print_assets_table(calculated: &CalculatedBreakdown) {
    let rows: Vec<AssetRow> = calculated
        .assets
        .iter()
        .map(|asset| AssetRow {
            symbol: asset.symbol.clone(),
            one: format_amount(asset.one.amount),
            total: format_amount(asset.total.amount),
            user: format_amount(asset.user.amount),
            percent: format!("{:.1}%", asset.percent * 100.0),
        })
        .collect();

    let mut table = Table::new(rows);
    styled(&mut table);
    println!("{table}");
    println!(
        "Pool value: {}  Your value: {}",
        format_usd(calculated.total_value),
        format_usd(calculated.user_value).bold()
    );
}
