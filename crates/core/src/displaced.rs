//! Displaced balances: a user's vault-share balance held somewhere other
//! than directly in the vault's own token.
//!
//! Locations are pulled independently (boost stakes, bridge-side balances,
//! withdrawal-queue entries), each already expressed in deposit-token units,
//! and grouped by kind for presentation. The directly-held balance is
//! derived as the on-chain total minus everything displaced, so the parts
//! never double-count against the total.

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::chain::chain_serde;
use crate::error::Result;
use crate::store::{BoostId, Store};

/// One location of a user's balance, deposit-token units.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BreakdownEntry {
    /// Directly held share balance.
    Vault { amount: Decimal },
    /// Staked in a reward-boosting contract.
    #[serde(rename_all = "camelCase")]
    Boost { boost_id: BoostId, amount: Decimal },
    /// Represented on another chain.
    Bridged {
        #[serde(with = "chain_serde")]
        chain: NamedChain,
        amount: Decimal,
    },
    /// Queued in a withdrawal-request queue.
    #[serde(rename_all = "camelCase")]
    PendingWithdrawal { request_id: u64, amount: Decimal },
}

impl BreakdownEntry {
    pub fn amount(&self) -> Decimal {
        match self {
            BreakdownEntry::Vault { amount }
            | BreakdownEntry::Boost { amount, .. }
            | BreakdownEntry::Bridged { amount, .. }
            | BreakdownEntry::PendingWithdrawal { amount, .. } => *amount,
        }
    }
}

/// The displaced entries for a wallet in a vault, grouped by kind.
///
/// Empty vec when nothing is displaced - the common case, and deliberately
/// not an `Option` so call sites stay branch-free.
pub fn displaced(store: &Store, vault_id: &str, wallet: Address) -> Result<Vec<BreakdownEntry>> {
    store.vault(vault_id)?;
    let mut entries = Vec::new();

    for boost_id in store.boosts_for_vault(vault_id) {
        let amount = store.boost_stake(boost_id, wallet);
        if amount > Decimal::ZERO {
            entries.push(BreakdownEntry::Boost {
                boost_id: boost_id.clone(),
                amount,
            });
        }
    }
    for (chain, amount) in store.bridged_balances(vault_id, wallet) {
        if *amount > Decimal::ZERO {
            entries.push(BreakdownEntry::Bridged {
                chain: *chain,
                amount: *amount,
            });
        }
    }
    for request in store.withdrawal_requests(vault_id, wallet) {
        if request.amount > Decimal::ZERO {
            entries.push(BreakdownEntry::PendingWithdrawal {
                request_id: request.request_id,
                amount: request.amount,
            });
        }
    }
    Ok(entries)
}

/// The full location list: directly-held entry first, then everything
/// displaced. The sum of all amounts equals the user's total economic
/// position in the vault.
pub fn full_breakdown(
    store: &Store,
    vault_id: &str,
    wallet: Address,
) -> Result<Vec<BreakdownEntry>> {
    let displaced_entries = displaced(store, vault_id, wallet)?;
    let total = store.deposit_balance(vault_id, wallet);
    let displaced_sum: Decimal = displaced_entries.iter().map(BreakdownEntry::amount).sum();

    let direct = total - displaced_sum;
    let direct = if direct < Decimal::ZERO {
        warn!(
            vault = vault_id,
            %total,
            %displaced_sum,
            "displaced balances exceed on-chain total, flooring direct balance at zero"
        );
        Decimal::ZERO
    } else {
        direct
    };

    let mut entries = Vec::with_capacity(displaced_entries.len() + 1);
    entries.push(BreakdownEntry::Vault { amount: direct });
    entries.extend(displaced_entries);
    Ok(entries)
}
