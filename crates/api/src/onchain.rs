//! On-chain claimable reward source.
//!
//! Staking-pool contracts expose per-wallet claimable balances; how they are
//! read (multicall, archive node, indexer) is a black box behind
//! [`ClaimableSource`]. This module only fixes the response shape and its
//! conversion into store entries.

use std::future::Future;

use alloy_primitives::Address;
use serde::Deserialize;
use tracing::debug;

use yieldlens_core::{ClaimableEntry, RewardToken, VaultEntity};

use crate::error::Result;
use crate::scalars::parse_units;

/// One claimable balance from a staking-pool contract call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimableReward {
    pub token_address: Address,
    pub decimals: u8,
    pub symbol: String,
    /// Integer string in the token's smallest unit.
    pub amount: String,
}

/// Source of on-chain claimable rewards, one call per staking pool.
pub trait ClaimableSource {
    fn fetch(
        &self,
        vault: &VaultEntity,
        wallet: Address,
    ) -> impl Future<Output = Result<Vec<ClaimableReward>>> + Send;
}

/// Convert raw contract responses to store entries.
///
/// Entries with unparseable amounts are skipped with a diagnostic.
pub fn to_claimable_entries(rewards: Vec<ClaimableReward>) -> Vec<ClaimableEntry> {
    rewards
        .into_iter()
        .filter_map(|reward| {
            let Some(amount) = parse_units(&reward.amount, reward.decimals) else {
                debug!(
                    token = %reward.token_address,
                    amount = %reward.amount,
                    "skipping claimable entry with unparseable amount"
                );
                return None;
            };
            Some(ClaimableEntry {
                token: RewardToken {
                    address: reward.token_address,
                    symbol: reward.symbol,
                    decimals: reward.decimals,
                    price: None,
                },
                amount,
            })
        })
        .collect()
}
