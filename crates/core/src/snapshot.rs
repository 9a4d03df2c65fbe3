//! Store snapshots.
//!
//! A snapshot is the serialized form of everything a fetch cycle would have
//! merged into the store: entities, rates, compositions, balances and raw
//! reward state. Loading one replays the merges, so derivations behave
//! exactly as they would against live-fetched data.

use std::collections::HashMap;

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::apy::RawApyBreakdown;
use crate::breakdown::PoolComposition;
use crate::chain::chain_serde;
use crate::rewards::{CampaignEntry, ClaimableEntry, RewardProvider};
use crate::store::{
    BoostEntity, BoostId, PlatformEntity, Store, TokenEntity, VaultEntity, VaultId,
    WithdrawalRequest,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApyRecord {
    pub vault_id: VaultId,
    #[serde(flatten)]
    pub breakdown: RawApyBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionRecord {
    pub vault_id: VaultId,
    pub composition: PoolComposition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRecord {
    pub vault_id: VaultId,
    pub wallet: Address,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoostStakeRecord {
    pub boost_id: BoostId,
    pub wallet: Address,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgedRecord {
    pub vault_id: VaultId,
    pub wallet: Address,
    #[serde(with = "chain_serde")]
    pub chain: NamedChain,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRecord {
    pub vault_id: VaultId,
    pub wallet: Address,
    pub request_id: u64,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimableRecord {
    pub provider: RewardProvider,
    #[serde(with = "chain_serde")]
    pub chain: NamedChain,
    pub vault_key: String,
    pub wallet: Address,
    pub entries: Vec<ClaimableEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRecord {
    pub provider: RewardProvider,
    #[serde(with = "chain_serde")]
    pub chain: NamedChain,
    pub vault_key: String,
    pub entries: Vec<CampaignEntry>,
}

/// Serialized store state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub vaults: Vec<VaultEntity>,
    pub tokens: Vec<TokenEntity>,
    pub platforms: Vec<PlatformEntity>,
    pub boosts: Vec<BoostEntity>,
    pub apys: Vec<ApyRecord>,
    pub compositions: Vec<CompositionRecord>,
    pub deposits: Vec<DepositRecord>,
    pub boost_stakes: Vec<BoostStakeRecord>,
    pub bridged: Vec<BridgedRecord>,
    pub withdrawals: Vec<WithdrawalRecord>,
    pub claimable: Vec<ClaimableRecord>,
    pub campaigns: Vec<CampaignRecord>,
}

impl Snapshot {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build a store by replaying the snapshot through the merge methods.
    pub fn into_store(self) -> Store {
        let mut store = Store::new();
        store.replace_vaults(self.vaults);
        store.replace_tokens(self.tokens);
        store.replace_platforms(self.platforms);
        store.replace_boosts(self.boosts);

        for record in self.apys {
            store.set_apy_breakdown(record.vault_id, record.breakdown);
        }
        for record in self.compositions {
            store.set_composition(record.vault_id, record.composition);
        }
        for record in self.deposits {
            store.set_deposit_balance(record.vault_id, record.wallet, record.amount);
        }
        for record in self.boost_stakes {
            store.set_boost_stake(record.boost_id, record.wallet, record.amount);
        }

        let mut bridged: HashMap<(VaultId, Address), Vec<(NamedChain, Decimal)>> = HashMap::new();
        for record in self.bridged {
            bridged
                .entry((record.vault_id, record.wallet))
                .or_default()
                .push((record.chain, record.amount));
        }
        for ((vault_id, wallet), balances) in bridged {
            store.set_bridged_balances(vault_id, wallet, balances);
        }

        let mut withdrawals: HashMap<(VaultId, Address), Vec<WithdrawalRequest>> = HashMap::new();
        for record in self.withdrawals {
            withdrawals
                .entry((record.vault_id, record.wallet))
                .or_default()
                .push(WithdrawalRequest {
                    request_id: record.request_id,
                    amount: record.amount,
                });
        }
        for ((vault_id, wallet), requests) in withdrawals {
            store.set_withdrawal_requests(vault_id, wallet, requests);
        }

        let mut claimable: HashMap<
            (RewardProvider, NamedChain, Address),
            HashMap<String, Vec<ClaimableEntry>>,
        > = HashMap::new();
        for record in self.claimable {
            claimable
                .entry((record.provider, record.chain, record.wallet))
                .or_default()
                .entry(record.vault_key)
                .or_default()
                .extend(record.entries);
        }
        for ((provider, chain, wallet), by_key) in claimable {
            store.merge_claimable(provider, chain, wallet, by_key);
        }

        let mut campaigns: HashMap<(RewardProvider, NamedChain), HashMap<String, Vec<CampaignEntry>>> =
            HashMap::new();
        for record in self.campaigns {
            campaigns
                .entry((record.provider, record.chain))
                .or_default()
                .entry(record.vault_key)
                .or_default()
                .extend(record.entries);
        }
        for ((provider, chain), by_key) in campaigns {
            store.merge_campaigns(provider, chain, by_key);
        }

        store
    }
}
