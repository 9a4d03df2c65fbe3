//! Normalized entity store.
//!
//! Holds vault/chain/token records keyed by id, with indexes by contract
//! address. Pure data: all behavior lives in the derivation modules, which
//! read the store but never mutate it. Mutation happens only through the
//! merge methods here, each of which replaces state wholesale for its key and
//! bumps the store version so memoized derivations invalidate.

use std::collections::{HashMap, HashSet};

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::chain::chain_serde;
use crate::error::{Result, StoreError};
use crate::rewards::{CampaignEntry, ClaimableEntry, RewardProvider};

/// Vault identifier (globally unique across chains).
pub type VaultId = String;

/// Boost identifier.
pub type BoostId = String;

/// Stored vault discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaultType {
    /// Plain compounding vault.
    Standard,
    /// Staking pool paying rewards on a deposited token.
    Gov,
    /// Concentrated-liquidity position manager.
    Cowcentrated,
    /// Tokenized-vault standard wrapper.
    Erc4626,
}

/// Cross-links between a concentrated-liquidity vault and its siblings.
///
/// Present on both sides of each relation: the CLM lists its wrappers under
/// `pool`/`vault`, wrappers list the CLM under `clm`, and the reward-pool
/// wrapper additionally points back at the CLM through `vault` (the symmetry
/// invariant checked by `taxonomy::check_symmetry`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CowcentratedIds {
    /// The base concentrated-liquidity vault, on wrappers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clm: Option<VaultId>,
    /// The reward-pool (gov) wrapper, on the CLM.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<VaultId>,
    /// The compounding vault wrapper, on the CLM; on a reward-pool wrapper,
    /// the vault it stakes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault: Option<VaultId>,
}

impl CowcentratedIds {
    pub fn is_empty(&self) -> bool {
        self.clm.is_none() && self.pool.is_none() && self.vault.is_none()
    }
}

/// A vault record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultEntity {
    pub id: VaultId,
    pub name: String,
    #[serde(rename = "type")]
    pub vault_type: VaultType,
    #[serde(with = "chain_serde")]
    pub chain: NamedChain,
    /// Address of the share/receipt token contract.
    pub contract_address: Address,
    /// Address of the token deposited into the vault.
    pub deposit_token_address: Address,
    /// Symbols of the underlying assets, for display.
    #[serde(default)]
    pub assets: Vec<String>,
    #[serde(default)]
    pub cowcentrated_ids: CowcentratedIds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_id: Option<String>,
    #[serde(default)]
    pub risks: Vec<String>,
}

/// A token record, uniquely addressed per chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenEntity {
    #[serde(with = "chain_serde")]
    pub chain: NamedChain,
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

/// A platform record (the protocol a vault farms).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformEntity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub risks: Vec<String>,
}

/// A reward-boosting contract attached to a vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoostEntity {
    pub id: BoostId,
    pub vault_id: VaultId,
    pub name: String,
    #[serde(with = "chain_serde")]
    pub chain: NamedChain,
    pub contract_address: Address,
}

/// An entry in a vault's withdrawal-request queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    pub request_id: u64,
    /// Amount queued, in deposit-token units.
    pub amount: Decimal,
}

/// Raw reward state, keyed by provider.
///
/// Claimable entries are keyed by a reward vault key: either a known
/// [`VaultId`] or a synthetic `"<chainId>:<address>"` key for balances whose
/// vault association could not be resolved.
#[derive(Debug, Default)]
struct RewardState {
    claimable: HashMap<(RewardProvider, String, Address), Vec<ClaimableEntry>>,
    campaigns: HashMap<(RewardProvider, String), Vec<CampaignEntry>>,
    fetched: HashSet<(RewardProvider, Address)>,
}

/// The normalized entity store.
///
/// The single shared mutable resource of the system. `version()` increases on
/// every merge; derivation caches key off it.
#[derive(Debug, Default)]
pub struct Store {
    version: u64,
    vaults: HashMap<VaultId, VaultEntity>,
    vault_by_address: HashMap<(NamedChain, Address), VaultId>,
    tokens: HashMap<(NamedChain, Address), TokenEntity>,
    platforms: HashMap<String, PlatformEntity>,
    boosts: HashMap<BoostId, BoostEntity>,
    boosts_by_vault: HashMap<VaultId, Vec<BoostId>>,
    apys: HashMap<VaultId, crate::apy::RawApyBreakdown>,
    compositions: HashMap<VaultId, crate::breakdown::PoolComposition>,
    deposits: HashMap<(VaultId, Address), Decimal>,
    boost_stakes: HashMap<(BoostId, Address), Decimal>,
    bridged: HashMap<(VaultId, Address), Vec<(NamedChain, Decimal)>>,
    withdrawals: HashMap<(VaultId, Address), Vec<WithdrawalRequest>>,
    rewards: RewardState,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current store version. Bumped by every merge method.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn bump(&mut self) {
        self.version += 1;
    }

    // ---- direct accessors (lookup failure is an error) ----

    pub fn vault(&self, id: &str) -> Result<&VaultEntity> {
        self.vaults
            .get(id)
            .ok_or_else(|| StoreError::VaultNotFound(id.to_string()))
    }

    pub fn token(&self, chain: NamedChain, address: Address) -> Result<&TokenEntity> {
        self.tokens
            .get(&(chain, address))
            .ok_or(StoreError::TokenNotFound { chain, address })
    }

    pub fn boost(&self, id: &str) -> Result<&BoostEntity> {
        self.boosts
            .get(id)
            .ok_or_else(|| StoreError::BoostNotFound(id.to_string()))
    }

    pub fn platform(&self, id: &str) -> Result<&PlatformEntity> {
        self.platforms
            .get(id)
            .ok_or_else(|| StoreError::PlatformNotFound(id.to_string()))
    }

    // ---- speculative accessors (absence is not an error) ----

    pub fn try_vault(&self, id: &str) -> Option<&VaultEntity> {
        self.vaults.get(id)
    }

    /// Look up a vault by its share-token contract address. Used when probing
    /// whether an address belongs to a vault at all.
    pub fn try_vault_by_address(&self, chain: NamedChain, address: Address) -> Option<&VaultEntity> {
        self.vault_by_address
            .get(&(chain, address))
            .and_then(|id| self.vaults.get(id))
    }

    pub fn try_token(&self, chain: NamedChain, address: Address) -> Option<&TokenEntity> {
        self.tokens.get(&(chain, address))
    }

    pub fn token_price(&self, chain: NamedChain, address: Address) -> Option<Decimal> {
        self.tokens.get(&(chain, address)).and_then(|t| t.price)
    }

    pub fn vaults(&self) -> impl Iterator<Item = &VaultEntity> {
        self.vaults.values()
    }

    pub fn boosts_for_vault(&self, vault_id: &str) -> &[BoostId] {
        self.boosts_by_vault
            .get(vault_id)
            .map_or(&[], Vec::as_slice)
    }

    /// Risk tags for a vault, resolving vault/platform disagreement.
    ///
    /// When both the vault and its platform carry tags and they disagree, the
    /// platform's tags win and a diagnostic is emitted.
    pub fn effective_risks(&self, vault: &VaultEntity) -> Vec<String> {
        let platform_risks = vault
            .platform_id
            .as_deref()
            .and_then(|id| self.platforms.get(id))
            .map(|p| p.risks.clone())
            .unwrap_or_default();

        if platform_risks.is_empty() {
            return vault.risks.clone();
        }
        if !vault.risks.is_empty() && vault.risks != platform_risks {
            debug!(
                vault = %vault.id,
                "vault risk tags disagree with platform tags, using platform tags"
            );
        }
        platform_risks
    }

    // ---- apy / composition / balance reads ----

    pub fn apy_breakdown(&self, vault_id: &str) -> Option<&crate::apy::RawApyBreakdown> {
        self.apys.get(vault_id)
    }

    pub fn composition(&self, vault_id: &str) -> Option<&crate::breakdown::PoolComposition> {
        self.compositions.get(vault_id)
    }

    /// Total on-chain holding for a wallet in a vault, deposit-token units.
    pub fn deposit_balance(&self, vault_id: &str, wallet: Address) -> Decimal {
        self.deposits
            .get(&(vault_id.to_string(), wallet))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn boost_stake(&self, boost_id: &str, wallet: Address) -> Decimal {
        self.boost_stakes
            .get(&(boost_id.to_string(), wallet))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn bridged_balances(&self, vault_id: &str, wallet: Address) -> &[(NamedChain, Decimal)] {
        self.bridged
            .get(&(vault_id.to_string(), wallet))
            .map_or(&[], Vec::as_slice)
    }

    pub fn withdrawal_requests(&self, vault_id: &str, wallet: Address) -> &[WithdrawalRequest] {
        self.withdrawals
            .get(&(vault_id.to_string(), wallet))
            .map_or(&[], Vec::as_slice)
    }

    // ---- reward reads ----

    pub fn claimable(
        &self,
        provider: RewardProvider,
        vault_key: &str,
        wallet: Address,
    ) -> &[ClaimableEntry] {
        self.rewards
            .claimable
            .get(&(provider, vault_key.to_string(), wallet))
            .map_or(&[], Vec::as_slice)
    }

    pub fn campaigns(&self, provider: RewardProvider, vault_key: &str) -> &[CampaignEntry] {
        self.rewards
            .campaigns
            .get(&(provider, vault_key.to_string()))
            .map_or(&[], Vec::as_slice)
    }

    /// Whether any fetch for (provider, wallet) has completed and been merged.
    pub fn has_fetched(&self, provider: RewardProvider, wallet: Address) -> bool {
        self.rewards.fetched.contains(&(provider, wallet))
    }

    // ---- merge methods (the only mutation points) ----

    /// Replace all vault records. Duplicate ids keep the last record seen and
    /// log a data-integrity warning.
    pub fn replace_vaults(&mut self, vaults: Vec<VaultEntity>) {
        self.vaults.clear();
        self.vault_by_address.clear();
        for vault in vaults {
            if self.vaults.contains_key(&vault.id) {
                warn!(vault = %vault.id, "duplicate vault id on merge, keeping last");
            }
            self.vault_by_address
                .insert((vault.chain, vault.contract_address), vault.id.clone());
            self.vaults.insert(vault.id.clone(), vault);
        }
        self.bump();
    }

    pub fn replace_tokens(&mut self, tokens: Vec<TokenEntity>) {
        self.tokens.clear();
        for token in tokens {
            let key = (token.chain, token.address);
            if self.tokens.contains_key(&key) {
                warn!(address = %token.address, "duplicate token on merge, keeping last");
            }
            self.tokens.insert(key, token);
        }
        self.bump();
    }

    pub fn replace_platforms(&mut self, platforms: Vec<PlatformEntity>) {
        self.platforms.clear();
        for platform in platforms {
            self.platforms.insert(platform.id.clone(), platform);
        }
        self.bump();
    }

    pub fn replace_boosts(&mut self, boosts: Vec<BoostEntity>) {
        self.boosts.clear();
        self.boosts_by_vault.clear();
        for boost in boosts {
            self.boosts_by_vault
                .entry(boost.vault_id.clone())
                .or_default()
                .push(boost.id.clone());
            self.boosts.insert(boost.id.clone(), boost);
        }
        self.bump();
    }

    pub fn set_apy_breakdown(&mut self, vault_id: VaultId, raw: crate::apy::RawApyBreakdown) {
        self.apys.insert(vault_id, raw);
        self.bump();
    }

    pub fn set_composition(
        &mut self,
        vault_id: VaultId,
        composition: crate::breakdown::PoolComposition,
    ) {
        self.compositions.insert(vault_id, composition);
        self.bump();
    }

    pub fn set_deposit_balance(&mut self, vault_id: VaultId, wallet: Address, amount: Decimal) {
        self.deposits.insert((vault_id, wallet), amount);
        self.bump();
    }

    pub fn set_boost_stake(&mut self, boost_id: BoostId, wallet: Address, amount: Decimal) {
        self.boost_stakes.insert((boost_id, wallet), amount);
        self.bump();
    }

    pub fn set_bridged_balances(
        &mut self,
        vault_id: VaultId,
        wallet: Address,
        balances: Vec<(NamedChain, Decimal)>,
    ) {
        self.bridged.insert((vault_id, wallet), balances);
        self.bump();
    }

    pub fn set_withdrawal_requests(
        &mut self,
        vault_id: VaultId,
        wallet: Address,
        requests: Vec<WithdrawalRequest>,
    ) {
        self.withdrawals.insert((vault_id, wallet), requests);
        self.bump();
    }

    /// Merge a resolved claimable-balance fetch for (provider, wallet, chain).
    ///
    /// Last-write-wins on the per-wallet/chain state: every previously held
    /// entry for the same provider, wallet and chain is dropped first, so a
    /// late-resolving stale response simply overwrites with well-formed data;
    /// other chains are untouched. Marks the (provider, wallet) pair as
    /// fetched even when the response was empty.
    pub fn merge_claimable(
        &mut self,
        provider: RewardProvider,
        chain: NamedChain,
        wallet: Address,
        by_vault_key: HashMap<String, Vec<ClaimableEntry>>,
    ) {
        let stale: Vec<String> = self
            .rewards
            .claimable
            .keys()
            .filter(|(p, key, w)| {
                *p == provider && *w == wallet && self.vault_key_chain(key) == Some(chain)
            })
            .map(|(_, key, _)| key.clone())
            .collect();
        for key in stale {
            self.rewards.claimable.remove(&(provider, key, wallet));
        }
        for (key, entries) in by_vault_key {
            self.rewards
                .claimable
                .insert((provider, key, wallet), entries);
        }
        self.rewards.fetched.insert((provider, wallet));
        self.bump();
    }

    /// Merge a resolved campaign fetch for (provider, chain).
    ///
    /// Replaces all campaign entries of the provider on the given chain;
    /// campaigns on other chains are untouched.
    pub fn merge_campaigns(
        &mut self,
        provider: RewardProvider,
        chain: NamedChain,
        by_vault_key: HashMap<String, Vec<CampaignEntry>>,
    ) {
        let stale: Vec<String> = self
            .rewards
            .campaigns
            .keys()
            .filter(|(p, key)| *p == provider && self.vault_key_chain(key) == Some(chain))
            .map(|(_, key)| key.clone())
            .collect();
        for key in stale {
            self.rewards.campaigns.remove(&(provider, key));
        }
        for (key, entries) in by_vault_key {
            self.rewards.campaigns.insert((provider, key), entries);
        }
        self.bump();
    }

    /// Chain of a reward vault key: a known vault's chain, or the numeric
    /// prefix of a synthetic `"<chainId>:<address>"` key.
    fn vault_key_chain(&self, key: &str) -> Option<NamedChain> {
        if let Some(vault) = self.vaults.get(key) {
            return Some(vault.chain);
        }
        let (prefix, _) = key.split_once(':')?;
        prefix
            .parse::<u64>()
            .ok()
            .and_then(|id| NamedChain::try_from(id).ok())
    }
}
