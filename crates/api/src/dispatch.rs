//! Reward refetch dispatcher.
//!
//! The single place where provider responses become store state. Each
//! refresh re-evaluates its recency gate at dispatch time, fetches, converts
//! through the provider's attribution function, and merges wholesale
//! (last-write-wins per provider, wallet and chain). A failed fetch leaves prior
//! state untouched: the unification layer keeps showing known-good data and
//! the gate retries on the next eligible dispatch.

use std::collections::HashMap;

use std::time::Instant;

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use tracing::debug;

use yieldlens_core::{chain_id, RewardProvider, Store, VaultEntity, VaultType};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::gate::RecencyGate;
use crate::merkl::{self, MerklClient};
use crate::onchain::{self, ClaimableSource};
use crate::stellaswap::{self, StellaswapClient};

/// Coordinates gated fetches across the reward providers.
pub struct RewardDispatcher {
    merkl: MerklClient,
    stellaswap: StellaswapClient,
    merkl_gate: RecencyGate,
    stellaswap_gate: RecencyGate,
}

fn fetch_key(chain: NamedChain, wallet: Address) -> String {
    format!("{}:{wallet:#x}", chain_id(chain))
}

impl RewardDispatcher {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            merkl: MerklClient::new(config)?,
            stellaswap: StellaswapClient::new(config)?,
            merkl_gate: RecencyGate::new(config.freshness_window, config.global_cooldown),
            stellaswap_gate: RecencyGate::new(config.freshness_window, config.global_cooldown),
        })
    }

    /// Arm a one-shot gate bypass for the next refresh of (provider, wallet,
    /// chain). Manual-retry affordance; the on-chain source is ungated.
    pub fn force_refresh(&self, provider: RewardProvider, chain: NamedChain, wallet: Address) {
        let key = fetch_key(chain, wallet);
        match provider {
            RewardProvider::Merkl => self.merkl_gate.force_once(&key),
            RewardProvider::Stellaswap => self.stellaswap_gate.force_once(&key),
            RewardProvider::OnChain => {}
        }
    }

    /// Refresh Merkl rewards and campaigns for a wallet on one chain.
    ///
    /// Returns `Ok(false)` when the recency gate suppressed the dispatch.
    pub async fn refresh_merkl(
        &self,
        store: &mut Store,
        chain: NamedChain,
        wallet: Address,
    ) -> Result<bool> {
        let key = fetch_key(chain, wallet);
        if !self.merkl_gate.should_dispatch(&key, Instant::now()) {
            debug!(%key, "merkl refresh suppressed by recency gate");
            return Ok(false);
        }
        self.merkl_gate.mark_dispatched(&key);

        let fetched = futures::future::try_join(
            self.merkl.user_rewards(chain, wallet),
            self.merkl.campaigns(chain),
        )
        .await;
        let (rewards, campaigns) = match fetched {
            Ok(resolved) => resolved,
            Err(e) => {
                self.merkl_gate.mark_failed(&key);
                return Err(e);
            }
        };

        let claimable = merkl::attribute_user_rewards(store, chain, &rewards);
        let campaign_map = merkl::attribute_campaigns(store, chain, &campaigns);
        store.merge_claimable(RewardProvider::Merkl, chain, wallet, claimable);
        store.merge_campaigns(RewardProvider::Merkl, chain, campaign_map);

        self.merkl_gate.mark_completed(&key, Instant::now());
        Ok(true)
    }

    /// Refresh StellaSwap rewards for a wallet on one chain.
    ///
    /// Returns `Ok(false)` when the recency gate suppressed the dispatch.
    pub async fn refresh_stellaswap(
        &self,
        store: &mut Store,
        chain: NamedChain,
        wallet: Address,
    ) -> Result<bool> {
        let key = fetch_key(chain, wallet);
        if !self.stellaswap_gate.should_dispatch(&key, Instant::now()) {
            debug!(%key, "stellaswap refresh suppressed by recency gate");
            return Ok(false);
        }
        self.stellaswap_gate.mark_dispatched(&key);

        let data = match self.stellaswap.user_rewards(wallet).await {
            Ok(data) => data,
            Err(e) => {
                self.stellaswap_gate.mark_failed(&key);
                return Err(e);
            }
        };

        let claimable = stellaswap::attribute_rewards(store, chain, &data);
        store.merge_claimable(RewardProvider::Stellaswap, chain, wallet, claimable);

        self.stellaswap_gate.mark_completed(&key, Instant::now());
        Ok(true)
    }

    /// Refresh on-chain claimable balances for a wallet across a chain's
    /// staking pools, one source call per pool. Ungated: the source is local
    /// reads, not a rate-limited campaign API.
    pub async fn refresh_onchain<S: ClaimableSource>(
        &self,
        source: &S,
        store: &mut Store,
        chain: NamedChain,
        wallet: Address,
    ) -> Result<bool> {
        let pools: Vec<VaultEntity> = store
            .vaults()
            .filter(|v| v.chain == chain && v.vault_type == VaultType::Gov)
            .cloned()
            .collect();

        let mut by_key: HashMap<String, Vec<_>> = HashMap::new();
        for pool in &pools {
            let rewards = source.fetch(pool, wallet).await?;
            let entries = onchain::to_claimable_entries(rewards);
            if !entries.is_empty() {
                by_key.insert(pool.id.clone(), entries);
            }
        }
        store.merge_claimable(RewardProvider::OnChain, chain, wallet, by_key);
        Ok(true)
    }
}
