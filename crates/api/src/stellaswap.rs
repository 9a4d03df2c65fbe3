//! StellaSwap offchain rewarder client.
//!
//! One endpoint is consumed: per-wallet claimable rewards, grouped by pool.
//! The payload wraps its data in a status envelope; a non-`"success"` status
//! or missing data is a hard failure for the fetch. The provider carries no
//! rate information, so it contributes claimable balances only.

use std::collections::HashMap;

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use yieldlens_core::{synthetic_key, ClaimableEntry, RewardToken, Store};

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::scalars::parse_units;

const PROVIDER: &str = "stellaswap";

/// Status envelope around the rewards payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StellaRewardsResponse {
    pub status: String,
    #[serde(default)]
    pub data: Option<StellaRewardsData>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StellaRewardsData {
    #[serde(default)]
    pub pools: Vec<StellaPoolRewards>,
}

/// Claimable rewards for one pool.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StellaPoolRewards {
    pub pool: Address,
    pub rewarder: Address,
    #[serde(default)]
    pub reward_tokens: Vec<StellaRewardToken>,
    #[serde(default)]
    pub reward_info: Vec<StellaRewardInfo>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StellaRewardToken {
    pub address: Address,
    /// Lifetime amount, integer string.
    #[serde(default)]
    pub amount: String,
    /// Currently claimable amount, integer string.
    #[serde(default)]
    pub pending: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub proofs: Vec<String>,
    #[serde(default)]
    pub is_native: bool,
}

/// Token metadata shipped alongside the balances.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StellaRewardInfo {
    pub token: Address,
    pub decimals: u8,
    pub symbol: String,
}

/// HTTP client for the StellaSwap offchain rewards API.
#[derive(Debug, Clone)]
pub struct StellaswapClient {
    http: Client,
    base_url: Url,
}

impl StellaswapClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.stellaswap_url.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| ApiError::Parse {
                provider: PROVIDER,
                message: "base URL cannot be a base".to_string(),
            })?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Claimable rewards for a wallet.
    pub async fn user_rewards(&self, wallet: Address) -> Result<StellaRewardsData> {
        let url = self.endpoint(&["rewards", &format!("{wallet:#x}")])?;
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }
        let body: StellaRewardsResponse =
            response.json().await.map_err(|e| ApiError::Parse {
                provider: PROVIDER,
                message: e.to_string(),
            })?;
        if body.status != "success" {
            return Err(ApiError::ProviderFailure {
                provider: PROVIDER,
                status: body.status,
            });
        }
        body.data.ok_or(ApiError::ProviderFailure {
            provider: PROVIDER,
            status: "missing data".to_string(),
        })
    }
}

/// Attribute pending balances to reward vault keys by pool address.
///
/// Token metadata resolves through the payload's `rewardInfo` list; tokens
/// without metadata fall back to 18 decimals and an address-derived symbol
/// rather than being dropped.
pub fn attribute_rewards(
    store: &Store,
    chain: NamedChain,
    data: &StellaRewardsData,
) -> HashMap<String, Vec<ClaimableEntry>> {
    let mut by_key: HashMap<String, Vec<ClaimableEntry>> = HashMap::new();

    for pool in &data.pools {
        let key = store.try_vault_by_address(chain, pool.pool).map_or_else(
            || synthetic_key(chain, pool.pool),
            |vault| vault.id.clone(),
        );
        for reward in &pool.reward_tokens {
            let info = pool.reward_info.iter().find(|i| i.token == reward.address);
            let decimals = info.map_or(18, |i| i.decimals);
            let symbol = info.map_or_else(
                || {
                    debug!(token = %reward.address, "reward token without metadata");
                    format!("{:#x}", reward.address)
                },
                |i| i.symbol.clone(),
            );
            let Some(amount) = parse_units(&reward.pending, decimals) else {
                debug!(token = %reward.address, "unparseable pending amount, skipping");
                continue;
            };
            let entries = by_key.entry(key.clone()).or_default();
            match entries
                .iter_mut()
                .find(|e| e.token.address == reward.address)
            {
                Some(existing) => existing.amount += amount,
                None => entries.push(ClaimableEntry {
                    token: RewardToken {
                        address: reward.address,
                        symbol,
                        decimals,
                        price: store.token_price(chain, reward.address),
                    },
                    amount,
                }),
            }
        }
    }
    by_key
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use yieldlens_core::{CowcentratedIds, VaultEntity, VaultType};

    fn store_with_vault(address: Address) -> Store {
        let mut store = Store::new();
        store.replace_vaults(vec![VaultEntity {
            id: "stella-vault".to_string(),
            name: "Stella".to_string(),
            vault_type: VaultType::Cowcentrated,
            chain: NamedChain::Moonbeam,
            contract_address: address,
            deposit_token_address: Address::ZERO,
            assets: vec![],
            cowcentrated_ids: CowcentratedIds::default(),
            platform_id: None,
            risks: vec![],
        }]);
        store
    }

    fn pool_rewards(pool: Address, pending: &str) -> StellaPoolRewards {
        let token = Address::from([0x33u8; 20]);
        StellaPoolRewards {
            pool,
            rewarder: Address::from([0x44u8; 20]),
            reward_tokens: vec![StellaRewardToken {
                address: token,
                amount: pending.to_string(),
                pending: pending.to_string(),
                position: None,
                proofs: vec![],
                is_native: false,
            }],
            reward_info: vec![StellaRewardInfo {
                token,
                decimals: 18,
                symbol: "STELLA".to_string(),
            }],
        }
    }

    #[test]
    fn test_attribution_by_pool_address() {
        let pool = Address::from([0x11u8; 20]);
        let store = store_with_vault(pool);
        let data = StellaRewardsData {
            pools: vec![pool_rewards(pool, "4000000000000000000")],
        };

        let by_key = attribute_rewards(&store, NamedChain::Moonbeam, &data);
        assert_eq!(by_key["stella-vault"][0].amount, dec!(4));
        assert_eq!(by_key["stella-vault"][0].token.symbol, "STELLA");
    }

    #[test]
    fn test_unknown_pool_goes_to_synthetic_key() {
        let store = store_with_vault(Address::from([0x11u8; 20]));
        let unknown = Address::from([0x99u8; 20]);
        let data = StellaRewardsData {
            pools: vec![pool_rewards(unknown, "1000000000000000000")],
        };

        let by_key = attribute_rewards(&store, NamedChain::Moonbeam, &data);
        let key = "1284:0x9999999999999999999999999999999999999999";
        assert_eq!(by_key[key][0].amount, dec!(1));
    }

    #[test]
    fn test_missing_metadata_falls_back() {
        let pool = Address::from([0x11u8; 20]);
        let store = store_with_vault(pool);
        let mut rewards = pool_rewards(pool, "5000000000000000000");
        rewards.reward_info.clear();
        let data = StellaRewardsData {
            pools: vec![rewards],
        };

        let by_key = attribute_rewards(&store, NamedChain::Moonbeam, &data);
        let entry = &by_key["stella-vault"][0];
        assert_eq!(entry.token.decimals, 18);
        assert_eq!(entry.amount, dec!(5));
        assert!(entry.token.symbol.starts_with("0x"));
    }
}
