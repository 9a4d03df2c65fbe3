//! Merkl campaign distributor client.
//!
//! Two endpoints are consumed: per-wallet claimable rewards and the active
//! campaign list per chain. Claimable balances arrive keyed by reward token,
//! with per-reason sub-balances whose reason id carries the associated vault
//! address as a trailing `_0x…` segment.

use std::collections::HashMap;

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use yieldlens_core::{
    chain_id, synthetic_key, CampaignEntry, ClaimableEntry, RewardToken, Store,
};

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::scalars::{parse_address, parse_units};

const PROVIDER: &str = "merkl";

/// Provider-internal accounting tokens, filtered out before merge: they are
/// not real rewards.
pub const EXCLUDED_REWARD_SYMBOLS: &[&str] = &["aglaMerkl"];

/// Per-reason sub-balance of a reward token.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MerklReasonRewards {
    pub accumulated: String,
    pub unclaimed: String,
}

/// Rewards for one token across all reasons.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MerklTokenRewards {
    pub decimals: u8,
    pub symbol: String,
    pub accumulated: String,
    pub unclaimed: String,
    #[serde(default)]
    pub reasons: HashMap<String, MerklReasonRewards>,
    #[serde(default)]
    pub proof: Vec<String>,
}

/// Per-wallet rewards response, keyed by reward token address.
pub type MerklUserRewards = HashMap<Address, MerklTokenRewards>;

/// One active campaign.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerklCampaign {
    pub chain_id: u64,
    /// Address of the incentivized pool.
    pub main_parameter: Address,
    /// Annualized simple rate the campaign currently emits.
    pub apr: f64,
    pub reward_token: MerklCampaignToken,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MerklCampaignToken {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

/// HTTP client for the Merkl API.
#[derive(Debug, Clone)]
pub struct MerklClient {
    http: Client,
    base_url: Url,
}

impl MerklClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.merkl_url.clone(),
        })
    }

    fn endpoint(&self, segment: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Parse {
                provider: PROVIDER,
                message: "base URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    /// Claimable rewards for a wallet on one chain.
    pub async fn user_rewards(
        &self,
        chain: NamedChain,
        user: Address,
    ) -> Result<MerklUserRewards> {
        let url = self.endpoint("userRewards")?;
        let response = self
            .http
            .get(url)
            .query(&[
                ("chainId", chain_id(chain).to_string()),
                ("user", format!("{user:#x}")),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }
        response.json().await.map_err(|e| ApiError::Parse {
            provider: PROVIDER,
            message: e.to_string(),
        })
    }

    /// Active campaigns on one chain.
    pub async fn campaigns(&self, chain: NamedChain) -> Result<Vec<MerklCampaign>> {
        let url = self.endpoint("campaigns")?;
        let response = self
            .http
            .get(url)
            .query(&[("chainIds", chain_id(chain).to_string())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }
        let campaigns: Vec<MerklCampaign> =
            response.json().await.map_err(|e| ApiError::Parse {
                provider: PROVIDER,
                message: e.to_string(),
            })?;
        // the endpoint is asked for one chain, but don't trust it
        Ok(campaigns
            .into_iter()
            .filter(|c| c.chain_id == chain_id(chain))
            .collect())
    }
}

/// The vault address encoded in a reason id (trailing `_0x…` segment).
fn reason_vault_address(reason: &str) -> Option<Address> {
    reason.rsplit('_').next().and_then(parse_address)
}

/// Attribute per-reason unclaimed balances to reward vault keys.
///
/// Reasons whose address is not a known vault go to the synthetic
/// `"<chainId>:<address>"` key rather than being dropped; reasons without a
/// parsable address cannot be attributed and are skipped. Excluded
/// provider-internal tokens are filtered here, before any merge.
pub fn attribute_user_rewards(
    store: &Store,
    chain: NamedChain,
    rewards: &MerklUserRewards,
) -> HashMap<String, Vec<ClaimableEntry>> {
    let mut by_key: HashMap<String, Vec<ClaimableEntry>> = HashMap::new();

    for (token_address, token_rewards) in rewards {
        if EXCLUDED_REWARD_SYMBOLS.contains(&token_rewards.symbol.as_str()) {
            debug!(symbol = %token_rewards.symbol, "excluding provider accounting token");
            continue;
        }
        for (reason, reason_rewards) in &token_rewards.reasons {
            let Some(vault_address) = reason_vault_address(reason) else {
                debug!(%reason, "reason id carries no vault address, skipping");
                continue;
            };
            let Some(amount) = parse_units(&reason_rewards.unclaimed, token_rewards.decimals)
            else {
                debug!(%reason, "unparseable unclaimed amount, skipping");
                continue;
            };
            let key = store
                .try_vault_by_address(chain, vault_address)
                .map_or_else(
                    || synthetic_key(chain, vault_address),
                    |vault| vault.id.clone(),
                );
            let entries = by_key.entry(key).or_default();
            match entries
                .iter_mut()
                .find(|e| e.token.address == *token_address)
            {
                Some(existing) => existing.amount += amount,
                None => entries.push(ClaimableEntry {
                    token: RewardToken {
                        address: *token_address,
                        symbol: token_rewards.symbol.clone(),
                        decimals: token_rewards.decimals,
                        price: store.token_price(chain, *token_address),
                    },
                    amount,
                }),
            }
        }
    }
    by_key
}

/// Attribute active campaigns to reward vault keys by pool address.
pub fn attribute_campaigns(
    store: &Store,
    chain: NamedChain,
    campaigns: &[MerklCampaign],
) -> HashMap<String, Vec<CampaignEntry>> {
    let mut by_key: HashMap<String, Vec<CampaignEntry>> = HashMap::new();

    for campaign in campaigns {
        if EXCLUDED_REWARD_SYMBOLS.contains(&campaign.reward_token.symbol.as_str()) {
            continue;
        }
        let key = store
            .try_vault_by_address(chain, campaign.main_parameter)
            .map_or_else(
                || synthetic_key(chain, campaign.main_parameter),
                |vault| vault.id.clone(),
            );
        by_key.entry(key).or_default().push(CampaignEntry {
            token: RewardToken {
                address: campaign.reward_token.address,
                symbol: campaign.reward_token.symbol.clone(),
                decimals: campaign.reward_token.decimals,
                price: store.token_price(chain, campaign.reward_token.address),
            },
            apr: campaign.apr,
        });
    }
    by_key
}
