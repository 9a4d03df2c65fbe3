//! Reward unification.
//!
//! Merges on-chain claimable balances with off-chain claimable balances and
//! active-campaign entries into one list per vault, reconciled per token
//! address. Campaign entries may carry a rate with no claimable balance yet;
//! claimable entries may remain after their campaign ended. Both shapes fold
//! into [`RewardEntry`].

use std::collections::HashMap;

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::chain::chain_id;
use crate::error::Result;
use crate::store::{Store, VaultEntity};
use crate::taxonomy::{classify, resolve_related, RelatedVault, VaultVariant};

/// Where a raw reward record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardProvider {
    /// Claimable balances read from staking-pool contracts.
    OnChain,
    /// Merkl campaign distributor.
    Merkl,
    /// StellaSwap offchain rewarder.
    Stellaswap,
}

impl RewardProvider {
    /// All providers, in merge order.
    pub const ALL: [RewardProvider; 3] = [
        RewardProvider::OnChain,
        RewardProvider::Merkl,
        RewardProvider::Stellaswap,
    ];
}

impl std::fmt::Display for RewardProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RewardProvider::OnChain => write!(f, "onchain"),
            RewardProvider::Merkl => write!(f, "merkl"),
            RewardProvider::Stellaswap => write!(f, "stellaswap"),
        }
    }
}

/// Token identity attached to a reward record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardToken {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

/// A claimable balance fetched from one provider, token units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimableEntry {
    pub token: RewardToken,
    pub amount: Decimal,
}

/// An ongoing reward-emitting campaign for a vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignEntry {
    pub token: RewardToken,
    /// Annualized simple rate contributed by the campaign.
    pub apr: f64,
}

/// One unified reward row for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardEntry {
    pub token: RewardToken,
    /// Claimable balance, token units, never negative.
    pub amount: Decimal,
    /// Whether an ongoing campaign emits this token.
    pub active: bool,
    /// Summed annualized rate across stacked campaigns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

/// Synthetic reward key for balances whose vault association is unknown:
/// `"<chainId>:<address>"`.
pub fn synthetic_key(chain: NamedChain, address: Address) -> String {
    format!("{}:{:#x}", chain_id(chain), address)
}

/// The reward keys a vault's unified view reads from.
///
/// Rewards recorded under a raw CLM identity belong to its wrappers: each
/// wrapper reads its own id plus the CLM's, and a CLM that has any wrapper
/// surfaces nothing under its own id.
pub fn reward_source_keys(vault: &VaultEntity) -> Vec<String> {
    let variant = classify(vault);
    if variant == VaultVariant::Cowcentrated
        && (vault.cowcentrated_ids.pool.is_some() || vault.cowcentrated_ids.vault.is_some())
    {
        return Vec::new();
    }
    let mut keys = vec![vault.id.clone()];
    if let Some(clm_id) = resolve_related(vault, RelatedVault::Underlying) {
        keys.push(clm_id.clone());
    }
    keys
}

/// Unified rewards for a vault, optionally scoped to a wallet.
///
/// Returns `Ok(None)` while nothing is known yet: a wallet was given, no
/// provider fetch for it has completed, and the vault has no campaign data.
/// An empty list is a real answer (nothing to show), distinct from `None`.
///
/// Without a wallet only campaign entries are produced, so potential yield
/// renders for disconnected users.
pub fn unify(
    store: &Store,
    vault_id: &str,
    wallet: Option<Address>,
) -> Result<Option<Vec<RewardEntry>>> {
    let vault = store.vault(vault_id)?;
    let sources = reward_source_keys(vault);

    let mut entries: Vec<RewardEntry> = Vec::new();
    let mut by_token: HashMap<Address, usize> = HashMap::new();

    // Claimable balances, summed per token across providers and source keys.
    if let Some(wallet) = wallet {
        for provider in RewardProvider::ALL {
            for key in &sources {
                for claim in store.claimable(provider, key, wallet) {
                    let amount = if claim.amount < Decimal::ZERO {
                        warn!(
                            vault = vault_id,
                            token = %claim.token.address,
                            "negative claimable amount, clamping to zero"
                        );
                        Decimal::ZERO
                    } else {
                        claim.amount
                    };
                    match by_token.get(&claim.token.address) {
                        Some(&i) => entries[i].amount += amount,
                        None => {
                            let price = claim
                                .token
                                .price
                                .or_else(|| store.token_price(vault.chain, claim.token.address));
                            by_token.insert(claim.token.address, entries.len());
                            entries.push(RewardEntry {
                                token: claim.token.clone(),
                                amount,
                                active: false,
                                apr: None,
                                price,
                            });
                        }
                    }
                }
            }
        }
    }

    // Active-campaign overlay. Campaigns stack: rates add per token.
    let mut has_campaign_data = false;
    for provider in RewardProvider::ALL {
        for key in &sources {
            let campaigns = store.campaigns(provider, key);
            if !campaigns.is_empty() {
                has_campaign_data = true;
            }
            for campaign in campaigns {
                match by_token.get(&campaign.token.address) {
                    Some(&i) => {
                        entries[i].active = true;
                        entries[i].apr = Some(entries[i].apr.unwrap_or(0.0) + campaign.apr);
                    }
                    None => {
                        let price = campaign
                            .token
                            .price
                            .or_else(|| store.token_price(vault.chain, campaign.token.address));
                        by_token.insert(campaign.token.address, entries.len());
                        entries.push(RewardEntry {
                            token: campaign.token.clone(),
                            amount: Decimal::ZERO,
                            active: true,
                            apr: Some(campaign.apr),
                            price,
                        });
                    }
                }
            }
        }
    }

    // Nothing to show: zero balance and no ongoing campaign.
    entries.retain(|e| e.active || e.amount > Decimal::ZERO);

    if let Some(wallet) = wallet {
        let any_fetch = RewardProvider::ALL
            .iter()
            .any(|p| store.has_fetched(*p, wallet));
        if !any_fetch && !has_campaign_data {
            return Ok(None);
        }
    }

    Ok(Some(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CowcentratedIds, VaultType};
    use rust_decimal_macros::dec;

    fn token(byte: u8, symbol: &str) -> RewardToken {
        RewardToken {
            address: Address::from([byte; 20]),
            symbol: symbol.to_string(),
            decimals: 18,
            price: None,
        }
    }

    fn vault(id: &str, vault_type: VaultType, ids: CowcentratedIds) -> VaultEntity {
        VaultEntity {
            id: id.to_string(),
            name: id.to_string(),
            vault_type,
            chain: NamedChain::Arbitrum,
            contract_address: Address::from([id.len() as u8; 20]),
            deposit_token_address: Address::ZERO,
            assets: vec![],
            cowcentrated_ids: ids,
            platform_id: None,
            risks: vec![],
        }
    }

    fn store_with(vaults: Vec<VaultEntity>) -> Store {
        let mut store = Store::new();
        store.replace_vaults(vaults);
        store
    }

    fn claim_map(key: &str, entries: Vec<ClaimableEntry>) -> HashMap<String, Vec<ClaimableEntry>> {
        let mut map = HashMap::new();
        map.insert(key.to_string(), entries);
        map
    }

    fn campaign_map(key: &str, entries: Vec<CampaignEntry>) -> HashMap<String, Vec<CampaignEntry>> {
        let mut map = HashMap::new();
        map.insert(key.to_string(), entries);
        map
    }

    #[test]
    fn test_campaign_overlays_claimable_entry() {
        let mut store = store_with(vec![vault("pool", VaultType::Gov, Default::default())]);
        let wallet = Address::from([9u8; 20]);
        let arb = token(2, "ARB");

        store.merge_claimable(
            RewardProvider::OnChain,
            NamedChain::Arbitrum,
            wallet,
            claim_map(
                "pool",
                vec![ClaimableEntry {
                    token: arb.clone(),
                    amount: dec!(1.5),
                }],
            ),
        );
        store.merge_campaigns(
            RewardProvider::Merkl,
            NamedChain::Arbitrum,
            campaign_map(
                "pool",
                vec![CampaignEntry {
                    token: arb.clone(),
                    apr: 0.04,
                }],
            ),
        );

        let unified = unify(&store, "pool", Some(wallet)).unwrap().unwrap();
        assert_eq!(unified.len(), 1);
        assert_eq!(unified[0].amount, dec!(1.5));
        assert!(unified[0].active);
        assert_eq!(unified[0].apr, Some(0.04));
    }

    #[test]
    fn test_campaign_without_balance_appends_zero_entry() {
        let mut store = store_with(vec![vault("pool", VaultType::Gov, Default::default())]);
        store.merge_campaigns(
            RewardProvider::Merkl,
            NamedChain::Arbitrum,
            campaign_map(
                "pool",
                vec![CampaignEntry {
                    token: token(3, "OP"),
                    apr: 0.08,
                }],
            ),
        );

        // No wallet: potential yield for disconnected users.
        let unified = unify(&store, "pool", None).unwrap().unwrap();
        assert_eq!(unified.len(), 1);
        assert_eq!(unified[0].amount, Decimal::ZERO);
        assert!(unified[0].active);
        assert_eq!(unified[0].apr, Some(0.08));
    }

    #[test]
    fn test_campaigns_stack_aprs() {
        let mut store = store_with(vec![vault("pool", VaultType::Gov, Default::default())]);
        let op = token(3, "OP");
        store.merge_campaigns(
            RewardProvider::Merkl,
            NamedChain::Arbitrum,
            campaign_map(
                "pool",
                vec![
                    CampaignEntry {
                        token: op.clone(),
                        apr: 0.05,
                    },
                    CampaignEntry {
                        token: op.clone(),
                        apr: 0.03,
                    },
                ],
            ),
        );

        let unified = unify(&store, "pool", None).unwrap().unwrap();
        assert_eq!(unified.len(), 1);
        let apr = unified[0].apr.unwrap();
        assert!((apr - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_zero_balance_without_campaign_is_dropped() {
        let mut store = store_with(vec![vault("pool", VaultType::Gov, Default::default())]);
        let wallet = Address::from([9u8; 20]);
        store.merge_claimable(
            RewardProvider::OnChain,
            NamedChain::Arbitrum,
            wallet,
            claim_map(
                "pool",
                vec![ClaimableEntry {
                    token: token(2, "ARB"),
                    amount: Decimal::ZERO,
                }],
            ),
        );

        let unified = unify(&store, "pool", Some(wallet)).unwrap().unwrap();
        assert!(unified.is_empty());
    }

    #[test]
    fn test_unify_is_idempotent() {
        let mut store = store_with(vec![vault("pool", VaultType::Gov, Default::default())]);
        let wallet = Address::from([9u8; 20]);
        let arb = token(2, "ARB");
        store.merge_claimable(
            RewardProvider::OnChain,
            NamedChain::Arbitrum,
            wallet,
            claim_map(
                "pool",
                vec![ClaimableEntry {
                    token: arb.clone(),
                    amount: dec!(2),
                }],
            ),
        );
        store.merge_campaigns(
            RewardProvider::Merkl,
            NamedChain::Arbitrum,
            campaign_map("pool", vec![CampaignEntry { token: arb, apr: 0.01 }]),
        );

        let first = unify(&store, "pool", Some(wallet)).unwrap().unwrap();
        let second = unify(&store, "pool", Some(wallet)).unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_negative_amount_clamps_to_zero() {
        let mut store = store_with(vec![vault("pool", VaultType::Gov, Default::default())]);
        let wallet = Address::from([9u8; 20]);
        let arb = token(2, "ARB");
        store.merge_claimable(
            RewardProvider::OnChain,
            NamedChain::Arbitrum,
            wallet,
            claim_map(
                "pool",
                vec![
                    ClaimableEntry {
                        token: arb.clone(),
                        amount: dec!(-3),
                    },
                    ClaimableEntry {
                        token: arb,
                        amount: dec!(1),
                    },
                ],
            ),
        );

        let unified = unify(&store, "pool", Some(wallet)).unwrap().unwrap();
        assert_eq!(unified.len(), 1);
        assert_eq!(unified[0].amount, dec!(1));
    }

    #[test]
    fn test_clm_rewards_reattributed_to_both_wrappers() {
        let clm = vault(
            "clm",
            VaultType::Cowcentrated,
            CowcentratedIds {
                pool: Some("clm-pool".to_string()),
                vault: Some("clm-vault".to_string()),
                ..Default::default()
            },
        );
        let pool = vault(
            "clm-pool",
            VaultType::Gov,
            CowcentratedIds {
                clm: Some("clm".to_string()),
                vault: Some("clm".to_string()),
                ..Default::default()
            },
        );
        let wrapper = vault(
            "clm-vault",
            VaultType::Standard,
            CowcentratedIds {
                clm: Some("clm".to_string()),
                ..Default::default()
            },
        );
        let mut store = store_with(vec![clm, pool, wrapper]);

        let wallet = Address::from([9u8; 20]);
        store.merge_claimable(
            RewardProvider::Merkl,
            NamedChain::Arbitrum,
            wallet,
            claim_map(
                "clm",
                vec![ClaimableEntry {
                    token: token(2, "ARB"),
                    amount: dec!(4),
                }],
            ),
        );

        // Merged into both wrappers (summed per token, not split).
        let on_pool = unify(&store, "clm-pool", Some(wallet)).unwrap().unwrap();
        assert_eq!(on_pool.len(), 1);
        assert_eq!(on_pool[0].amount, dec!(4));

        let on_vault = unify(&store, "clm-vault", Some(wallet)).unwrap().unwrap();
        assert_eq!(on_vault.len(), 1);
        assert_eq!(on_vault[0].amount, dec!(4));

        // The CLM itself surfaces nothing once wrappers exist.
        let on_clm = unify(&store, "clm", Some(wallet)).unwrap().unwrap();
        assert!(on_clm.is_empty());
    }

    #[test]
    fn test_unfetched_wallet_is_none_not_empty() {
        let mut store = store_with(vec![vault("pool", VaultType::Gov, Default::default())]);
        let wallet = Address::from([9u8; 20]);

        assert_eq!(unify(&store, "pool", Some(wallet)).unwrap(), None);

        // An empty but completed fetch is a real (empty) answer.
        store.merge_claimable(RewardProvider::Merkl, NamedChain::Arbitrum, wallet, HashMap::new());
        assert_eq!(
            unify(&store, "pool", Some(wallet)).unwrap(),
            Some(Vec::new())
        );
    }

    #[test]
    fn test_synthetic_key_format() {
        let key = synthetic_key(NamedChain::Optimism, Address::from([0xaau8; 20]));
        assert_eq!(key, "10:0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
    }
}
