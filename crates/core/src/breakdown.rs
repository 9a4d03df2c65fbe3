//! Balance breakdown: decompose a pool/vault-share balance into constituent
//! asset amounts and USD values.
//!
//! Three granularities per asset: the amount backing one pool-token, the
//! whole pool, and the user's share. Pools that wrap other pools decompose
//! one level deeper into an `underlying` list alongside (never replacing)
//! the immediate composition.

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::Store;

/// One constituent asset of a pool, with its on-chain reserve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolAsset {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    /// Reserve backing the whole pool, token units.
    pub reserve: Decimal,
    /// Set when this asset is itself a pool token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying: Option<PoolComposition>,
}

/// A pool's constituent assets and total pool-token supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolComposition {
    pub total_supply: Decimal,
    pub assets: Vec<PoolAsset>,
}

/// Granularity of a breakdown figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakdownMode {
    /// Backing one pool-token.
    One,
    /// The whole pool.
    Total,
    /// The user's share.
    User,
}

/// An amount and its USD value at one granularity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Figures {
    pub amount: Decimal,
    pub value: Decimal,
}

/// Calculated decomposition of one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedAsset {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    pub one: Figures,
    pub total: Figures,
    pub user: Figures,
    /// Share of the pool's total value, for charting. Zero when the pool
    /// value sums to zero, never NaN.
    pub percent: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub underlying: Vec<CalculatedAsset>,
}

impl CalculatedAsset {
    pub fn figures(&self, mode: BreakdownMode) -> Figures {
        match mode {
            BreakdownMode::One => self.one,
            BreakdownMode::Total => self.total,
            BreakdownMode::User => self.user,
        }
    }
}

/// A vault's calculated breakdown across all granularities.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedBreakdown {
    pub total_supply: Decimal,
    /// The user's pool-token balance.
    pub user_balance: Decimal,
    /// user_balance / total_supply, zero when the supply is zero.
    pub share_fraction: Decimal,
    pub one_value: Decimal,
    pub total_value: Decimal,
    pub user_value: Decimal,
    pub assets: Vec<CalculatedAsset>,
}

/// Decompose a vault's pool composition for a wallet.
///
/// `Ok(None)` when no composition has been fetched for the vault.
pub fn breakdown(
    store: &Store,
    vault_id: &str,
    wallet: Address,
) -> Result<Option<CalculatedBreakdown>> {
    let vault = store.vault(vault_id)?;
    let Some(composition) = store.composition(vault_id) else {
        return Ok(None);
    };
    let user_balance = store.deposit_balance(vault_id, wallet);

    let assets = calculate_assets(
        store,
        vault.chain,
        composition,
        Decimal::ONE,
        composition.total_supply,
        user_balance,
    );

    let sum_values =
        |mode: BreakdownMode| -> Decimal { assets.iter().map(|a| a.figures(mode).value).sum() };
    let share_fraction = if composition.total_supply.is_zero() {
        Decimal::ZERO
    } else {
        user_balance / composition.total_supply
    };

    Ok(Some(CalculatedBreakdown {
        total_supply: composition.total_supply,
        user_balance,
        share_fraction,
        one_value: sum_values(BreakdownMode::One),
        total_value: sum_values(BreakdownMode::Total),
        user_value: sum_values(BreakdownMode::User),
        assets,
    }))
}

/// Decompose one composition level.
///
/// `held_*` are the pool-token amounts held at each granularity: one parent
/// token, the whole pool, the user's balance. For a nested pool the parent
/// asset's amounts become the held amounts one level down.
fn calculate_assets(
    store: &Store,
    chain: NamedChain,
    composition: &PoolComposition,
    held_one: Decimal,
    held_total: Decimal,
    held_user: Decimal,
) -> Vec<CalculatedAsset> {
    let pro_rata = |reserve: Decimal, held: Decimal| {
        if composition.total_supply.is_zero() {
            Decimal::ZERO
        } else {
            reserve * held / composition.total_supply
        }
    };

    let mut assets: Vec<CalculatedAsset> = composition
        .assets
        .iter()
        .map(|asset| {
            let price = store.token_price(chain, asset.address);
            let one_amount = pro_rata(asset.reserve, held_one);
            let total_amount = pro_rata(asset.reserve, held_total);
            let user_amount = pro_rata(asset.reserve, held_user);
            let value =
                |amount: Decimal| price.map_or(Decimal::ZERO, |p| amount * p);

            let underlying = asset.underlying.as_ref().map_or_else(Vec::new, |sub| {
                calculate_assets(store, chain, sub, one_amount, total_amount, user_amount)
            });

            CalculatedAsset {
                address: asset.address,
                symbol: asset.symbol.clone(),
                decimals: asset.decimals,
                price,
                one: Figures {
                    amount: one_amount,
                    value: value(one_amount),
                },
                total: Figures {
                    amount: total_amount,
                    value: value(total_amount),
                },
                user: Figures {
                    amount: user_amount,
                    value: value(user_amount),
                },
                percent: 0.0,
                underlying,
            }
        })
        .collect();

    let total_value: Decimal = assets.iter().map(|a| a.total.value).sum();
    for asset in &mut assets {
        asset.percent = if total_value.is_zero() {
            0.0
        } else {
            (asset.total.value / total_value).to_f64().unwrap_or(0.0)
        };
    }
    assets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CowcentratedIds, TokenEntity, VaultEntity, VaultType};
    use rust_decimal_macros::dec;

    fn fixture_store() -> (Store, Address) {
        let mut store = Store::new();
        store.replace_vaults(vec![VaultEntity {
            id: "lp-vault".to_string(),
            name: "LP Vault".to_string(),
            vault_type: VaultType::Standard,
            chain: NamedChain::Arbitrum,
            contract_address: Address::from([1u8; 20]),
            deposit_token_address: Address::from([2u8; 20]),
            assets: vec!["WETH".to_string(), "USDC".to_string()],
            cowcentrated_ids: CowcentratedIds::default(),
            platform_id: None,
            risks: vec![],
        }]);
        store.replace_tokens(vec![
            TokenEntity {
                chain: NamedChain::Arbitrum,
                address: Address::from([0xeeu8; 20]),
                symbol: "WETH".to_string(),
                decimals: 18,
                price: Some(dec!(2)),
            },
            TokenEntity {
                chain: NamedChain::Arbitrum,
                address: Address::from([0xccu8; 20]),
                symbol: "USDC".to_string(),
                decimals: 6,
                price: Some(dec!(1)),
            },
        ]);
        store.set_composition(
            "lp-vault".to_string(),
            PoolComposition {
                total_supply: dec!(1000),
                assets: vec![
                    PoolAsset {
                        address: Address::from([0xeeu8; 20]),
                        symbol: "WETH".to_string(),
                        decimals: 18,
                        reserve: dec!(100),
                        underlying: None,
                    },
                    PoolAsset {
                        address: Address::from([0xccu8; 20]),
                        symbol: "USDC".to_string(),
                        decimals: 6,
                        reserve: dec!(200),
                        underlying: None,
                    },
                ],
            },
        );
        let wallet = Address::from([9u8; 20]);
        store.set_deposit_balance("lp-vault".to_string(), wallet, dec!(250));
        (store, wallet)
    }

    #[test]
    fn test_user_amounts_are_pro_rata() {
        let (store, wallet) = fixture_store();
        let result = breakdown(&store, "lp-vault", wallet).unwrap().unwrap();

        assert_eq!(result.assets[0].user.amount, dec!(25));
        assert_eq!(result.assets[1].user.amount, dec!(50));
        assert_eq!(result.assets[0].total.amount, dec!(100));
        assert_eq!(result.assets[0].one.amount, dec!(0.1));
    }

    #[test]
    fn test_user_value_conserves_share_of_pool() {
        let (store, wallet) = fixture_store();
        let result = breakdown(&store, "lp-vault", wallet).unwrap().unwrap();

        let share = result.share_fraction.to_f64().unwrap();
        let user = result.user_value.to_f64().unwrap();
        let pool = result.total_value.to_f64().unwrap();
        assert!((user - share * pool).abs() / pool.max(1.0) < 1e-9);
        // 250/1000 * (100*2 + 200*1) = 100
        assert_eq!(result.user_value, dec!(100));
    }

    #[test]
    fn test_percent_shares_sum_to_one() {
        let (store, wallet) = fixture_store();
        let result = breakdown(&store, "lp-vault", wallet).unwrap().unwrap();

        let sum: f64 = result.assets.iter().map(|a| a.percent).sum();
        assert!((sum - 1.0).abs() < 1e-12);
        // WETH: 200 of 400 total value
        assert!((result.assets[0].percent - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_supply_yields_zero_not_nan() {
        let (mut store, wallet) = fixture_store();
        store.set_composition(
            "lp-vault".to_string(),
            PoolComposition {
                total_supply: Decimal::ZERO,
                assets: vec![PoolAsset {
                    address: Address::from([0xeeu8; 20]),
                    symbol: "WETH".to_string(),
                    decimals: 18,
                    reserve: Decimal::ZERO,
                    underlying: None,
                }],
            },
        );

        let result = breakdown(&store, "lp-vault", wallet).unwrap().unwrap();
        assert_eq!(result.share_fraction, Decimal::ZERO);
        assert_eq!(result.assets[0].one.amount, Decimal::ZERO);
        assert_eq!(result.assets[0].percent, 0.0);
    }

    #[test]
    fn test_missing_composition_is_none() {
        let (store, wallet) = fixture_store();
        let mut store = store;
        store.replace_vaults(vec![VaultEntity {
            id: "bare".to_string(),
            name: "Bare".to_string(),
            vault_type: VaultType::Standard,
            chain: NamedChain::Arbitrum,
            contract_address: Address::from([5u8; 20]),
            deposit_token_address: Address::from([6u8; 20]),
            assets: vec![],
            cowcentrated_ids: CowcentratedIds::default(),
            platform_id: None,
            risks: vec![],
        }]);
        assert_eq!(breakdown(&store, "bare", wallet).unwrap(), None);
    }

    #[test]
    fn test_nested_pool_decomposes_alongside_immediate() {
        let (mut store, wallet) = fixture_store();
        // the LP's second asset is itself a pool token: 200 units of a child
        // pool with supply 400 backing 800 WETH
        store.set_composition(
            "lp-vault".to_string(),
            PoolComposition {
                total_supply: dec!(1000),
                assets: vec![PoolAsset {
                    address: Address::from([0xabu8; 20]),
                    symbol: "childLP".to_string(),
                    decimals: 18,
                    reserve: dec!(200),
                    underlying: Some(PoolComposition {
                        total_supply: dec!(400),
                        assets: vec![PoolAsset {
                            address: Address::from([0xeeu8; 20]),
                            symbol: "WETH".to_string(),
                            decimals: 18,
                            reserve: dec!(800),
                            underlying: None,
                        }],
                    }),
                }],
            },
        );

        let result = breakdown(&store, "lp-vault", wallet).unwrap().unwrap();
        // immediate composition kept
        assert_eq!(result.assets[0].symbol, "childLP");
        assert_eq!(result.assets[0].user.amount, dec!(50));
        // nested level: user holds 50 childLP of 400 supply -> 100 WETH
        let nested = &result.assets[0].underlying;
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].user.amount, dec!(100));
        assert_eq!(nested[0].total.amount, dec!(400));
    }
}
