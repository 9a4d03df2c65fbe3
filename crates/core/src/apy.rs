//! Yield composition: display components and label fallback chains.
//!
//! A vault's yield is a composition of named rate contributors. Display
//! order comes from a static priority table, never from insertion or map
//! iteration order, so the same components always render in the same
//! sequence regardless of which subset is present.

use serde::{Deserialize, Serialize};

use crate::taxonomy::VaultVariant;

/// Named rate contributors, in display priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum YieldComponent {
    /// Base compounding vault yield.
    Vault,
    /// CLM fee yield.
    Clm,
    /// External reward-pool emissions.
    RewardPool,
    /// Trading-fee yield.
    Trading,
    /// Merkl campaign emissions.
    Merkl,
    /// StellaSwap campaign emissions.
    Stellaswap,
    /// Liquid-staking base yield.
    LiquidStaking,
    /// Composable-pool base yield.
    ComposablePool,
    /// Boost emissions.
    Boost,
}

/// The global display order for yield components.
pub const COMPONENT_ORDER: &[YieldComponent] = &[
    YieldComponent::Vault,
    YieldComponent::Clm,
    YieldComponent::RewardPool,
    YieldComponent::Trading,
    YieldComponent::Merkl,
    YieldComponent::Stellaswap,
    YieldComponent::LiquidStaking,
    YieldComponent::ComposablePool,
    YieldComponent::Boost,
];

impl YieldComponent {
    pub fn key(self) -> &'static str {
        match self {
            YieldComponent::Vault => "vault",
            YieldComponent::Clm => "clm",
            YieldComponent::RewardPool => "rewardPool",
            YieldComponent::Trading => "trading",
            YieldComponent::Merkl => "merkl",
            YieldComponent::Stellaswap => "stellaswap",
            YieldComponent::LiquidStaking => "liquidStaking",
            YieldComponent::ComposablePool => "composablePool",
            YieldComponent::Boost => "boost",
        }
    }
}

/// Whether a vault's reported total compounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalType {
    /// Simple annualized rate.
    Apr,
    /// Compounding annualized yield.
    Apy,
}

/// Raw per-component annualized rates for one vault, as fetched.
///
/// All rates are yearly fractions (0.05 = 5%). Components a vault does not
/// have are `None`, not zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawApyBreakdown {
    pub total: f64,
    pub total_type: TotalType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_pool: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trading: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merkl: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stellaswap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquid_staking: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composable_pool: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f64>,
}

impl RawApyBreakdown {
    pub fn component(&self, component: YieldComponent) -> Option<f64> {
        match component {
            YieldComponent::Vault => self.vault,
            YieldComponent::Clm => self.clm,
            YieldComponent::RewardPool => self.reward_pool,
            YieldComponent::Trading => self.trading,
            YieldComponent::Merkl => self.merkl,
            YieldComponent::Stellaswap => self.stellaswap,
            YieldComponent::LiquidStaking => self.liquid_staking,
            YieldComponent::ComposablePool => self.composable_pool,
            YieldComponent::Boost => self.boost,
        }
    }
}

/// Display period for rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayPeriod {
    Daily,
    Yearly,
}

/// One component of a vault's displayed yield.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentRate {
    pub component: YieldComponent,
    pub rate: f64,
}

/// The present components of a breakdown, in global display order, at the
/// requested period. Daily rates are the simple yearly rate divided by 365;
/// component rates are simple contributions even when the total compounds.
pub fn components(raw: &RawApyBreakdown, period: DisplayPeriod) -> Vec<ComponentRate> {
    COMPONENT_ORDER
        .iter()
        .filter_map(|&component| {
            let yearly = raw.component(component)?;
            let rate = match period {
                DisplayPeriod::Yearly => yearly,
                DisplayPeriod::Daily => yearly / 365.0,
            };
            Some(ComponentRate { component, rate })
        })
        .collect()
}

/// The breakdown total at the requested period.
///
/// A compounding total converts to its daily-equivalent rate; a simple total
/// divides linearly.
pub fn total_for_period(raw: &RawApyBreakdown, period: DisplayPeriod) -> f64 {
    match period {
        DisplayPeriod::Yearly => raw.total,
        DisplayPeriod::Daily => match raw.total_type {
            TotalType::Apr => raw.total / 365.0,
            TotalType::Apy => (1.0 + raw.total).powf(1.0 / 365.0) - 1.0,
        },
    }
}

/// Ordered label-key fallback chains for a vault's yield totals.
///
/// Each chain runs most-specific to generic; the presentation layer picks
/// the first key that resolves to a translated string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApyLabels {
    pub yearly: Vec<String>,
    pub daily: Vec<String>,
    pub boosted_yearly: Vec<String>,
    pub boosted_daily: Vec<String>,
}

/// Build the label fallback chains for a variant and total type.
///
/// A cowcentrated reward pool that reports a compounding total selects the
/// `CowcentratedCompounds` pseudo-variant: the numbers are unchanged, only
/// the label chain differs.
pub fn apy_labels(variant: VaultVariant, total_type: TotalType) -> ApyLabels {
    let variant_key = match (variant, total_type) {
        (VaultVariant::CowcentratedPool, TotalType::Apy) => "CowcentratedCompounds",
        _ => variant.key(),
    };
    let yearly_key = match total_type {
        TotalType::Apr => "Apr",
        TotalType::Apy => "Apy",
    };

    let yearly = vec![
        format!("{variant_key}-{yearly_key}"),
        yearly_key.to_string(),
    ];
    let daily = vec![format!("{variant_key}-Daily"), "Daily".to_string()];
    let boosted_yearly = prepend_boosted(&yearly, variant_key, yearly_key);
    let boosted_daily = prepend_boosted(&daily, variant_key, "Daily");

    ApyLabels {
        yearly,
        daily,
        boosted_yearly,
        boosted_daily,
    }
}

fn prepend_boosted(base: &[String], variant_key: &str, period_key: &str) -> Vec<String> {
    let mut chain = vec![
        format!("{variant_key}-Boost-{period_key}"),
        format!("Boost-{period_key}"),
    ];
    chain.extend(base.iter().cloned());
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(total: f64, total_type: TotalType) -> RawApyBreakdown {
        RawApyBreakdown {
            total,
            total_type,
            vault: None,
            clm: None,
            reward_pool: None,
            trading: None,
            merkl: None,
            stellaswap: None,
            liquid_staking: None,
            composable_pool: None,
            boost: None,
        }
    }

    #[test]
    fn test_components_follow_priority_order() {
        let mut breakdown = raw(0.10, TotalType::Apy);
        // populate out of display order
        breakdown.boost = Some(0.01);
        breakdown.trading = Some(0.02);
        breakdown.clm = Some(0.07);

        let list = components(&breakdown, DisplayPeriod::Yearly);
        let order: Vec<YieldComponent> = list.iter().map(|c| c.component).collect();
        assert_eq!(
            order,
            vec![
                YieldComponent::Clm,
                YieldComponent::Trading,
                YieldComponent::Boost
            ]
        );
    }

    #[test]
    fn test_components_daily_is_simple_division() {
        let mut breakdown = raw(0.365, TotalType::Apr);
        breakdown.trading = Some(0.365);
        let list = components(&breakdown, DisplayPeriod::Daily);
        assert_eq!(list.len(), 1);
        assert!((list[0].rate - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_total_daily_compounds_for_apy() {
        let breakdown = raw(0.10, TotalType::Apy);
        let daily = total_for_period(&breakdown, DisplayPeriod::Daily);
        // (1.1)^(1/365) - 1
        assert!((daily - 0.000_261_157_8).abs() < 1e-9);

        let simple = raw(0.10, TotalType::Apr);
        assert!((total_for_period(&simple, DisplayPeriod::Daily) - 0.10 / 365.0).abs() < 1e-15);
    }

    #[test]
    fn test_gov_apr_labels_are_deterministic() {
        let first = apy_labels(VaultVariant::Gov, TotalType::Apr);
        let second = apy_labels(VaultVariant::Gov, TotalType::Apr);
        assert_eq!(first, second);
        assert_eq!(first.yearly, vec!["Gov-Apr".to_string(), "Apr".to_string()]);
        assert_eq!(
            first.boosted_yearly,
            vec![
                "Gov-Boost-Apr".to_string(),
                "Boost-Apr".to_string(),
                "Gov-Apr".to_string(),
                "Apr".to_string()
            ]
        );
    }

    #[test]
    fn test_cowcentrated_pool_apy_selects_compounds_pseudo_variant() {
        let labels = apy_labels(VaultVariant::CowcentratedPool, TotalType::Apy);
        assert_eq!(
            labels.yearly,
            vec![
                "CowcentratedCompounds-Apy".to_string(),
                "Apy".to_string()
            ]
        );

        // The simple-rate total keeps the plain variant chain.
        let simple = apy_labels(VaultVariant::CowcentratedPool, TotalType::Apr);
        assert_eq!(
            simple.yearly,
            vec!["CowcentratedPool-Apr".to_string(), "Apr".to_string()]
        );
    }
}
