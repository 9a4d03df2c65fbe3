//! Vault taxonomy: variant classification and cross-link resolution.

use tracing::warn;

use crate::store::{Store, VaultEntity, VaultId, VaultType};

/// Resolved vault variant.
///
/// Refines the stored discriminant: a `gov` vault whose `cowcentrated_ids`
/// references a CLM is the staking pool *for* that CLM, not a generic
/// staking pool, and diverges in rewards and labelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VaultVariant {
    Standard,
    Gov,
    Cowcentrated,
    CowcentratedPool,
    Erc4626,
}

impl VaultVariant {
    /// Stable key used to build display label chains.
    pub fn key(self) -> &'static str {
        match self {
            VaultVariant::Standard => "Vault",
            VaultVariant::Gov => "Gov",
            VaultVariant::Cowcentrated => "Cowcentrated",
            VaultVariant::CowcentratedPool => "CowcentratedPool",
            VaultVariant::Erc4626 => "Erc4626",
        }
    }
}

/// Classify a vault record into its variant.
pub fn classify(vault: &VaultEntity) -> VaultVariant {
    match vault.vault_type {
        VaultType::Standard => VaultVariant::Standard,
        VaultType::Cowcentrated => VaultVariant::Cowcentrated,
        VaultType::Erc4626 => VaultVariant::Erc4626,
        VaultType::Gov => {
            if vault.cowcentrated_ids.is_empty() {
                VaultVariant::Gov
            } else {
                VaultVariant::CowcentratedPool
            }
        }
    }
}

/// The kinds of cross-linked vaults reachable from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelatedVault {
    /// The base concentrated-liquidity vault a wrapper sits on.
    Underlying,
    /// The reward-pool wrapper of a CLM.
    Pool,
    /// The compounding-vault wrapper of a CLM.
    Vault,
}

/// Resolve a cross-linked vault id.
///
/// An absent relation is `None` and means "no such relation", never an
/// error; callers probe speculatively.
pub fn resolve_related(vault: &VaultEntity, kind: RelatedVault) -> Option<&VaultId> {
    match kind {
        RelatedVault::Underlying => vault.cowcentrated_ids.clm.as_ref(),
        RelatedVault::Pool => vault.cowcentrated_ids.pool.as_ref(),
        RelatedVault::Vault => vault.cowcentrated_ids.vault.as_ref(),
    }
}

/// Validate the pool/vault cross-link symmetry invariant over the store.
///
/// For every vault `A` with `cowcentrated_ids.pool == Some(B)`, `B` must
/// point back with `cowcentrated_ids.vault == Some(A)`. Violations are
/// data-integrity warnings, not errors: each asymmetric pair is logged and
/// returned, and processing continues with the records as merged.
pub fn check_symmetry(store: &Store) -> Vec<(VaultId, VaultId)> {
    let mut asymmetric = Vec::new();
    let mut vaults: Vec<&VaultEntity> = store.vaults().collect();
    vaults.sort_by(|a, b| a.id.cmp(&b.id));

    for vault in vaults {
        let Some(pool_id) = resolve_related(vault, RelatedVault::Pool) else {
            continue;
        };
        let Some(pool) = store.try_vault(pool_id) else {
            warn!(vault = %vault.id, related = %pool_id, "cross-link to unknown vault");
            asymmetric.push((vault.id.clone(), pool_id.clone()));
            continue;
        };
        if resolve_related(pool, RelatedVault::Vault).map(String::as_str)
            != Some(vault.id.as_str())
        {
            warn!(
                vault = %vault.id,
                related = %pool.id,
                "asymmetric cowcentrated cross-link"
            );
            asymmetric.push((vault.id.clone(), pool.id.clone()));
        }
    }
    asymmetric
}
