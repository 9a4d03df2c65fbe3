//! Memoized facade over the derivation functions.
//!
//! Derived aggregates are recomputed on read and cached per store version;
//! a store merge invalidates everything automatically.

use std::sync::Arc;

use alloy_primitives::Address;

use crate::breakdown::{self, CalculatedBreakdown};
use crate::displaced::{self, BreakdownEntry};
use crate::error::Result;
use crate::memo::MemoCache;
use crate::rewards::{self, RewardEntry};
use crate::store::Store;

/// Per-function memoization caches behind typed accessors.
#[derive(Default)]
pub struct DerivedCache {
    rewards: MemoCache<(String, Option<Address>), Option<Vec<RewardEntry>>>,
    breakdowns: MemoCache<(String, Address), Option<CalculatedBreakdown>>,
    displaced: MemoCache<(String, Address), Vec<BreakdownEntry>>,
    full_breakdowns: MemoCache<(String, Address), Vec<BreakdownEntry>>,
}

impl DerivedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized [`rewards::unify`].
    pub fn unified_rewards(
        &self,
        store: &Store,
        vault_id: &str,
        wallet: Option<Address>,
    ) -> Result<Arc<Option<Vec<RewardEntry>>>> {
        // Lookup errors surface uncached; past this point the derivation
        // cannot fail for the same store version.
        store.vault(vault_id)?;
        Ok(self.rewards.get_or_compute(
            store.version(),
            (vault_id.to_string(), wallet),
            || rewards::unify(store, vault_id, wallet).unwrap_or_default(),
        ))
    }

    /// Memoized [`breakdown::breakdown`].
    pub fn asset_breakdown(
        &self,
        store: &Store,
        vault_id: &str,
        wallet: Address,
    ) -> Result<Arc<Option<CalculatedBreakdown>>> {
        store.vault(vault_id)?;
        Ok(self.breakdowns.get_or_compute(
            store.version(),
            (vault_id.to_string(), wallet),
            || breakdown::breakdown(store, vault_id, wallet).unwrap_or_default(),
        ))
    }

    /// Memoized [`displaced::displaced`].
    pub fn displaced_balances(
        &self,
        store: &Store,
        vault_id: &str,
        wallet: Address,
    ) -> Result<Arc<Vec<BreakdownEntry>>> {
        store.vault(vault_id)?;
        Ok(self.displaced.get_or_compute(
            store.version(),
            (vault_id.to_string(), wallet),
            || displaced::displaced(store, vault_id, wallet).unwrap_or_default(),
        ))
    }

    /// Memoized [`displaced::full_breakdown`].
    pub fn full_balance_breakdown(
        &self,
        store: &Store,
        vault_id: &str,
        wallet: Address,
    ) -> Result<Arc<Vec<BreakdownEntry>>> {
        store.vault(vault_id)?;
        Ok(self.full_breakdowns.get_or_compute(
            store.version(),
            (vault_id.to_string(), wallet),
            || displaced::full_breakdown(store, vault_id, wallet).unwrap_or_default(),
        ))
    }
}
