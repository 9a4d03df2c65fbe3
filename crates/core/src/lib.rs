//! Yieldlens derived-state computation layer.
//!
//! Transforms a normalized store of vault/chain/token entities and raw
//! provider responses into unified, display-ready aggregates:
//!
//! - **Yield composition**: ordered rate components and label fallback
//!   chains per vault variant ([`apy`])
//! - **Reward unification**: on-chain claimable balances merged with
//!   off-chain campaign entries per token ([`rewards`])
//! - **Balance breakdown**: pro-rata decomposition of pool-share balances
//!   into constituent assets at three granularities ([`breakdown`])
//! - **Displaced balances**: one location list per vault covering boost
//!   stakes, bridged balances and withdrawal queues ([`displaced`])
//!
//! All derivations are synchronous pure functions over an already-fetched
//! [`store::Store`]; [`derived::DerivedCache`] memoizes them per store
//! version.
//!
//! # Example
//!
//! ```rust,ignore
//! use yieldlens_core::{DerivedCache, Snapshot};
//!
//! let store = Snapshot::from_json_str(&json)?.into_store();
//! let cache = DerivedCache::new();
//!
//! let rewards = cache.unified_rewards(&store, "weth-usdc", Some(wallet))?;
//! for entry in rewards.iter().flatten() {
//!     println!("{}: {} claimable", entry.token.symbol, entry.amount);
//! }
//! ```

pub mod apy;
pub mod breakdown;
pub mod chain;
pub mod derived;
pub mod displaced;
pub mod error;
pub mod memo;
pub mod promos;
pub mod rewards;
pub mod snapshot;
pub mod store;
pub mod taxonomy;

// Re-export commonly used types
pub use apy::{
    apy_labels, components, total_for_period, ApyLabels, ComponentRate, DisplayPeriod,
    RawApyBreakdown, TotalType, YieldComponent, COMPONENT_ORDER,
};
pub use breakdown::{
    breakdown, BreakdownMode, CalculatedAsset, CalculatedBreakdown, Figures, PoolAsset,
    PoolComposition,
};
pub use chain::{chain_from_id, chain_id, chain_serde};
pub use derived::DerivedCache;
pub use displaced::{displaced, full_breakdown, BreakdownEntry};
pub use error::{Result, StoreError};
pub use memo::MemoCache;
pub use promos::{AddressBook, PromoKind, PromoRecord};
pub use rewards::{
    reward_source_keys, synthetic_key, unify, CampaignEntry, ClaimableEntry, RewardEntry,
    RewardProvider, RewardToken,
};
pub use snapshot::Snapshot;
pub use store::{
    BoostEntity, BoostId, CowcentratedIds, PlatformEntity, Store, TokenEntity, VaultEntity,
    VaultId, VaultType, WithdrawalRequest,
};
pub use taxonomy::{check_symmetry, classify, resolve_related, RelatedVault, VaultVariant};
