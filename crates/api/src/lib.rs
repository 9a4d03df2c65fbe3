//! Yieldlens reward provider adapters.
//!
//! Async clients for the reward data sources consumed by the derivation
//! layer, plus the recency-gated dispatcher that merges their responses into
//! the entity store:
//!
//! - [`merkl`]: Merkl campaign distributor (claimable balances + active
//!   campaigns)
//! - [`stellaswap`]: StellaSwap offchain rewarder (claimable balances)
//! - [`onchain`]: staking-pool contract reads behind the
//!   [`ClaimableSource`] trait
//! - [`gate`]: timestamp-comparison refetch gating (freshness window +
//!   provider-global cool-down)
//! - [`dispatch`]: gate-check, fetch, attribute, merge
//!
//! # Example
//!
//! ```rust,ignore
//! use yieldlens_api::{ClientConfig, RewardDispatcher};
//!
//! let dispatcher = RewardDispatcher::new(&ClientConfig::new())?;
//! let refreshed = dispatcher.refresh_merkl(&mut store, chain, wallet).await?;
//! if !refreshed {
//!     // suppressed by the recency gate; data is fresh enough
//! }
//! ```
//!
//! # Error handling
//!
//! All errors are unified through [`ApiError`]. Use
//! [`ApiError::error_category()`] for high-level classification and
//! [`ApiError::is_retryable()`] to determine retry eligibility; the recency
//! gate owns retry cadence.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod gate;
pub mod merkl;
pub mod onchain;
pub mod scalars;
pub mod stellaswap;

// Re-export main types at crate root
pub use config::{
    ClientConfig, DEFAULT_FRESHNESS_WINDOW, DEFAULT_GLOBAL_COOLDOWN, DEFAULT_MERKL_API_URL,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_STELLASWAP_API_URL,
};
pub use dispatch::RewardDispatcher;
pub use error::{ApiError, ErrorCategory, Result};
pub use gate::RecencyGate;
pub use merkl::{MerklCampaign, MerklClient, MerklUserRewards, EXCLUDED_REWARD_SYMBOLS};
pub use onchain::{ClaimableReward, ClaimableSource};
pub use scalars::{parse_address, parse_units};
pub use stellaswap::{StellaRewardsResponse, StellaswapClient};
