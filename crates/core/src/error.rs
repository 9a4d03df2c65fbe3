//! Error types for store lookups.

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use thiserror::Error;

/// Errors raised by direct-access store lookups.
///
/// Callers that want an optional result should use the `try_`-prefixed
/// accessor variants instead of matching on these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Vault id not present in the store.
    #[error("Vault not found: {0}")]
    VaultNotFound(String),

    /// Token not present in the store's (chain, address) index.
    #[error("Token not found: {address} on chain {chain}")]
    TokenNotFound { chain: NamedChain, address: Address },

    /// Boost id not present in the store.
    #[error("Boost not found: {0}")]
    BoostNotFound(String),

    /// Platform id not present in the store.
    #[error("Platform not found: {0}")]
    PlatformNotFound(String),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
