//! Chain helpers.
//!
//! Chains are `alloy_chains::NamedChain` throughout; snapshots and provider
//! payloads carry numeric chain ids, so this module provides the id
//! conversion and a serde adapter.

use alloy_chains::NamedChain;

/// Try to create a NamedChain from a numeric chain id.
pub fn chain_from_id(id: u64) -> Option<NamedChain> {
    NamedChain::try_from(id).ok()
}

/// Numeric chain id for a NamedChain.
pub fn chain_id(chain: NamedChain) -> u64 {
    chain.into()
}

/// Serde helper module for serializing/deserializing NamedChain as a u64
/// chain id.
///
/// # Example
///
/// ```ignore
/// use alloy_chains::NamedChain;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct VaultEntity {
///     #[serde(with = "chain_serde")]
///     chain: NamedChain,
/// }
/// ```
pub mod chain_serde {
    use alloy_chains::NamedChain;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(chain: &NamedChain, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let id: u64 = (*chain).into();
        serializer.serialize_u64(id)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NamedChain, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = u64::deserialize(deserializer)?;
        NamedChain::try_from(id)
            .map_err(|_| serde::de::Error::custom(format!("Unknown chain ID: {}", id)))
    }
}
