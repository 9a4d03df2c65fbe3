//! Per-chain address-book of promo/partner/pinned records.
//!
//! Consumed configuration: resolves display metadata for known addresses.
//! Never drives derivation logic.

use std::collections::HashMap;

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use serde::Deserialize;

use crate::chain::chain_from_id;

/// Kind of address-book record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromoKind {
    Pinned,
    Partner,
    Promo,
}

/// One display-metadata record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoRecord {
    pub address: Address,
    pub kind: PromoKind,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Address book mapping chain id to promo records.
///
/// Source JSON shape: `{ "<chainId>": [ { "address": ..., "kind": ... } ] }`.
#[derive(Debug, Default)]
pub struct AddressBook {
    chains: HashMap<NamedChain, Vec<PromoRecord>>,
}

impl AddressBook {
    /// Parse an address book from its JSON representation. Entries for
    /// unknown chain ids are skipped.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, Vec<PromoRecord>> = serde_json::from_str(json)?;
        let mut chains = HashMap::new();
        for (key, records) in raw {
            let Some(chain) = key.parse::<u64>().ok().and_then(chain_from_id) else {
                continue;
            };
            chains.insert(chain, records);
        }
        Ok(Self { chains })
    }

    pub fn records_for_chain(&self, chain: NamedChain) -> &[PromoRecord] {
        self.chains.get(&chain).map_or(&[], Vec::as_slice)
    }

    pub fn lookup(&self, chain: NamedChain, address: Address) -> Option<&PromoRecord> {
        self.records_for_chain(chain)
            .iter()
            .find(|r| r.address == address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "10": [
            {
                "address": "0x4200000000000000000000000000000000000042",
                "kind": "partner",
                "title": "OP incentives",
                "url": "https://example.org/op"
            }
        ],
        "999999999999": [
            { "address": "0x4200000000000000000000000000000000000042", "kind": "promo", "title": "ignored" }
        ]
    }"#;

    #[test]
    fn test_lookup_by_chain_and_address() {
        let book = AddressBook::from_json_str(FIXTURE).unwrap();
        let address: Address = "0x4200000000000000000000000000000000000042"
            .parse()
            .unwrap();

        let record = book.lookup(NamedChain::Optimism, address).unwrap();
        assert_eq!(record.kind, PromoKind::Partner);
        assert_eq!(record.title, "OP incentives");

        assert!(book.lookup(NamedChain::Base, address).is_none());
    }

    #[test]
    fn test_unknown_chain_ids_are_skipped() {
        let book = AddressBook::from_json_str(FIXTURE).unwrap();
        assert_eq!(book.records_for_chain(NamedChain::Optimism).len(), 1);
        // the bogus chain id entry is dropped, not an error
        assert_eq!(book.chains.len(), 1);
    }

    #[test]
    fn test_address_parse_is_case_insensitive() {
        let json = r#"{ "10": [ { "address": "0x4200000000000000000000000000000000000042", "kind": "pinned", "title": "t" } ] }"#;
        let book = AddressBook::from_json_str(json).unwrap();
        let lower: Address = "0x4200000000000000000000000000000000000042"
            .parse()
            .unwrap();
        assert!(book.lookup(NamedChain::Optimism, lower).is_some());
    }
}
