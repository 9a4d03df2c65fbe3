//! Test helper utilities for api crate integration tests.

use std::time::Duration;

use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use yieldlens_api::ClientConfig;
use yieldlens_core::{CowcentratedIds, Store, VaultEntity, VaultType};

/// Start a mock provider server.
pub async fn start_mock_server() -> MockServer {
    MockServer::start().await
}

/// Create a ClientConfig pointing both providers at a mock server, with the
/// global cool-down disabled so tests control gating through the freshness
/// window alone.
pub fn config_with_mock(mock: &MockServer) -> ClientConfig {
    let url = Url::parse(&mock.uri()).unwrap();
    ClientConfig::new()
        .with_merkl_url(url.clone())
        .with_stellaswap_url(url)
        .with_global_cooldown(Duration::ZERO)
}

/// Load a fixture file as a string.
pub fn load_fixture(name: &str) -> String {
    let path = format!(
        "{}/tests/fixtures/{}.json",
        env!("CARGO_MANIFEST_DIR"),
        name
    );
    std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to load fixture: {}", path))
}

/// Mock a GET endpoint with a fixture response.
pub async fn mock_json_response(server: &MockServer, endpoint: &str, fixture_name: &str) {
    let body = load_fixture(fixture_name);
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mock a GET endpoint with an HTTP error.
pub async fn mock_http_error(server: &MockServer, endpoint: &str, status_code: u16) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(status_code).set_body_string("Internal Server Error"))
        .mount(server)
        .await;
}

/// The vault address used in the fixture files.
pub fn fixture_vault_address() -> Address {
    Address::from([0x11u8; 20])
}

/// A store holding the vault the fixture reason ids and pool addresses
/// reference.
pub fn fixture_store(chain: NamedChain) -> Store {
    let mut store = Store::new();
    store.replace_vaults(vec![VaultEntity {
        id: "fixture-vault".to_string(),
        name: "Fixture Vault".to_string(),
        vault_type: VaultType::Gov,
        chain,
        contract_address: fixture_vault_address(),
        deposit_token_address: Address::ZERO,
        assets: vec![],
        cowcentrated_ids: CowcentratedIds::default(),
        platform_id: None,
        risks: vec![],
    }]);
    store
}
