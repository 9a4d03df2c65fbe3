//! StellaSwap client integration tests.

mod helpers;

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use rust_decimal_macros::dec;

use helpers::{
    config_with_mock, fixture_store, mock_http_error, mock_json_response, start_mock_server,
};
use yieldlens_api::stellaswap::{attribute_rewards, StellaswapClient};
use yieldlens_api::ApiError;

fn wallet() -> Address {
    Address::from([0x99u8; 20])
}

fn rewards_path() -> String {
    format!("/rewards/{:#x}", wallet())
}

#[tokio::test]
async fn test_user_rewards_fetch_and_attribution() {
    let server = start_mock_server().await;
    mock_json_response(&server, &rewards_path(), "stellaswap_rewards").await;

    let client = StellaswapClient::new(&config_with_mock(&server)).unwrap();
    let data = client.user_rewards(wallet()).await.unwrap();
    assert_eq!(data.pools.len(), 1);

    let store = fixture_store(NamedChain::Moonbeam);
    let by_key = attribute_rewards(&store, NamedChain::Moonbeam, &data);
    let entries = &by_key["fixture-vault"];
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].token.symbol, "STELLA");
    assert_eq!(entries[0].amount, dec!(4));
}

#[tokio::test]
async fn test_failure_status_is_hard_error() {
    let server = start_mock_server().await;
    mock_json_response(&server, &rewards_path(), "stellaswap_failure").await;

    let client = StellaswapClient::new(&config_with_mock(&server)).unwrap();
    let err = client.user_rewards(wallet()).await.unwrap_err();

    assert!(matches!(
        err,
        ApiError::ProviderFailure {
            provider: "stellaswap",
            ..
        }
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_success_without_data_is_hard_error() {
    let server = start_mock_server().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .and(wiremock::matchers::path(rewards_path()))
        .respond_with(
            wiremock::ResponseTemplate::new(200).set_body_string(r#"{"status":"success"}"#),
        )
        .mount(&server)
        .await;

    let client = StellaswapClient::new(&config_with_mock(&server)).unwrap();
    let err = client.user_rewards(wallet()).await.unwrap_err();
    assert!(matches!(err, ApiError::ProviderFailure { .. }));
}

#[tokio::test]
async fn test_http_error_surfaces_as_status() {
    let server = start_mock_server().await;
    mock_http_error(&server, &rewards_path(), 500).await;

    let client = StellaswapClient::new(&config_with_mock(&server)).unwrap();
    let err = client.user_rewards(wallet()).await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Status {
            provider: "stellaswap",
            status: 500
        }
    ));
}
