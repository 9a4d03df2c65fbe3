//! CLI integration tests against a fixture snapshot.

use assert_cmd::Command;
use predicates::prelude::*;

const WALLET: &str = "0x0909090909090909090909090909090909090909";

fn snapshot_path() -> String {
    format!("{}/tests/fixtures/snapshot.json", env!("CARGO_MANIFEST_DIR"))
}

fn yieldlens() -> Command {
    Command::cargo_bin("yieldlens").unwrap()
}

#[test]
fn test_help_lists_commands() {
    yieldlens()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("yield")
                .and(predicate::str::contains("rewards"))
                .and(predicate::str::contains("balance")),
        );
}

#[test]
fn test_missing_snapshot_is_an_error() {
    yieldlens()
        .args(["yield", "weth-usdc"])
        .env_remove("YIELDLENS_SNAPSHOT")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--snapshot"));
}

#[test]
fn test_yield_composition_table() {
    yieldlens()
        .args(["--snapshot", &snapshot_path(), "yield", "weth-usdc"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("vault")
                .and(predicate::str::contains("8.00%"))
                .and(predicate::str::contains("12.00%"))
                .and(predicate::str::contains("Vault-Apy")),
        );
}

#[test]
fn test_unknown_vault_fails() {
    yieldlens()
        .args(["--snapshot", &snapshot_path(), "yield", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Vault not found"));
}

#[test]
fn test_balance_locations_subtract_displaced() {
    yieldlens()
        .args([
            "--snapshot",
            &snapshot_path(),
            "balance",
            "weth-usdc",
            "--wallet",
            WALLET,
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Direct")
                .and(predicate::str::contains("200"))
                .and(predicate::str::contains("ARB Boost"))
                .and(predicate::str::contains("50")),
        );
}

#[test]
fn test_balance_assets_are_pro_rata() {
    yieldlens()
        .args([
            "--snapshot",
            &snapshot_path(),
            "balance",
            "weth-usdc",
            "--wallet",
            WALLET,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("WETH").and(predicate::str::contains("25")));
}

#[test]
fn test_rewards_offline_from_snapshot() {
    yieldlens()
        .args([
            "--snapshot",
            &snapshot_path(),
            "rewards",
            "weth-usdc",
            "--wallet",
            WALLET,
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("ARB")
                .and(predicate::str::contains("1.5"))
                .and(predicate::str::contains("5.00%")),
        );
}

#[test]
fn test_rewards_json_output() {
    yieldlens()
        .args([
            "--snapshot",
            &snapshot_path(),
            "--format",
            "json",
            "rewards",
            "weth-usdc",
            "--wallet",
            WALLET,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"rewards\"").and(predicate::str::contains("\"active\": true")));
}
