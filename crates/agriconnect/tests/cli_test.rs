//! Integration tests for the `agriconnect` binary.
//!
//! Every run gets a fresh in-memory market seeded with the demo records,
//! so these tests need nothing beyond the binary itself.
#![allow(clippy::unwrap_used)]

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `agriconnect` binary with env isolation.
///
/// Clears the `AGRICONNECT_*` overrides and the advisor key, and points
/// config directories at a nonexistent path so the user's real
/// configuration is never read.
fn agri_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("agriconnect");
    cmd.env("HOME", "/tmp/agriconnect-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/agriconnect-cli-test-nonexistent")
        .env("AGRICONNECT_DEALER_PASSWORD", "password")
        .env_remove("AGRICONNECT_LANG")
        .env_remove("AGRICONNECT_DEVICE")
        .env_remove("AGRICONNECT_OUTPUT")
        .env_remove("GEMINI_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = agri_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_roles() {
    agri_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("ussd")
            .and(predicate::str::contains("sms"))
            .and(predicate::str::contains("console"))
            .and(predicate::str::contains("tickets")),
    );
}

#[test]
fn test_version_flag() {
    agri_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("agriconnect"));
}

#[test]
fn test_unknown_language_is_a_usage_error() {
    agri_cmd()
        .args(["--lang", "fr", "prices"])
        .assert()
        .code(2);
}

#[test]
fn test_completions_bash() {
    agri_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── USSD ────────────────────────────────────────────────────────────

#[test]
fn test_ussd_reaches_main_menu() {
    agri_cmd()
        .args(["ussd", "--instant", "-o", "plain", "-s", "*808#", "-s", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Sell Produce"));
}

#[test]
fn test_ussd_wrong_code_fails_to_connect() {
    agri_cmd()
        .args(["ussd", "--instant", "-o", "plain", "-s", "*123#"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid MMI Code"));
}

#[test]
fn test_ussd_view_serializes_as_json() {
    agri_cmd()
        .args(["ussd", "--instant", "-o", "json-compact", "-s", "*808#"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"));
}

// ── Dashboards ──────────────────────────────────────────────────────

#[test]
fn test_prices_plain() {
    agri_cmd()
        .args(["prices", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Teff (White)\t120"));
}

#[test]
fn test_offers_json() {
    agri_cmd()
        .args(["offers", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"O-1021\"").and(predicate::str::contains("Abebe Bikila")));
}

#[test]
fn test_open_tickets() {
    agri_cmd()
        .args(["tickets", "--open", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::diff("T-0421\tOpen\nT-0417\tIn Progress\n"));
}

#[test]
fn test_empty_market_has_no_offers() {
    agri_cmd()
        .args(["offers", "--empty", "-o", "json-compact"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

// ── SMS ─────────────────────────────────────────────────────────────

#[test]
fn test_sms_price_query_gets_market_update() {
    agri_cmd()
        .args(["sms", "-o", "plain", "-s", "price"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MARKET UPDATE"));
}

// ── Console ─────────────────────────────────────────────────────────

#[test]
fn test_console_dealer_accepts_offer() {
    agri_cmd()
        .args(["console", "--instant", "--color", "never", "-o", "plain"])
        .write_stdin("accept O-1021\nlogin admin password\naccept O-1021\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Offer Accepted SMS"))
        .stderr(predicate::str::contains("needs a dealer login"));
}

#[test]
fn test_console_handset_offer_reaches_dashboard() {
    let output = agri_cmd()
        .args(["console", "--instant", "--color", "never", "-o", "plain"])
        .write_stdin(
            "dial\nussd 1\nussd 1\nussd 1\nussd 5\nlogin admin password\noffers\nquit\n",
        )
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.lines().filter(|l| l.ends_with("\tPending")).count() == 3,
        "Expected the new offer among the pending ones:\n{stdout}"
    );
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    agri_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("agriconnect"));
}

#[test]
fn test_config_show_reads_file_and_masks_secrets() {
    let home = tempfile::tempdir().unwrap();
    let config_dir = home.path().join("agriconnect");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[defaults]\nlanguage = \"am\"\n\n[dealer]\nusername = \"abebe\"\npassword = \"teff-harvest\"\n",
    )
    .unwrap();

    agri_cmd()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("username = \"abebe\"")
                .and(predicate::str::contains("language = \"am\""))
                .and(predicate::str::contains("password = \"****\""))
                .and(predicate::str::contains("teff-harvest").not()),
        );
}

#[test]
fn test_config_show_defaults() {
    agri_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[dealer]").and(predicate::str::contains("username = \"admin\"")));
}
