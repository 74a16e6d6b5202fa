//! CLI integration tests for the hubauth command-line interface.
//!
//! These tests verify help output, argument parsing and the start-up
//! credential checks. None of them contact the provider.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for the hubauth binary with no ambient credentials.
///
/// Credentials are set to empty strings rather than removed so a stray
/// `.env` file found by dotenvy cannot fill them in.
fn hubauth() -> Command {
    let mut cmd = Command::cargo_bin("hubauth").unwrap();
    cmd.current_dir(env!("CARGO_TARGET_TMPDIR"))
        .env("CLIENT_ID", "")
        .env("CLIENT_SECRET", "")
        .env("SCOPE", "")
        .env_remove("HUBAUTH_LOG_DIR")
        .env_remove("HUBAUTH_PORT")
        .env_remove("HUBAUTH_HOST")
        .env_remove("HUBAUTH_REDIRECT_URI")
        .env_remove("HUBAUTH_TOKEN_URL")
        .env_remove("HUBAUTH_AUTHORIZE_URL");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_displays() {
    hubauth()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("OAuth 2.0"))
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("authorize-url"));
}

#[test]
fn test_version_displays() {
    hubauth()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hubauth"));
}

#[test]
fn test_start_help_lists_options() {
    hubauth()
        .args(["start", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--no-open"))
        .stdout(predicate::str::contains("--client-id"))
        .stdout(predicate::str::contains("--sweep-interval"));
}

#[test]
fn test_unknown_subcommand_fails() {
    hubauth().arg("frobnicate").assert().failure();
}

#[test]
fn test_invalid_port_rejected() {
    hubauth()
        .args(["start", "--port", "not-a-port"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Credential Checks
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_start_without_credentials_fails_fast() {
    hubauth()
        .args(["start", "--no-open"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing CLIENT_ID or CLIENT_SECRET"));
}

#[test]
fn test_authorize_url_without_credentials_fails() {
    hubauth()
        .arg("authorize-url")
        .env("CLIENT_ID", "only-the-id")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing CLIENT_ID or CLIENT_SECRET"));
}

#[test]
fn test_authorize_url_from_env() {
    hubauth()
        .arg("authorize-url")
        .env("CLIENT_ID", "client-123")
        .env("CLIENT_SECRET", "secret")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "https://app.hubspot.com/oauth/authorize?client_id=client-123",
        ))
        .stdout(predicate::str::contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Foauth-callback",
        ))
        .stdout(predicate::str::contains("secret").not());
}

#[test]
fn test_authorize_url_custom_scope_and_port() {
    hubauth()
        .args(["authorize-url", "--port", "4000", "--scope", "oauth"])
        .env("CLIENT_ID", "client-123")
        .env("CLIENT_SECRET", "secret")
        .assert()
        .success()
        .stdout(predicate::str::contains("scope=oauth&"))
        .stdout(predicate::str::contains("localhost%3A4000"));
}
