use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::write;
use tempfile::NamedTempFile;

/// Creates a minimal routing config for the CLI to read.
fn create_minimal_config() -> NamedTempFile {
    let config = NamedTempFile::new().expect("Creating temp config file failed");
    write(
        config.path(),
        b"routing:\n  growth:\n    repo: \"example-org/growth-initiatives\"\n    project_id: \"PVT_board1\"\n",
    )
    .expect("Writing temp config failed");
    config
}

/// Creates a trigger event file naming the given object key.
fn create_event(key: &str) -> NamedTempFile {
    let event = NamedTempFile::new().expect("Creating temp event file failed");
    write(
        event.path(),
        format!(r#"{{"records":[{{"container":"intake-bucket","key":"{key}"}}]}}"#),
    )
    .expect("Writing temp event failed");
    event
}

/// A key outside the intake rules is reported as skipped without touching
/// any remote surface, so dummy credentials are enough to run the binary.
#[test]
fn handle_cli_reports_skipped_for_key_outside_intake_rules() {
    let config = create_minimal_config();
    let event = create_event("exports/report.pdf");

    let mut cmd = Command::cargo_bin("intake-bridge").expect("Binary exists");
    cmd.arg("handle")
        .arg("--event")
        .arg(event.path())
        .arg("--config")
        .arg(config.path())
        .env("STORAGE_ACCOUNT_URL", "https://account.blob.example.net")
        .env("STORAGE_TOKEN", "storage-secret")
        .env("GITHUB_TOKEN", "ghp_secret")
        .env("NOTIFY_WEBHOOK_URL", "https://hooks.example.com/T000/B000");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"{"status":"skipped"}"#));
}

#[test]
fn handle_cli_requires_event_flag() {
    let config = create_minimal_config();

    let mut cmd = Command::cargo_bin("intake-bridge").expect("Binary exists");
    cmd.arg("handle").arg("--config").arg(config.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--event"));
}

#[test]
fn handle_cli_fails_on_missing_config_file() {
    let event = create_event("intake/idea-001.json");

    let mut cmd = Command::cargo_bin("intake-bridge").expect("Binary exists");
    cmd.arg("handle")
        .arg("--event")
        .arg(event.path())
        .arg("--config")
        .arg("/nonexistent/config.yaml")
        .env("STORAGE_ACCOUNT_URL", "https://account.blob.example.net")
        .env("STORAGE_TOKEN", "storage-secret")
        .env("GITHUB_TOKEN", "ghp_secret")
        .env("NOTIFY_WEBHOOK_URL", "https://hooks.example.com/T000/B000");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn handle_cli_fails_on_malformed_event_file() {
    let config = create_minimal_config();
    let event = NamedTempFile::new().expect("Creating temp event file failed");
    write(event.path(), b"this is not a trigger event").expect("Writing temp event failed");

    let mut cmd = Command::cargo_bin("intake-bridge").expect("Binary exists");
    cmd.arg("handle")
        .arg("--event")
        .arg(event.path())
        .arg("--config")
        .arg(config.path())
        .env("STORAGE_ACCOUNT_URL", "https://account.blob.example.net")
        .env("STORAGE_TOKEN", "storage-secret")
        .env("GITHUB_TOKEN", "ghp_secret")
        .env("NOTIFY_WEBHOOK_URL", "https://hooks.example.com/T000/B000");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse trigger event"));
}

/// Client construction precedes handling, so missing credentials fail the
/// invocation even when the key would have been skipped.
#[test]
fn handle_cli_fails_without_storage_credentials() {
    let config = create_minimal_config();
    let event = create_event("exports/report.pdf");

    let mut cmd = Command::cargo_bin("intake-bridge").expect("Binary exists");
    cmd.arg("handle")
        .arg("--event")
        .arg(event.path())
        .arg("--config")
        .arg(config.path())
        .env_remove("STORAGE_ACCOUNT_URL")
        .env("STORAGE_TOKEN", "storage-secret")
        .env("GITHUB_TOKEN", "ghp_secret")
        .env("NOTIFY_WEBHOOK_URL", "https://hooks.example.com/T000/B000");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("STORAGE_ACCOUNT_URL"));
}
