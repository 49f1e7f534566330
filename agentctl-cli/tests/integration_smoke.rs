//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_top_level_help() {
    let mut cmd = Command::cargo_bin("agentctl").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Run the HTTP API server"));
}

#[test]
fn test_db_help() {
    let mut cmd = Command::cargo_bin("agentctl").unwrap();
    cmd.arg("db").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Schema administration"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("agentctl").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Address to bind to"));
}

#[test]
fn test_db_init_creates_schema() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}/cli.db?mode=rwc", dir.path().display());

    let mut cmd = Command::cargo_bin("agentctl").unwrap();
    cmd.arg("db").arg("init").env("DATABASE_URL", &url);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("schema initialized"));
}

#[test]
fn test_db_drop_requires_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}/cli.db?mode=rwc", dir.path().display());

    let mut cmd = Command::cargo_bin("agentctl").unwrap();
    cmd.arg("db").arg("drop").env("DATABASE_URL", &url);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn test_db_reset_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}/cli.db?mode=rwc", dir.path().display());

    Command::cargo_bin("agentctl")
        .unwrap()
        .arg("db")
        .arg("init")
        .env("DATABASE_URL", &url)
        .assert()
        .success();

    Command::cargo_bin("agentctl")
        .unwrap()
        .arg("db")
        .arg("reset")
        .arg("--yes")
        .env("DATABASE_URL", &url)
        .assert()
        .success()
        .stdout(predicate::str::contains("schema reset"));
}
