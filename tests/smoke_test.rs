//! Smoke tests for the rota CLI.
//!
//! These tests verify basic CLI functionality:
//! - `rota --version` outputs version info
//! - `rota --help` lists the commands
//! - `rota roles` works without any storage

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a Command for the rota binary.
fn rota() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rota"))
}

#[test]
fn test_version_flag() {
    rota()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rota"))
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_help_flag() {
    rota()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("today"))
        .stdout(predicate::str::contains("digest"));
}

#[test]
fn test_roles_json() {
    rota()
        .arg("roles")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"slug\":\"keeper-1\""))
        .stdout(predicate::str::contains("\"name\":\"Zoologs\""));
}

#[test]
fn test_roles_human() {
    rota()
        .args(["roles", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("zootechnician"))
        .stdout(predicate::str::contains("(supervisory)"));
}

#[test]
fn test_unknown_subcommand_fails() {
    rota().arg("feed-the-lions").assert().failure();
}
