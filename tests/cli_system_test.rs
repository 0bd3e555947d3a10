//! Integration tests for `rota system` commands and configuration.
//!
//! These tests verify:
//! - `rota system init` creates storage and seeds the catalog once
//! - `rota system info` reports data location, sources and counts
//! - Commands fail cleanly before init
//! - config.toml and CLI flags feed the data directory and output format

mod common;

use common::{SEED_JSON, TestEnv};
use predicates::prelude::*;

#[test]
fn test_init_creates_storage() {
    let env = TestEnv::new();

    env.rota()
        .args(["system", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"created\":true"));

    assert!(env.data_path().join("rota.db").exists());
}

#[test]
fn test_init_human_readable() {
    let env = TestEnv::new();

    env.rota()
        .args(["system", "init", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized rota"));
}

#[test]
fn test_init_twice_does_not_reseed() {
    let env = TestEnv::init();
    let seed = env.write_file("more.json", r#"[{"cage": "Z1", "name": "Zebra"}]"#);

    let json = env.json(&["system", "init", "--seed", seed.to_str().unwrap()]);
    assert_eq!(json["created"], false);
    assert_eq!(json["seeded"], 0);

    let tasks = env.json(&["task", "list"]);
    assert_eq!(tasks["count"], 6);
}

#[test]
fn test_commands_before_init_fail() {
    let env = TestEnv::new();

    env.rota()
        .args(["task", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error\""))
        .stderr(predicate::str::contains("rota system init"));
}

#[test]
fn test_error_human_readable() {
    let env = TestEnv::new();

    env.rota()
        .args(["task", "list", "-H"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: "));
}

#[test]
fn test_info_reports_counts() {
    let env = TestEnv::init();

    let json = env.json(&["system", "info"]);
    assert_eq!(json["initialized"], true);
    assert_eq!(json["counts"]["tasks"], 6);
    assert_eq!(json["data_dir_source"], "env:ROTA_DATA_DIR");
    assert_eq!(json["version"], "0.1.0");
}

#[test]
fn test_info_before_init() {
    let env = TestEnv::new();

    let json = env.json(&["system", "info"]);
    assert_eq!(json["initialized"], false);
    assert!(json.get("counts").is_none());
}

#[test]
fn test_data_dir_flag_beats_env() {
    let env = TestEnv::new();
    let other = tempfile::TempDir::new().unwrap();

    env.rota()
        .args(["system", "init", "--data-dir"])
        .arg(other.path())
        .assert()
        .success();

    assert!(other.path().join("rota.db").exists());
    assert!(!env.data_path().join("rota.db").exists());
}

#[test]
fn test_config_file_seed_and_output_format() {
    let env = TestEnv::new();
    let seed = env.write_file("tasks.json", SEED_JSON);
    let config = env.write_file(
        "config.toml",
        &format!(
            "output_format = \"human\"\nseed_file = {:?}\n",
            seed.to_str().unwrap()
        ),
    );

    env.rota()
        .args(["system", "init", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded 6 task(s)"));
}

#[test]
fn test_invalid_config_file_fails() {
    let env = TestEnv::new();
    let config = env.write_file("config.toml", "output_format = \"xml\"\n");

    env.rota()
        .args(["system", "info", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));
}
