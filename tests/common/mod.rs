//! Common test utilities for rota integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's `~/.local/share/zoorota/` directory.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// Catalog used by most tests; ids are positions 1..=6.
pub const SEED_JSON: &str = r#"[
    {"cage": "C1", "name": "Iguana"},
    {"cage": "B2", "name": "Gecko"},
    {"cage": "D4", "name": "Python"},
    {"cage": "A2", "name": "Tarantula"},
    {"cage": "A1", "name": "Axolotl"},
    {"cage": "E1", "name": "Stick insects"}
]"#;

/// 2024-03-06 is a Wednesday (weekday 3).
pub const WEDNESDAY: &str = "2024-03-06";

/// A test environment with isolated data storage.
///
/// `data_dir` holds rota.db (via `ROTA_DATA_DIR`); `config_dir` stands in for
/// the platform config directory so a developer's config.toml is never read.
pub struct TestEnv {
    pub data_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a test environment, initialize it and seed `SEED_JSON`.
    pub fn init() -> Self {
        let env = Self::new();
        let seed = env.write_file("tasks.json", SEED_JSON);
        env.rota()
            .args(["system", "init", "--seed"])
            .arg(&seed)
            .assert()
            .success();
        env
    }

    /// Get a Command for the rota binary with isolated directories.
    ///
    /// Sets `ROTA_DATA_DIR` per-command for parallel safety.
    pub fn rota(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_rota"));
        cmd.env("ROTA_DATA_DIR", self.data_dir.path());
        cmd.env("XDG_CONFIG_HOME", self.config_dir.path());
        cmd.env_remove("ROTA_LOG");
        cmd.env_remove("ROTA_CONFIG");
        cmd
    }

    /// Write a file into the config directory and return its path.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.config_dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Run `rota <args>` expecting success and parse stdout as JSON.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.rota().args(args).assert().success().get_output().stdout.clone();
        serde_json::from_slice(&output).unwrap()
    }

    pub fn data_path(&self) -> &Path {
        self.data_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Task ids from a JSON array of tasks.
pub fn task_ids(tasks: &serde_json::Value) -> Vec<i64> {
    tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect()
}
