//! `rota system` commands.

use super::{Output, to_json_string};
use crate::Result;
use crate::catalog;
use crate::config::ResolvedConfig;
use crate::storage::{Storage, StorageCounts};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
pub struct InitResult {
    pub data_dir: PathBuf,
    /// False when the database already existed
    pub created: bool,
    pub seeded: usize,
}

impl Output for InitResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if self.created {
            lines.push(format!("Initialized rota in {}", self.data_dir.display()));
        } else {
            lines.push(format!("Rota already initialized in {}", self.data_dir.display()));
        }
        if self.seeded > 0 {
            lines.push(format!("Seeded {} task(s)", self.seeded));
        }
        lines.join("\n")
    }
}

/// Create (or reopen) the database and optionally seed the catalog.
pub fn system_init(data_dir: &Path, seed: Option<&Path>) -> Result<InitResult> {
    let created = !Storage::exists(data_dir);
    let storage = Storage::init(data_dir)?;
    let seeded = match seed {
        Some(path) => catalog::seed_from_file(&storage, path)?,
        None => 0,
    };
    Ok(InitResult {
        data_dir: data_dir.to_path_buf(),
        created,
        seeded,
    })
}

#[derive(Serialize)]
pub struct InfoResult {
    pub version: &'static str,
    pub build_timestamp: &'static str,
    pub git_commit: &'static str,
    pub config_path: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub data_dir_source: String,
    pub output_format: String,
    pub log_filter: String,
    pub initialized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<StorageCounts>,
}

impl Output for InfoResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![
            format!(
                "rota {} ({} built {})",
                self.version, self.git_commit, self.build_timestamp
            ),
            format!(
                "Data dir: {} ({})",
                self.data_dir.display(),
                self.data_dir_source
            ),
        ];
        if let Some(ref path) = self.config_path {
            lines.push(format!("Config: {}", path.display()));
        }
        lines.push(format!("Output: {}  Log filter: {}", self.output_format, self.log_filter));
        match self.counts {
            Some(ref c) => lines.push(format!(
                "Tasks: {}  Schedule entries: {}  Substitutions: {}  Completions: {}  \
                 Care actions: {}",
                c.tasks, c.schedule_entries, c.substitutions, c.completions, c.care_actions
            )),
            None => lines.push("Not initialized. Run `rota system init`.".to_string()),
        }
        lines.join("\n")
    }
}

/// Report where data lives, where settings came from and what is stored.
pub fn system_info(config: &ResolvedConfig) -> Result<InfoResult> {
    let data_dir = config.data_dir().clone();
    let counts = if Storage::exists(&data_dir) {
        Some(Storage::open(&data_dir)?.counts()?)
    } else {
        None
    };
    Ok(InfoResult {
        version: env!("CARGO_PKG_VERSION"),
        build_timestamp: env!("ROTA_BUILD_TIMESTAMP"),
        git_commit: env!("ROTA_GIT_COMMIT"),
        config_path: config.config_path.clone(),
        data_dir_source: config.data_dir.source.to_string(),
        output_format: config.output_format().to_string(),
        log_filter: config.log_filter().to_string(),
        initialized: counts.is_some(),
        data_dir,
        counts,
    })
}
