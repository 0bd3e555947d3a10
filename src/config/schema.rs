//! TOML schema for config.toml.
//!
//! ```toml
//! data_dir = "/var/lib/zoorota"
//! output_format = "human"  # or "json"
//! log_filter = "zoorota=info"
//! log_format = "json"  # or "text"
//! seed_file = "/etc/zoorota/tasks.json"
//! ```
//!
//! Every key is optional.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Format of the stderr log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Contents of config.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RotaConfig {
    /// Directory holding rota.db
    pub data_dir: Option<PathBuf>,

    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,

    /// `tracing-subscriber` filter directive, e.g. "zoorota=debug"
    pub log_filter: Option<String>,

    /// Text or JSON log lines
    pub log_format: Option<LogFormat>,

    /// Catalog seed used by `rota system init` when no `--seed` is given
    pub seed_file: Option<PathBuf>,
}

impl RotaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(ref dir) = self.data_dir {
            if dir.as_os_str().is_empty() {
                return Err("data_dir must not be empty".to_string());
            }
        }
        if let Some(ref filter) = self.log_filter {
            if filter.trim().is_empty() {
                return Err("log_filter must not be empty".to_string());
            }
        }
        Ok(())
    }

    /// Parse and validate TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate().map_err(Error::InvalidInput)?;
        Ok(config)
    }

    /// Read a config file. A missing file yields an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_toml_all_keys() {
        let config = RotaConfig::from_toml(
            r#"
            data_dir = "/srv/rota"
            output_format = "human"
            log_filter = "zoorota=debug"
            log_format = "json"
            seed_file = "tasks.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/rota")));
        assert_eq!(config.output_format, Some(OutputFormat::Human));
        assert_eq!(config.log_filter.as_deref(), Some("zoorota=debug"));
        assert_eq!(config.log_format, Some(LogFormat::Json));
        assert_eq!(config.seed_file, Some(PathBuf::from("tasks.json")));
    }

    #[test]
    fn test_from_toml_empty_is_default() {
        assert_eq!(RotaConfig::from_toml("").unwrap(), RotaConfig::new());
    }

    #[test]
    fn test_from_toml_rejects_bad_values() {
        assert!(matches!(
            RotaConfig::from_toml(r#"output_format = "xml""#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            RotaConfig::from_toml(r#"colour = "blue""#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            RotaConfig::from_toml(r#"log_filter = "  ""#),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            RotaConfig::from_toml(r#"data_dir = """#),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let config = RotaConfig::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, RotaConfig::new());
    }
}
