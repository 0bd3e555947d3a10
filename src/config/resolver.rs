//! Precedence resolution for rota settings.
//!
//! ## Data directory (highest to lowest)
//!
//! 1. `--data-dir` CLI flag
//! 2. `ROTA_DATA_DIR` environment variable
//! 3. `data_dir` in config.toml
//! 4. `<platform data dir>/zoorota`
//!
//! ## Output format
//!
//! `-H` flag > config.toml > json
//!
//! ## Log filter
//!
//! `-v` flag (debug) > `ROTA_LOG` > config.toml > `warn`
//!
//! The log format comes from config.toml only and defaults to text.

use crate::config::{LogFormat, OutputFormat, RotaConfig};
use crate::storage::default_data_dir;
use crate::{Error, Result};
use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "ROTA_DATA_DIR";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "ROTA_LOG";

pub const DEFAULT_LOG_FILTER: &str = "warn";
pub const VERBOSE_LOG_FILTER: &str = "debug";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from environment variable
    EnvVar(String),
    /// Value from config.toml
    ConfigFile,
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile => write!(f, "config"),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved settings with source tracking.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The config file that was consulted (it may not exist)
    pub config_path: Option<PathBuf>,
    pub data_dir: Resolved<PathBuf>,
    pub output_format: Resolved<OutputFormat>,
    pub log_filter: Resolved<String>,
    pub log_format: Resolved<LogFormat>,
    pub seed_file: Option<Resolved<PathBuf>>,
}

impl ResolvedConfig {
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir.value
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format.value
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter.value
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format.value
    }

    pub fn seed_file(&self) -> Option<&PathBuf> {
        self.seed_file.as_ref().map(|r| &r.value)
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Explicit config file; must exist when given
    pub config_path: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub output_format: Option<OutputFormat>,
    pub verbose: bool,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Default config location: `<platform config dir>/zoorota/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("zoorota").join("config.toml"))
}

/// Resolve settings from CLI overrides, the process environment and config.toml.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    resolve_config_with_env(overrides, |name| std::env::var(name).ok())
}

/// Resolve settings reading environment variables through `env`.
pub fn resolve_config_with_env<F>(overrides: &ConfigOverrides, env: F) -> Result<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config_path = match overrides.config_path {
        Some(ref path) => {
            if !path.exists() {
                return Err(Error::NotFound(format!("config file {}", path.display())));
            }
            Some(path.clone())
        }
        None => default_config_path(),
    };
    let file = match config_path {
        Some(ref path) => RotaConfig::load(path)?,
        None => RotaConfig::new(),
    };
    let env = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    let data_dir = if let Some(ref dir) = overrides.data_dir {
        Resolved::new(dir.clone(), ValueSource::CliFlag)
    } else if let Some(dir) = env(DATA_DIR_ENV) {
        Resolved::new(
            PathBuf::from(dir),
            ValueSource::EnvVar(DATA_DIR_ENV.to_string()),
        )
    } else if let Some(ref dir) = file.data_dir {
        Resolved::new(dir.clone(), ValueSource::ConfigFile)
    } else {
        Resolved::new(default_data_dir()?, ValueSource::Default)
    };

    let output_format = if let Some(format) = overrides.output_format {
        Resolved::new(format, ValueSource::CliFlag)
    } else if let Some(format) = file.output_format {
        Resolved::new(format, ValueSource::ConfigFile)
    } else {
        Resolved::new(OutputFormat::Json, ValueSource::Default)
    };

    let log_filter = if overrides.verbose {
        Resolved::new(VERBOSE_LOG_FILTER.to_string(), ValueSource::CliFlag)
    } else if let Some(filter) = env(LOG_ENV) {
        Resolved::new(filter, ValueSource::EnvVar(LOG_ENV.to_string()))
    } else if let Some(ref filter) = file.log_filter {
        Resolved::new(filter.clone(), ValueSource::ConfigFile)
    } else {
        Resolved::new(DEFAULT_LOG_FILTER.to_string(), ValueSource::Default)
    };

    let log_format = match file.log_format {
        Some(format) => Resolved::new(format, ValueSource::ConfigFile),
        None => Resolved::new(LogFormat::Text, ValueSource::Default),
    };

    let seed_file = file
        .seed_file
        .map(|path| Resolved::new(path, ValueSource::ConfigFile));

    Ok(ResolvedConfig {
        config_path,
        data_dir,
        output_format,
        log_filter,
        log_format,
        seed_file,
    })
}
