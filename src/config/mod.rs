//! Configuration for the rota CLI.
//!
//! ## config.toml
//!
//! Located at `~/.config/zoorota/config.toml` by default; `--config` (or
//! `ROTA_CONFIG`) points elsewhere. Contains:
//! - `data_dir` - Directory holding rota.db
//! - `output_format` - "json" or "human"
//! - `log_filter` - Filter directive for the stderr log
//! - `log_format` - "text" or "json" log lines
//! - `seed_file` - Catalog seed used at init
//!
//! Use the [`resolver`] module for precedence resolution against CLI flags and
//! environment variables.

pub mod resolver;
pub mod schema;

pub use resolver::{
    ConfigOverrides, DATA_DIR_ENV, LOG_ENV, Resolved, ResolvedConfig, ValueSource,
    default_config_path, resolve_config, resolve_config_with_env,
};
pub use schema::{LogFormat, OutputFormat, RotaConfig};
