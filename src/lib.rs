//! Zoorota - A weekly animal-care rota for zoo staff roles.
//!
//! This library provides the core functionality for the `rota` CLI tool:
//! weekly task assignment per role, day-scoped substitutions, completion
//! tracking, the daily resolver that answers "what does this role do today",
//! and the daily digest used for reporting.

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod digest;
pub mod events;
pub mod models;
pub mod resolver;
pub mod service;
pub mod storage;


/// Library-level error type for rota operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Not initialized: run `rota system init` first")]
    NotInitialized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage failure: {0}")]
    Storage(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error comes from the backing store rather than the caller.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Database(_) | Error::Storage(_))
    }
}

/// Result type alias for rota operations.
pub type Result<T> = std::result::Result<T, Error>;
