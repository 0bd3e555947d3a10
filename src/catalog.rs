//! Task catalog seed files.
//!
//! A seed file is a JSON array of `{ "cage": .., "name": .. }` objects with an
//! optional `id`. Tasks without an id get their 1-based position.

use crate::models::NewTask;
use crate::storage::TaskCatalog;
use crate::storage::backend::seed_rows;
use crate::{Error, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Parse and validate seed JSON.
pub fn parse_seed(json: &str) -> Result<Vec<NewTask>> {
    let tasks: Vec<NewTask> = serde_json::from_str(json)?;

    let mut ids = HashSet::new();
    for task in seed_rows(&tasks)? {
        if !ids.insert(task.id) {
            return Err(Error::InvalidInput(format!(
                "duplicate task id {} in seed",
                task.id
            )));
        }
    }
    Ok(tasks)
}

pub fn load_seed_file(path: &Path) -> Result<Vec<NewTask>> {
    let json = std::fs::read_to_string(path)?;
    parse_seed(&json)
}

/// Seed `store` from a file. Returns 0 when the catalog already has tasks.
pub fn seed_from_file<S: TaskCatalog + ?Sized>(store: &S, path: &Path) -> Result<usize> {
    let tasks = load_seed_file(path)?;
    let inserted = store.seed_tasks(&tasks)?;
    info!(path = %path.display(), inserted, "loaded seed file");
    Ok(inserted)
}
