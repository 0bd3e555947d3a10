//! Command implementations for the rota CLI.
//!
//! Each command opens storage in the resolved data directory, runs through the
//! [`Rota`] service and returns a result implementing [`Output`].
//! Commands are organized by area:
//! - `system` - init and info
//! - `catalog` - task catalog and roles
//! - `schedule` - weekly board and substitutions
//! - `daily` - today's view, completions, care actions and the digest

pub mod catalog;
pub mod daily;
pub mod schedule;
pub mod system;

pub use catalog::{roles, task_add, task_edit, task_list, task_seed};
pub use daily::{action_list, action_record, cancel, complete, digest, done, today};
pub use schedule::{schedule_overview, schedule_set, schedule_show, sub_clear, sub_list, sub_set};
pub use system::{system_info, system_init};

use crate::Result;
use crate::models::{Task, parse_date};
use crate::service::Rota;
use crate::storage::Storage;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::path::Path;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Serialize a result, falling back to an error object.
pub(crate) fn to_json_string<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
}

/// Open the rota stored in `data_dir`.
pub(crate) fn open_rota(data_dir: &Path) -> Result<Rota<Storage>> {
    Ok(Rota::new(Storage::open(data_dir)?))
}

/// Parse `--date`, defaulting to today in local time.
pub(crate) fn date_or_today(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => parse_date(s),
        None => Ok(Local::now().date_naive()),
    }
}

/// One task as a human-readable line.
pub(crate) fn task_line(task: &Task) -> String {
    format!("[{}] {} - {}", task.id, task.cage, task.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::test_utils::TestEnv;

    #[test]
    fn test_date_or_today() {
        assert_eq!(
            date_or_today(Some("2024-03-06")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()
        );
        assert_eq!(date_or_today(None).unwrap(), Local::now().date_naive());
        assert!(matches!(date_or_today(Some("yesterday")), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_open_rota_requires_init() {
        let env = TestEnv::new();
        assert!(matches!(open_rota(env.data_path()), Err(Error::NotInitialized)));
        env.init_storage();
        assert!(open_rota(env.data_path()).is_ok());
    }

    #[test]
    fn test_task_line() {
        assert_eq!(task_line(&Task::new(5, "A1", "Axolotl")), "[5] A1 - Axolotl");
    }
}
