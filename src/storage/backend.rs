//! Store traits shared by every storage backend.
//!
//! The rota keeps four logical keyspaces:
//! - the task catalog
//! - schedule entries, keyed by (role, weekday, task)
//! - substitutions, unique per (main role, date)
//! - completions, unique per (task, date)
//!
//! plus an append-only care action log. `Storage` (SQLite) and `MemoryStore`
//! both implement every trait here; the resolver, digest and service layer are
//! generic over them.

use crate::models::{
    Board, CareAction, Completion, NewTask, Role, Substitution, Task, TaskId, Weekday,
    WeeklySchedule,
};
use crate::{Error, Result};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashSet};

/// The catalog of tasks that schedule entries refer to.
pub trait TaskCatalog: Send + Sync {
    /// All tasks ordered by cage label, then id.
    fn list_tasks(&self) -> Result<Vec<Task>>;

    /// Look up one task. Fails with `NotFound` if absent.
    fn get_task(&self, id: TaskId) -> Result<Task>;

    /// Add a task with the next free id.
    fn add_task(&self, cage: &str, name: &str) -> Result<Task>;

    /// Edit a task's cage and/or name.
    fn update_task(&self, id: TaskId, cage: Option<&str>, name: Option<&str>) -> Result<Task>;

    /// Load the initial catalog. Does nothing if the catalog already has tasks.
    ///
    /// Returns the number of tasks inserted.
    fn seed_tasks(&self, tasks: &[NewTask]) -> Result<usize>;
}

/// Weekly (role, weekday) → task assignments.
pub trait ScheduleStore: TaskCatalog {
    /// The board for a weekday. A weekday without assignments is an empty board.
    fn board(&self, weekday: Weekday) -> Result<Board>;

    /// Atomically replace every assignment for (role, weekday).
    ///
    /// Fails with `InvalidInput` for supervisory roles and `NotFound` if any
    /// task id is unknown, leaving the previous assignment untouched.
    fn replace_assignments(&self, role: Role, weekday: Weekday, task_ids: &[TaskId])
    -> Result<()>;

    /// Task ids per role per weekday.
    fn weekly_schedule(&self) -> Result<WeeklySchedule>;
}

/// Day-scoped substitutions: (main role, date) → covering role.
pub trait SubstitutionStore: Send + Sync {
    /// Replace the substitute for (main_role, date); `None` clears it.
    fn set_substitute(&self, main_role: Role, date: NaiveDate, substitute: Option<Role>)
    -> Result<()>;

    /// Substitutions for a date ordered by main role.
    fn substitutes_for_date(&self, date: NaiveDate) -> Result<Vec<Substitution>>;
}

/// Daily completion state, last writer wins.
pub trait CompletionTracker: Send + Sync {
    fn mark_complete(&self, task_id: TaskId, date: NaiveDate, completed_by: &str) -> Result<()>;

    /// Remove the completion if present. Never fails for a missing entry.
    fn cancel(&self, task_id: TaskId, date: NaiveDate) -> Result<()>;

    fn list_completed(&self, date: NaiveDate) -> Result<BTreeSet<TaskId>>;

    fn completer_of(&self, task_id: TaskId, date: NaiveDate) -> Result<Option<String>>;

    /// All completions for a date ordered by task id.
    fn completions_for_date(&self, date: NaiveDate) -> Result<Vec<Completion>>;
}

/// Append-only log of care actions performed on tasks.
pub trait CareActionLog: Send + Sync {
    /// Record one row per non-blank action. Returns the number recorded.
    fn record_actions(
        &self,
        task_id: TaskId,
        actions: &[String],
        username: &str,
        date: NaiveDate,
    ) -> Result<usize>;

    fn actions_for_date(&self, date: NaiveDate) -> Result<Vec<CareAction>>;
}

/// Everything the rota needs from a backend.
pub trait RotaStore: ScheduleStore + SubstitutionStore + CompletionTracker + CareActionLog {}

impl<T> RotaStore for T where
    T: ScheduleStore + SubstitutionStore + CompletionTracker + CareActionLog
{
}

/// Trim a required text field, rejecting blanks.
pub(crate) fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// Drop duplicate ids, keeping first occurrence order.
pub(crate) fn dedup_task_ids(task_ids: &[TaskId]) -> Vec<TaskId> {
    let mut seen = HashSet::new();
    task_ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Trimmed, non-blank actions.
pub(crate) fn clean_actions(actions: &[String]) -> Vec<String> {
    actions
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

/// Seed entries as catalog tasks: ids default to the 1-based position, text is
/// trimmed, and blank fields or ids below 1 are rejected.
pub(crate) fn seed_rows(tasks: &[NewTask]) -> Result<Vec<Task>> {
    tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let entry = i + 1;
            let id = task.id.unwrap_or(entry as TaskId);
            if id < 1 {
                return Err(Error::InvalidInput(format!(
                    "seed entry {} has id {}",
                    entry, id
                )));
            }
            let (cage, name) = (task.cage.trim(), task.name.trim());
            if cage.is_empty() || name.is_empty() {
                return Err(Error::InvalidInput(format!(
                    "seed entry {} needs a non-empty cage and name",
                    entry
                )));
            }
            Ok(Task::new(id, cage, name))
        })
        .collect()
}

pub(crate) fn task_not_found(id: TaskId) -> Error {
    Error::NotFound(format!("task {}", id))
}
