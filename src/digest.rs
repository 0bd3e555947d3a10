//! Daily digest: completion statistics for one date.
//!
//! Built from the supervisory board for the date plus that date's
//! completions. Nothing is cached; every call reads current state.

use crate::Result;
use crate::models::{Role, Task, Weekday};
use crate::resolver::DailyResolver;
use crate::storage::{CompletionTracker, ScheduleStore, SubstitutionStore};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// A scheduled task that was completed, with who completed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedTask {
    #[serde(flatten)]
    pub task: Task,
    pub completed_by: String,
}

/// Done/pending split for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDigest {
    pub role: Role,
    pub completed: Vec<CompletedTask>,
    pub pending: Vec<Task>,
}

impl RoleDigest {
    pub fn total(&self) -> usize {
        self.completed.len() + self.pending.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyDigest {
    pub date: NaiveDate,
    pub weekday: Weekday,
    /// Roles with at least one task, in canonical order
    pub roles: Vec<RoleDigest>,
    pub completed: Vec<CompletedTask>,
    pub pending: Vec<Task>,
    /// Board assignments; a task under two roles counts twice
    pub total: usize,
    pub done: usize,
    /// Percentage done, rounded; 0 when there is nothing scheduled
    pub rate: u32,
}

/// Percentage of `done` over `total`, rounded half up.
pub fn completion_rate(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (done as f64 / total as f64 * 100.0).round() as u32
}

/// Compute the digest for `date`.
///
/// Completions for tasks not on that day's board are ignored.
pub fn build_digest<S>(store: &S, date: NaiveDate) -> Result<DailyDigest>
where
    S: ScheduleStore + SubstitutionStore + CompletionTracker + ?Sized,
{
    let board = DailyResolver::new(store).full_board(date)?;
    let completions = store.completions_for_date(date)?;
    let completer = |task: &Task| {
        completions
            .iter()
            .find(|c| c.task_id == task.id)
            .map(|c| c.completed_by.clone())
    };

    let mut roles = Vec::new();
    for (role, tasks) in board.iter() {
        if tasks.is_empty() {
            continue;
        }
        let mut group = RoleDigest {
            role,
            completed: Vec::new(),
            pending: Vec::new(),
        };
        for task in tasks {
            match completer(task) {
                Some(completed_by) => group.completed.push(CompletedTask {
                    task: task.clone(),
                    completed_by,
                }),
                None => group.pending.push(task.clone()),
            }
        }
        roles.push(group);
    }

    let completed: Vec<CompletedTask> = roles
        .iter()
        .flat_map(|g| g.completed.iter().cloned())
        .collect();
    let pending: Vec<Task> = roles.iter().flat_map(|g| g.pending.iter().cloned()).collect();
    let total = board.assignment_count();
    let done = completed.len();
    let rate = completion_rate(done, total);

    debug!(%date, total, done, rate, "built daily digest");
    Ok(DailyDigest {
        date,
        weekday: board.weekday,
        roles,
        completed,
        pending,
        total,
        done,
        rate,
    })
}
