//! In-memory store implementation.
//!
//! Holds all rota state behind a single `RwLock`, so every write (including
//! the multi-row replacements) is applied under one exclusive lock and readers
//! never observe a half-applied change.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use tracing::info;

use super::backend::{
    CareActionLog, CompletionTracker, ScheduleStore, SubstitutionStore, TaskCatalog,
    clean_actions, dedup_task_ids, require_text, seed_rows, task_not_found,
};
use crate::models::{
    Board, CareAction, Completion, NewTask, Role, Substitution, Task, TaskId, Weekday,
    WeeklySchedule,
};
use crate::{Error, Result};

#[derive(Default)]
struct MemoryState {
    /// Task catalog (single source of truth for task details)
    tasks: BTreeMap<TaskId, Task>,

    /// Schedule entries per (role, weekday)
    schedule: BTreeMap<(Role, Weekday), Vec<TaskId>>,

    /// Substitutions per (main role, date)
    substitutes: BTreeMap<(Role, NaiveDate), Role>,

    /// Completions per (task, date)
    completions: BTreeMap<(TaskId, NaiveDate), String>,

    /// Care action log, append-only
    actions: Vec<CareAction>,
}

impl MemoryState {
    fn require_task(&self, id: TaskId) -> Result<&Task> {
        self.tasks.get(&id).ok_or_else(|| task_not_found(id))
    }

    fn next_task_id(&self) -> TaskId {
        self.tasks.keys().next_back().map_or(1, |id| id + 1)
    }
}

/// Process-local store. Cheap to create; state is lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose catalog holds `tasks`.
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let store = Self::new();
        if let Ok(mut state) = store.state.write() {
            state.tasks = tasks.into_iter().map(|t| (t.id, t)).collect();
        }
        store
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))
    }
}

impl TaskCatalog for MemoryStore {
    fn list_tasks(&self) -> Result<Vec<Task>> {
        let state = self.read()?;
        let mut tasks: Vec<Task> = state.tasks.values().cloned().collect();
        tasks.sort_by(|a, b| a.cage.cmp(&b.cage).then(a.id.cmp(&b.id)));
        Ok(tasks)
    }

    fn get_task(&self, id: TaskId) -> Result<Task> {
        self.read()?.require_task(id).cloned()
    }

    fn add_task(&self, cage: &str, name: &str) -> Result<Task> {
        let cage = require_text("cage", cage)?;
        let name = require_text("name", name)?;

        let mut state = self.write()?;
        let task = Task::new(state.next_task_id(), cage, name);
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    fn update_task(&self, id: TaskId, cage: Option<&str>, name: Option<&str>) -> Result<Task> {
        let cage = cage.map(|c| require_text("cage", c)).transpose()?;
        let name = name.map(|n| require_text("name", n)).transpose()?;

        let mut state = self.write()?;
        let task = state.tasks.get_mut(&id).ok_or_else(|| task_not_found(id))?;
        if let Some(cage) = cage {
            task.cage = cage;
        }
        if let Some(name) = name {
            task.name = name;
        }
        Ok(task.clone())
    }

    fn seed_tasks(&self, tasks: &[NewTask]) -> Result<usize> {
        let rows = seed_rows(tasks)?;
        let mut state = self.write()?;
        if !state.tasks.is_empty() {
            return Ok(0);
        }
        for task in rows {
            state.tasks.entry(task.id).or_insert(task);
        }
        Ok(state.tasks.len())
    }
}

impl ScheduleStore for MemoryStore {
    fn board(&self, weekday: Weekday) -> Result<Board> {
        let state = self.read()?;
        let tasks = &state.tasks;
        let rows = state
            .schedule
            .iter()
            .filter(|((_, day), _)| *day == weekday)
            .flat_map(|(&(role, _), ids)| {
                ids.iter()
                    .filter_map(move |id| tasks.get(id).map(|t| (role, t.clone())))
            });
        Ok(Board::from_rows(weekday, rows))
    }

    fn replace_assignments(
        &self,
        role: Role,
        weekday: Weekday,
        task_ids: &[TaskId],
    ) -> Result<()> {
        let role = role.ensure_operational()?;
        let ids = dedup_task_ids(task_ids);

        let mut state = self.write()?;
        for id in &ids {
            state.require_task(*id)?;
        }
        if ids.is_empty() {
            state.schedule.remove(&(role, weekday));
        } else {
            state.schedule.insert((role, weekday), ids);
        }

        info!(role = %role, weekday = weekday.number(), "replaced assignments");
        Ok(())
    }

    fn weekly_schedule(&self) -> Result<WeeklySchedule> {
        let state = self.read()?;
        let mut grid = WeeklySchedule::empty();
        for ((role, day), ids) in &state.schedule {
            for id in ids {
                grid.insert(*role, *day, *id);
            }
        }
        Ok(grid)
    }
}

impl SubstitutionStore for MemoryStore {
    fn set_substitute(
        &self,
        main_role: Role,
        date: NaiveDate,
        substitute: Option<Role>,
    ) -> Result<()> {
        let main_role = main_role.ensure_operational()?;
        let substitute = substitute.map(Role::ensure_operational).transpose()?;

        let mut state = self.write()?;
        match substitute {
            Some(sub) => state.substitutes.insert((main_role, date), sub),
            None => state.substitutes.remove(&(main_role, date)),
        };
        Ok(())
    }

    fn substitutes_for_date(&self, date: NaiveDate) -> Result<Vec<Substitution>> {
        let state = self.read()?;
        // BTreeMap order is already by main role
        Ok(state
            .substitutes
            .iter()
            .filter(|((_, day), _)| *day == date)
            .map(|((main_role, _), sub)| Substitution {
                main_role: *main_role,
                substitute: *sub,
                date,
            })
            .collect())
    }
}

impl CompletionTracker for MemoryStore {
    fn mark_complete(&self, task_id: TaskId, date: NaiveDate, completed_by: &str) -> Result<()> {
        let completed_by = require_text("completed_by", completed_by)?;
        let mut state = self.write()?;
        state.require_task(task_id)?;
        state.completions.insert((task_id, date), completed_by);
        Ok(())
    }

    fn cancel(&self, task_id: TaskId, date: NaiveDate) -> Result<()> {
        self.write()?.completions.remove(&(task_id, date));
        Ok(())
    }

    fn list_completed(&self, date: NaiveDate) -> Result<BTreeSet<TaskId>> {
        Ok(self
            .read()?
            .completions
            .keys()
            .filter(|(_, day)| *day == date)
            .map(|(id, _)| *id)
            .collect())
    }

    fn completer_of(&self, task_id: TaskId, date: NaiveDate) -> Result<Option<String>> {
        Ok(self.read()?.completions.get(&(task_id, date)).cloned())
    }

    fn completions_for_date(&self, date: NaiveDate) -> Result<Vec<Completion>> {
        Ok(self
            .read()?
            .completions
            .iter()
            .filter(|((_, day), _)| *day == date)
            .map(|((task_id, _), who)| Completion {
                task_id: *task_id,
                date,
                completed_by: who.clone(),
            })
            .collect())
    }
}

impl CareActionLog for MemoryStore {
    fn record_actions(
        &self,
        task_id: TaskId,
        actions: &[String],
        username: &str,
        date: NaiveDate,
    ) -> Result<usize> {
        let actions = clean_actions(actions);
        if actions.is_empty() {
            return Ok(0);
        }
        let username = require_text("username", username)?;

        let mut state = self.write()?;
        state.require_task(task_id)?;
        for action in &actions {
            let id = state.actions.len() as i64 + 1;
            state.actions.push(CareAction {
                id,
                task_id,
                action: action.clone(),
                username: username.clone(),
                date,
            });
        }
        Ok(actions.len())
    }

    fn actions_for_date(&self, date: NaiveDate) -> Result<Vec<CareAction>> {
        Ok(self
            .read()?
            .actions
            .iter()
            .filter(|a| a.date == date)
            .cloned()
            .collect())
    }
}
