//! Storage layer for rota data.
//!
//! This module handles persistence of the task catalog, the weekly schedule,
//! day-scoped substitutions, completions and the care action log.
//!
//! ## Storage Backends
//!
//! - **SQLite** (`Storage`, default): `rota.db` inside the data directory
//!   (`~/.local/share/zoorota/` unless overridden)
//! - **Memory** (`MemoryStore`): process-local, for embedding and tests
//!
//! Both implement the store traits in [`backend`]. Multi-row replacements
//! (`replace_assignments`, `set_substitute`) run in a single transaction so
//! readers see either the old or the new state.

pub mod backend;
pub mod memory;

pub use backend::{
    CareActionLog, CompletionTracker, RotaStore, ScheduleStore, SubstitutionStore, TaskCatalog,
};
pub use memory::MemoryStore;

use crate::models::{
    Board, CareAction, Completion, NewTask, Role, Substitution, Task, TaskId, Weekday,
    WeeklySchedule, parse_date,
};
use crate::{Error, Result};
use backend::{clean_actions, dedup_task_ids, require_text, seed_rows, task_not_found};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Database file name inside the data directory.
pub const DB_FILE: &str = "rota.db";

/// How long a writer waits on a lock held by another process.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed storage for one rota.
pub struct Storage {
    /// Root directory for this rota's data
    pub root: PathBuf,
    /// Connection shared by all callers; SQLite connections are not `Sync`
    conn: Mutex<Connection>,
}

/// Row counts reported by `rota system info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StorageCounts {
    pub tasks: usize,
    pub schedule_entries: usize,
    pub substitutions: usize,
    pub completions: usize,
    pub care_actions: usize,
}

impl Storage {
    /// Open existing storage in `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let db_path = data_dir.join(DB_FILE);
        if !db_path.exists() {
            return Err(Error::NotInitialized);
        }

        let conn = Self::connect(&db_path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            root: data_dir.to_path_buf(),
            conn: Mutex::new(conn),
        })
    }

    /// Initialize storage in `data_dir`, creating it if needed.
    pub fn init(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join(DB_FILE);
        let conn = Self::connect(&db_path)?;
        Self::init_schema(&conn)?;
        info!(path = %db_path.display(), "initialized rota storage");

        Ok(Self {
            root: data_dir.to_path_buf(),
            conn: Mutex::new(conn),
        })
    }

    /// Check if storage exists in `data_dir`.
    pub fn exists(data_dir: &Path) -> bool {
        data_dir.join(DB_FILE).exists()
    }

    /// Path of the SQLite database file.
    pub fn db_path(&self) -> PathBuf {
        self.root.join(DB_FILE)
    }

    fn connect(db_path: &Path) -> Result<Connection> {
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Initialize the SQLite schema.
    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY,
                cage TEXT NOT NULL,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS weekly_schedule (
                role TEXT NOT NULL,
                weekday INTEGER NOT NULL CHECK (weekday BETWEEN 1 AND 7),
                task_id INTEGER NOT NULL,
                PRIMARY KEY (role, weekday, task_id),
                FOREIGN KEY (task_id) REFERENCES tasks(id)
            );

            CREATE TABLE IF NOT EXISTS daily_substitutes (
                main_role TEXT NOT NULL,
                substitute_role TEXT NOT NULL,
                date TEXT NOT NULL,
                PRIMARY KEY (main_role, date)
            );

            CREATE TABLE IF NOT EXISTS completed_tasks (
                task_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                completed_by TEXT NOT NULL,
                PRIMARY KEY (task_id, date)
            );

            CREATE TABLE IF NOT EXISTS care_actions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                task_id INTEGER NOT NULL,
                action TEXT NOT NULL,
                username TEXT NOT NULL,
                date TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_weekly_schedule_weekday ON weekly_schedule(weekday);
            CREATE INDEX IF NOT EXISTS idx_daily_substitutes_date ON daily_substitutes(date);
            CREATE INDEX IF NOT EXISTS idx_completed_tasks_date ON completed_tasks(date);
            CREATE INDEX IF NOT EXISTS idx_care_actions_date ON care_actions(date);
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Storage("connection lock poisoned".to_string()))
    }

    /// Row counts per table.
    pub fn counts(&self) -> Result<StorageCounts> {
        let conn = self.conn()?;
        let count = |table: &str| -> Result<usize> {
            let n: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?;
            Ok(n as usize)
        };
        Ok(StorageCounts {
            tasks: count("tasks")?,
            schedule_entries: count("weekly_schedule")?,
            substitutions: count("daily_substitutes")?,
            completions: count("completed_tasks")?,
            care_actions: count("care_actions")?,
        })
    }
}

fn task_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task::new(
        row.get(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, String>(2)?,
    ))
}

fn task_exists(tx: &Transaction<'_>, id: TaskId) -> Result<bool> {
    Ok(tx
        .query_row("SELECT 1 FROM tasks WHERE id = ?1", [id], |_| Ok(()))
        .optional()?
        .is_some())
}

/// Parse a role column, skipping rows written by older role sets.
fn role_column(raw: &str) -> Option<Role> {
    let role = Role::parse(raw);
    if role.is_none() {
        warn!(role = raw, "ignoring row with unknown role");
    }
    role
}

impl TaskCatalog for Storage {
    fn list_tasks(&self) -> Result<Vec<Task>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, cage, name FROM tasks ORDER BY cage, id")?;
        let tasks = stmt
            .query_map([], task_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    fn get_task(&self, id: TaskId) -> Result<Task> {
        let conn = self.conn()?;
        conn.query_row("SELECT id, cage, name FROM tasks WHERE id = ?1", [id], task_row)
            .optional()?
            .ok_or_else(|| task_not_found(id))
    }

    fn add_task(&self, cage: &str, name: &str) -> Result<Task> {
        let cage = require_text("cage", cage)?;
        let name = require_text("name", name)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO tasks (cage, name) VALUES (?1, ?2)",
            params![cage, name],
        )?;
        let task = Task::new(conn.last_insert_rowid(), cage, name);
        info!(task_id = task.id, cage = %task.cage, "added task");
        Ok(task)
    }

    fn update_task(&self, id: TaskId, cage: Option<&str>, name: Option<&str>) -> Result<Task> {
        let cage = cage.map(|c| require_text("cage", c)).transpose()?;
        let name = name.map(|n| require_text("name", n)).transpose()?;

        // Read-modify-write under one guard
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut task = tx
            .query_row("SELECT id, cage, name FROM tasks WHERE id = ?1", [id], task_row)
            .optional()?
            .ok_or_else(|| task_not_found(id))?;
        if let Some(cage) = cage {
            task.cage = cage;
        }
        if let Some(name) = name {
            task.name = name;
        }
        tx.execute(
            "UPDATE tasks SET cage = ?1, name = ?2 WHERE id = ?3",
            params![task.cage, task.name, task.id],
        )?;
        tx.commit()?;
        info!(task_id = id, "updated task");
        Ok(task)
    }

    fn seed_tasks(&self, tasks: &[NewTask]) -> Result<usize> {
        let rows = seed_rows(tasks)?;
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let existing: i64 = tx.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
        if existing > 0 {
            debug!(existing, "catalog already populated, skipping seed");
            return Ok(0);
        }

        let mut inserted = 0;
        {
            let mut stmt =
                tx.prepare("INSERT OR IGNORE INTO tasks (id, cage, name) VALUES (?1, ?2, ?3)")?;
            for task in &rows {
                inserted += stmt.execute(params![task.id, task.cage, task.name])?;
            }
        }
        tx.commit()?;

        info!(count = inserted, "seeded task catalog");
        Ok(inserted)
    }
}

impl ScheduleStore for Storage {
    fn board(&self, weekday: Weekday) -> Result<Board> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT ws.role, t.id, t.cage, t.name
             FROM weekly_schedule ws
             JOIN tasks t ON ws.task_id = t.id
             WHERE ws.weekday = ?1",
        )?;
        let rows = stmt
            .query_map([weekday.number()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    Task::new(row.get(1)?, row.get::<_, String>(2)?, row.get::<_, String>(3)?),
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Board::from_rows(
            weekday,
            rows.into_iter()
                .filter_map(|(role, task)| role_column(&role).map(|r| (r, task))),
        ))
    }

    fn replace_assignments(
        &self,
        role: Role,
        weekday: Weekday,
        task_ids: &[TaskId],
    ) -> Result<()> {
        let role = role.ensure_operational()?;
        let ids = dedup_task_ids(task_ids);

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        for id in &ids {
            if !task_exists(&tx, *id)? {
                return Err(task_not_found(*id));
            }
        }

        tx.execute(
            "DELETE FROM weekly_schedule WHERE role = ?1 AND weekday = ?2",
            params![role.as_str(), weekday.number()],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO weekly_schedule (role, weekday, task_id) VALUES (?1, ?2, ?3)",
            )?;
            for id in &ids {
                stmt.execute(params![role.as_str(), weekday.number(), id])?;
            }
        }
        tx.commit()?;

        info!(role = %role, weekday = weekday.number(), count = ids.len(), "replaced assignments");
        Ok(())
    }

    fn weekly_schedule(&self) -> Result<WeeklySchedule> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT role, weekday, task_id FROM weekly_schedule")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, TaskId>(2)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut grid = WeeklySchedule::empty();
        for (role, day, task_id) in rows {
            if let (Some(role), Ok(day)) = (role_column(&role), Weekday::new(day)) {
                grid.insert(role, day, task_id);
            }
        }
        Ok(grid)
    }
}

impl SubstitutionStore for Storage {
    fn set_substitute(
        &self,
        main_role: Role,
        date: NaiveDate,
        substitute: Option<Role>,
    ) -> Result<()> {
        let main_role = main_role.ensure_operational()?;
        let substitute = substitute.map(Role::ensure_operational).transpose()?;
        let day = date.to_string();

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM daily_substitutes WHERE main_role = ?1 AND date = ?2",
            params![main_role.as_str(), day],
        )?;
        if let Some(sub) = substitute {
            tx.execute(
                "INSERT INTO daily_substitutes (main_role, substitute_role, date)
                 VALUES (?1, ?2, ?3)",
                params![main_role.as_str(), sub.as_str(), day],
            )?;
        }
        tx.commit()?;

        match substitute {
            Some(sub) => info!(main_role = %main_role, substitute = %sub, %date, "set substitute"),
            None => info!(main_role = %main_role, %date, "cleared substitute"),
        }
        Ok(())
    }

    fn substitutes_for_date(&self, date: NaiveDate) -> Result<Vec<Substitution>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT main_role, substitute_role FROM daily_substitutes WHERE date = ?1",
        )?;
        let rows = stmt
            .query_map([date.to_string()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut subs: Vec<Substitution> = rows
            .into_iter()
            .filter_map(|(main, sub)| {
                Some(Substitution {
                    main_role: role_column(&main)?,
                    substitute: role_column(&sub)?,
                    date,
                })
            })
            .collect();
        subs.sort_by_key(|s| s.main_role);
        Ok(subs)
    }
}

impl CompletionTracker for Storage {
    fn mark_complete(&self, task_id: TaskId, date: NaiveDate, completed_by: &str) -> Result<()> {
        let completed_by = require_text("completed_by", completed_by)?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        if !task_exists(&tx, task_id)? {
            return Err(task_not_found(task_id));
        }
        tx.execute(
            "INSERT OR REPLACE INTO completed_tasks (task_id, date, completed_by)
             VALUES (?1, ?2, ?3)",
            params![task_id, date.to_string(), completed_by],
        )?;
        tx.commit()?;

        info!(task_id, %date, completed_by = %completed_by, "marked task complete");
        Ok(())
    }

    fn cancel(&self, task_id: TaskId, date: NaiveDate) -> Result<()> {
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM completed_tasks WHERE task_id = ?1 AND date = ?2",
            params![task_id, date.to_string()],
        )?;
        info!(task_id, %date, removed, "canceled completion");
        Ok(())
    }

    fn list_completed(&self, date: NaiveDate) -> Result<BTreeSet<TaskId>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT task_id FROM completed_tasks WHERE date = ?1")?;
        let ids = stmt
            .query_map([date.to_string()], |row| row.get(0))?
            .collect::<std::result::Result<BTreeSet<TaskId>, _>>()?;
        Ok(ids)
    }

    fn completer_of(&self, task_id: TaskId, date: NaiveDate) -> Result<Option<String>> {
        let conn = self.conn()?;
        let who = conn
            .query_row(
                "SELECT completed_by FROM completed_tasks WHERE task_id = ?1 AND date = ?2",
                params![task_id, date.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(who)
    }

    fn completions_for_date(&self, date: NaiveDate) -> Result<Vec<Completion>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT task_id, completed_by FROM completed_tasks WHERE date = ?1 ORDER BY task_id",
        )?;
        let completions = stmt
            .query_map([date.to_string()], |row| {
                Ok(Completion {
                    task_id: row.get(0)?,
                    date,
                    completed_by: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(completions)
    }
}

impl CareActionLog for Storage {
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

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        if !task_exists(&tx, task_id)? {
            return Err(task_not_found(task_id));
        }
        {
            let mut stmt = tx.prepare(
                "INSERT INTO care_actions (task_id, action, username, date)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for action in &actions {
                stmt.execute(params![task_id, action, username, date.to_string()])?;
            }
        }
        tx.commit()?;

        info!(task_id, count = actions.len(), username = %username, "recorded care actions");
        Ok(actions.len())
    }

    fn actions_for_date(&self, date: NaiveDate) -> Result<Vec<CareAction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, task_id, action, username, date FROM care_actions
             WHERE date = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map([date.to_string()], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, TaskId>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, task_id, action, username, day)| {
                Ok(CareAction {
                    id,
                    task_id,
                    action,
                    username,
                    date: parse_date(&day)?,
                })
            })
            .collect()
    }
}

/// Default data directory: `<data_dir>/zoorota`.
pub fn default_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("zoorota"))
}
