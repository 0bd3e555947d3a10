//! Role-to-task views over the weekly schedule.

use super::{Role, Task, TaskId, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

/// The full mapping from role to its scheduled tasks for one weekday.
///
/// Every operational role is present, possibly with an empty list. Each list
/// is ordered by cage label, ties broken by task id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub weekday: Weekday,
    roles: BTreeMap<Role, Vec<Task>>,
}

impl Board {
    /// A board with every operational role and no tasks.
    pub fn empty(weekday: Weekday) -> Self {
        Self {
            weekday,
            roles: Role::OPERATIONAL.into_iter().map(|r| (r, Vec::new())).collect(),
        }
    }

    /// Build a board from unordered (role, task) rows.
    ///
    /// Rows for supervisory roles are dropped; they never hold duties.
    pub fn from_rows(weekday: Weekday, rows: impl IntoIterator<Item = (Role, Task)>) -> Self {
        let mut board = Self::empty(weekday);
        for (role, task) in rows {
            if let Some(tasks) = board.roles.get_mut(&role) {
                tasks.push(task);
            }
        }
        for tasks in board.roles.values_mut() {
            tasks.sort_by(|a, b| a.cage.cmp(&b.cage).then(a.id.cmp(&b.id)));
        }
        board
    }

    /// Tasks assigned to `role`; empty for supervisory roles.
    pub fn tasks_for(&self, role: Role) -> &[Task] {
        self.roles.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate roles in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &[Task])> {
        self.roles.iter().map(|(r, t)| (*r, t.as_slice()))
    }

    /// First board entry with the given id, scanning roles in canonical order.
    pub fn find_task(&self, id: TaskId) -> Option<&Task> {
        self.roles.values().flatten().find(|t| t.id == id)
    }

    /// Number of (role, task) assignments on this board.
    pub fn assignment_count(&self) -> usize {
        self.roles.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.assignment_count() == 0
    }

    /// Every assignment flattened in canonical role order.
    pub fn flatten(&self) -> Vec<Task> {
        self.roles.values().flatten().cloned().collect()
    }
}

/// The admin planning grid: task ids per role per weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeeklySchedule {
    roles: BTreeMap<Role, BTreeMap<u8, Vec<TaskId>>>,
}

impl WeeklySchedule {
    /// A grid with every operational role and all seven days empty.
    pub fn empty() -> Self {
        let roles: BTreeMap<Role, BTreeMap<u8, Vec<TaskId>>> = Role::OPERATIONAL
            .into_iter()
            .map(|r| (r, Weekday::all().map(|d| (d.number(), Vec::new())).collect()))
            .collect();
        Self { roles }
    }

    /// Add an assignment; ids within a day are kept sorted and unique.
    pub fn insert(&mut self, role: Role, weekday: Weekday, task_id: TaskId) {
        if let Some(days) = self.roles.get_mut(&role) {
            let ids = days.entry(weekday.number()).or_default();
            if let Err(pos) = ids.binary_search(&task_id) {
                ids.insert(pos, task_id);
            }
        }
    }

    pub fn task_ids(&self, role: Role, weekday: Weekday) -> &[TaskId] {
        self.roles
            .get(&role)
            .and_then(|days| days.get(&weekday.number()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &BTreeMap<u8, Vec<TaskId>>)> {
        self.roles.iter().map(|(r, d)| (*r, d))
    }
}
