//! Daily resolver: what each role has to do on a given date.
//!
//! Combines the weekly board for the date's weekday with that date's
//! substitutions. Supervisory roles get the whole board; everyone else gets a
//! deduplicated personal list plus a label describing the substitutions that
//! shaped it.
//!
//! For an operational role `R` the personal list is the union of, in order:
//! 1. the boards of every role `R` is covering today,
//! 2. the board of the role covering `R` today, if any,
//! 3. `R`'s own board, unless `R` is recorded as covering itself.
//!
//! Step 2 adds the substitute's duties to `R`'s view; `R`'s own stay visible.
//! Substitutions are not transitive: covering a role does not pull in the
//! roles that role is covering.

use crate::Result;
use crate::models::{Board, Role, Substitution, Task, TaskId, Weekday};
use crate::storage::{ScheduleStore, SubstitutionStore};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Prefix of each substitution label segment ("covers: ...").
pub const SUBSTITUTE_PREFIX: &str = "Aizvieto: ";

/// Separator between label segments.
pub const LABEL_SEPARATOR: &str = " | ";

/// Label used when a supervisory board is flattened into a task list.
pub const ADMIN_LABEL: &str = "Admin";

/// Who covers whom on one date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionIndex {
    /// substitute → main roles it is covering
    covers_for: BTreeMap<Role, Vec<Role>>,
    /// main role → its substitute
    covered_by: BTreeMap<Role, Role>,
}

impl SubstitutionIndex {
    pub fn build(subs: &[Substitution]) -> Self {
        let mut index = Self::default();
        for sub in subs {
            index
                .covers_for
                .entry(sub.substitute)
                .or_default()
                .push(sub.main_role);
            index.covered_by.insert(sub.main_role, sub.substitute);
        }
        index
    }

    /// Roles whose duties `role` is covering.
    pub fn covers_for(&self, role: Role) -> &[Role] {
        self.covers_for.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The role covering `role`, if any.
    pub fn covered_by(&self, role: Role) -> Option<Role> {
        self.covered_by.get(&role).copied()
    }
}

/// The unfiltered board as seen by supervisory roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminBoard {
    pub date: NaiveDate,
    pub board: Board,
    /// Covering role per main role, for display next to each role's list
    pub substitutes: BTreeMap<Role, Role>,
}

/// One role's tasks for a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskList {
    pub role: Role,
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
    pub substitute_label: String,
}

/// Result of resolving a role's day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Resolution {
    Admin(AdminBoard),
    Personal(TaskList),
}

impl Resolution {
    /// Collapse to a single task list.
    ///
    /// Supervisory boards flatten every role's tasks in canonical order,
    /// labeled [`ADMIN_LABEL`]. Used by the mobile surface.
    pub fn into_task_list(self, viewer: Role) -> TaskList {
        match self {
            Resolution::Personal(list) => list,
            Resolution::Admin(admin) => TaskList {
                role: viewer,
                date: admin.date,
                tasks: admin.board.flatten(),
                substitute_label: ADMIN_LABEL.to_string(),
            },
        }
    }
}

/// Delivery surface asking for a resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// Per-role board for supervisors, personal list otherwise
    #[default]
    Desktop,
    /// Always a flat task list
    Mobile,
}

/// Resolves daily duties from the schedule and substitution stores.
pub struct DailyResolver<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> DailyResolver<'a, S>
where
    S: ScheduleStore + SubstitutionStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Resolve `viewer`'s duties on `date`.
    pub fn resolve(&self, viewer: Role, date: NaiveDate) -> Result<Resolution> {
        let weekday = Weekday::from_date(date);
        let board = self.store.board(weekday)?;
        let subs = self.store.substitutes_for_date(date)?;
        let index = SubstitutionIndex::build(&subs);

        if viewer.is_supervisory() {
            debug!(role = %viewer, %date, "resolved admin board");
            return Ok(Resolution::Admin(AdminBoard {
                date,
                board,
                substitutes: index.covered_by,
            }));
        }

        let (tasks, substitute_label) = personal_tasks(viewer, &board, &index);
        debug!(
            role = %viewer,
            %date,
            tasks = tasks.len(),
            label = %substitute_label,
            "resolved personal tasks"
        );
        Ok(Resolution::Personal(TaskList {
            role: viewer,
            date,
            tasks,
            substitute_label,
        }))
    }

    /// Resolve using a role name as supplied by the caller.
    ///
    /// Unknown role names fail with `InvalidInput`.
    pub fn resolve_named(&self, role: &str, date: NaiveDate) -> Result<Resolution> {
        self.resolve(role.parse()?, date)
    }

    /// Resolve for a specific delivery surface.
    pub fn resolve_for(
        &self,
        viewer: Role,
        date: NaiveDate,
        surface: Surface,
    ) -> Result<Resolution> {
        let resolution = self.resolve(viewer, date)?;
        Ok(match surface {
            Surface::Desktop => resolution,
            Surface::Mobile => Resolution::Personal(resolution.into_task_list(viewer)),
        })
    }

    /// The full board for a date, as supervisors see it.
    pub fn full_board(&self, date: NaiveDate) -> Result<Board> {
        self.store.board(Weekday::from_date(date))
    }
}

/// Build a role's personal list and label from the day's board and substitutions.
pub fn personal_tasks(role: Role, board: &Board, index: &SubstitutionIndex) -> (Vec<Task>, String) {
    let mut ids: Vec<TaskId> = Vec::new();
    let mut seen = HashSet::new();
    let mut add = |tasks: &[Task]| {
        for task in tasks {
            if seen.insert(task.id) {
                ids.push(task.id);
            }
        }
    };
    let mut labels = Vec::new();

    let i_replace = index.covers_for(role);
    if !i_replace.is_empty() {
        labels.push(label(i_replace));
        for covered in i_replace {
            add(board.tasks_for(*covered));
        }
    }

    let replaces_me: Vec<Role> = index.covered_by(role).into_iter().collect();
    if !replaces_me.is_empty() {
        labels.push(label(&replaces_me));
        for substitute in &replaces_me {
            add(board.tasks_for(*substitute));
        }
    }

    if !replaces_me.contains(&role) {
        add(board.tasks_for(role));
    }

    let tasks = ids
        .into_iter()
        .filter_map(|id| board.find_task(id).cloned())
        .collect();
    (tasks, labels.join(LABEL_SEPARATOR))
}

fn label(roles: &[Role]) -> String {
    let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
    format!("{}{}", SUBSTITUTE_PREFIX, names.join(", "))
}
