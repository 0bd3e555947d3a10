//! `rota roles` and `rota task` commands.

use super::{Output, open_rota, task_line, to_json_string};
use crate::catalog;
use crate::models::{Role, Task, TaskId};
use crate::{Error, Result};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
pub struct RoleInfo {
    pub name: &'static str,
    pub slug: &'static str,
    pub supervisory: bool,
}

#[derive(Serialize)]
pub struct RolesResult {
    pub roles: Vec<RoleInfo>,
}

impl Output for RolesResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        self.roles
            .iter()
            .map(|r| {
                let marker = if r.supervisory { " (supervisory)" } else { "" };
                format!("{:<15} {}{}", r.slug, r.name, marker)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Every role in canonical order. Needs no storage.
pub fn roles() -> RolesResult {
    RolesResult {
        roles: Role::ALL
            .into_iter()
            .map(|r| RoleInfo {
                name: r.as_str(),
                slug: r.slug(),
                supervisory: r.is_supervisory(),
            })
            .collect(),
    }
}

#[derive(Serialize)]
pub struct TasksResult {
    pub tasks: Vec<Task>,
    pub count: usize,
}

impl Output for TasksResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        if self.tasks.is_empty() {
            return "No tasks in the catalog.".to_string();
        }
        let mut lines: Vec<String> = self.tasks.iter().map(task_line).collect();
        lines.push(format!("{} task(s)", self.count));
        lines.join("\n")
    }
}

pub fn task_list(data_dir: &Path) -> Result<TasksResult> {
    let tasks = open_rota(data_dir)?.list_tasks()?;
    Ok(TasksResult {
        count: tasks.len(),
        tasks,
    })
}

#[derive(Serialize)]
pub struct TaskResult {
    #[serde(flatten)]
    pub task: Task,
}

impl Output for TaskResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        task_line(&self.task)
    }
}

pub fn task_add(data_dir: &Path, cage: &str, name: &str) -> Result<TaskResult> {
    let task = open_rota(data_dir)?.add_task(cage, name)?;
    Ok(TaskResult { task })
}

pub fn task_edit(
    data_dir: &Path,
    id: TaskId,
    cage: Option<&str>,
    name: Option<&str>,
) -> Result<TaskResult> {
    if cage.is_none() && name.is_none() {
        return Err(Error::InvalidInput(
            "nothing to change: pass --cage and/or --name".to_string(),
        ));
    }
    let task = open_rota(data_dir)?.update_task(id, cage, name)?;
    Ok(TaskResult { task })
}

#[derive(Serialize)]
pub struct SeedResult {
    pub seeded: usize,
}

impl Output for SeedResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        if self.seeded == 0 {
            "Catalog already has tasks; nothing seeded.".to_string()
        } else {
            format!("Seeded {} task(s)", self.seeded)
        }
    }
}

pub fn task_seed(data_dir: &Path, file: &Path) -> Result<SeedResult> {
    let rota = open_rota(data_dir)?;
    let seeded = catalog::seed_from_file(rota.store(), file)?;
    Ok(SeedResult { seeded })
}
