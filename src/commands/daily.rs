//! Day-to-day commands: today's view, completions, care actions, digest.

use super::{Output, date_or_today, open_rota, task_line, to_json_string};
use crate::Result;
use crate::digest::DailyDigest;
use crate::models::{CareAction, Completion, Role, Task, TaskId};
use crate::resolver::{Resolution, Surface};
use crate::storage::CompletionTracker;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Serialize)]
pub struct TodayResult {
    #[serde(flatten)]
    pub resolution: Resolution,
    /// Ids of the day's completed tasks
    pub completed: BTreeSet<TaskId>,
}

impl TodayResult {
    fn line(&self, task: &Task) -> String {
        let mark = if self.completed.contains(&task.id) { "x" } else { " " };
        format!("[{}] {}", mark, task_line(task))
    }
}

impl Output for TodayResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        match &self.resolution {
            Resolution::Personal(list) => {
                lines.push(format!("{} - {}", list.role, list.date));
                if !list.substitute_label.is_empty() {
                    lines.push(list.substitute_label.clone());
                }
                if list.tasks.is_empty() {
                    lines.push("Nothing scheduled.".to_string());
                }
                lines.extend(list.tasks.iter().map(|t| self.line(t)));
            }
            Resolution::Admin(admin) => {
                lines.push(format!("All roles - {}", admin.date));
                for (role, tasks) in admin.board.iter() {
                    match admin.substitutes.get(&role) {
                        Some(sub) => lines.push(format!("\n{} (covered by {})", role, sub)),
                        None => lines.push(format!("\n{}", role)),
                    }
                    lines.extend(tasks.iter().map(|t| format!("  {}", self.line(t))));
                }
            }
        }
        lines.join("\n")
    }
}

/// Resolve what `role` has to do on `date`.
pub fn today(
    data_dir: &Path,
    role: &str,
    date: Option<&str>,
    surface: Surface,
) -> Result<TodayResult> {
    let role: Role = role.parse()?;
    let date = date_or_today(date)?;
    let rota = open_rota(data_dir)?;
    let resolution = rota.today(role, date, surface)?;
    let completed = rota
        .completions_for_date(date)?
        .into_iter()
        .map(|c| c.task_id)
        .collect();
    Ok(TodayResult {
        resolution,
        completed,
    })
}

#[derive(Serialize)]
pub struct CompletionResult {
    pub task_id: TaskId,
    pub date: NaiveDate,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<String>,
}

impl Output for CompletionResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        match self.completed_by {
            Some(ref who) => format!("Task {} done on {} by {}", self.task_id, self.date, who),
            None => format!("Task {} not done on {}", self.task_id, self.date),
        }
    }
}

pub fn complete(
    data_dir: &Path,
    task_id: TaskId,
    by: &str,
    date: Option<&str>,
) -> Result<CompletionResult> {
    let date = date_or_today(date)?;
    let rota = open_rota(data_dir)?;
    rota.mark_complete(task_id, date, by)?;
    Ok(CompletionResult {
        task_id,
        date,
        completed: true,
        completed_by: rota.store().completer_of(task_id, date)?,
    })
}

pub fn cancel(data_dir: &Path, task_id: TaskId, date: Option<&str>) -> Result<CompletionResult> {
    let date = date_or_today(date)?;
    open_rota(data_dir)?.cancel(task_id, date)?;
    Ok(CompletionResult {
        task_id,
        date,
        completed: false,
        completed_by: None,
    })
}

#[derive(Serialize)]
pub struct CompletionsResult {
    pub date: NaiveDate,
    pub completions: Vec<Completion>,
}

impl Output for CompletionsResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        if self.completions.is_empty() {
            return format!("Nothing completed on {}", self.date);
        }
        self.completions
            .iter()
            .map(|c| format!("Task {} by {}", c.task_id, c.completed_by))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn done(data_dir: &Path, date: Option<&str>) -> Result<CompletionsResult> {
    let date = date_or_today(date)?;
    let completions = open_rota(data_dir)?.completions_for_date(date)?;
    Ok(CompletionsResult { date, completions })
}

#[derive(Serialize)]
pub struct RecordedActions {
    pub task_id: TaskId,
    pub date: NaiveDate,
    pub recorded: usize,
}

impl Output for RecordedActions {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Recorded {} action(s) for task {} on {}",
            self.recorded, self.task_id, self.date
        )
    }
}

pub fn action_record(
    data_dir: &Path,
    task_id: TaskId,
    by: &str,
    actions: &[String],
    date: Option<&str>,
) -> Result<RecordedActions> {
    let date = date_or_today(date)?;
    let recorded = open_rota(data_dir)?.record_actions(task_id, actions, by, date)?;
    Ok(RecordedActions {
        task_id,
        date,
        recorded,
    })
}

#[derive(Serialize)]
pub struct ActionsResult {
    pub date: NaiveDate,
    pub actions: Vec<CareAction>,
}

impl Output for ActionsResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        if self.actions.is_empty() {
            return format!("No care actions on {}", self.date);
        }
        self.actions
            .iter()
            .map(|a| format!("Task {}: {} ({})", a.task_id, a.action, a.username))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn action_list(data_dir: &Path, date: Option<&str>) -> Result<ActionsResult> {
    let date = date_or_today(date)?;
    let actions = open_rota(data_dir)?.actions_for_date(date)?;
    Ok(ActionsResult { date, actions })
}

#[derive(Serialize)]
pub struct DigestResult {
    #[serde(flatten)]
    pub digest: DailyDigest,
}

impl Output for DigestResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        let d = &self.digest;
        let mut lines = vec![
            format!("Daily digest - {}", d.date),
            format!(
                "Total: {} | Done: {} | Pending: {} | {}%",
                d.total,
                d.done,
                d.total - d.done,
                d.rate
            ),
        ];
        if d.roles.is_empty() {
            lines.push("No tasks scheduled today.".to_string());
        }
        for group in &d.roles {
            lines.push(format!(
                "\n{} ({} | {})",
                group.role,
                group.completed.len(),
                group.pending.len()
            ));
            for c in &group.completed {
                lines.push(format!("  [x] {} - {}", task_line(&c.task), c.completed_by));
            }
            for t in &group.pending {
                lines.push(format!("  [ ] {}", task_line(t)));
            }
        }
        lines.join("\n")
    }
}

pub fn digest(data_dir: &Path, date: Option<&str>) -> Result<DigestResult> {
    let date = date_or_today(date)?;
    let digest = open_rota(data_dir)?.digest(date)?;
    Ok(DigestResult { digest })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::commands::{schedule_set, sub_set};
    use crate::test_utils::{TestEnv, sample_tasks};

    const WED: Option<&str> = Some("2024-03-06");

    fn setup() -> TestEnv {
        let env = TestEnv::new();
        env.init_storage_with(&sample_tasks());
        schedule_set(env.data_path(), "zootechnician", 3, &[2, 5]).unwrap();
        schedule_set(env.data_path(), "veterinarian", 3, &[1, 3]).unwrap();
        env
    }

    #[test]
    fn test_today_personal_with_substitution() {
        let env = setup();
        sub_set(env.data_path(), "veterinarian", "zootechnician", WED).unwrap();
        complete(env.data_path(), 3, "alice", WED).unwrap();

        let result = today(env.data_path(), "Zootehniķis", WED, Surface::Desktop).unwrap();
        let json: serde_json::Value = serde_json::from_str(&result.to_json()).unwrap();
        assert_eq!(json["view"], "personal");
        assert_eq!(json["substitute_label"], "Aizvieto: Veterinārārsts");
        let ids: Vec<i64> = json["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 3, 5, 2]);
        assert_eq!(json["completed"], serde_json::json!([3]));
        assert!(result.to_human().contains("[x] [3] D4 - Python"));
    }

    #[test]
    fn test_today_admin_on_mobile_is_flat() {
        let env = setup();
        let result = today(env.data_path(), "admin", WED, Surface::Mobile).unwrap();
        let json: serde_json::Value = serde_json::from_str(&result.to_json()).unwrap();
        assert_eq!(json["view"], "personal");
        assert_eq!(json["substitute_label"], "Admin");
        assert_eq!(json["tasks"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_today_unknown_role() {
        let env = setup();
        assert!(matches!(
            today(env.data_path(), "janitor", WED, Surface::Desktop),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_complete_cancel_done() {
        let env = setup();
        complete(env.data_path(), 5, "alice", WED).unwrap();
        let second = complete(env.data_path(), 5, "bob", WED).unwrap();
        assert_eq!(second.completed_by.as_deref(), Some("bob"));

        let listed = done(env.data_path(), WED).unwrap();
        assert_eq!(listed.completions.len(), 1);

        cancel(env.data_path(), 5, WED).unwrap();
        cancel(env.data_path(), 5, WED).unwrap();
        assert!(done(env.data_path(), WED).unwrap().completions.is_empty());

        assert!(matches!(
            complete(env.data_path(), 99, "alice", WED),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_action_record_and_list() {
        let env = setup();
        let actions = vec!["fed".to_string(), " ".to_string(), "cleaned".to_string()];
        let recorded = action_record(env.data_path(), 2, "alice", &actions, WED).unwrap();
        assert_eq!(recorded.recorded, 2);

        let listed = action_list(env.data_path(), WED).unwrap();
        let names: Vec<&str> = listed.actions.iter().map(|a| a.action.as_str()).collect();
        assert_eq!(names, vec!["fed", "cleaned"]);
    }

    #[test]
    fn test_digest_command() {
        let env = setup();
        complete(env.data_path(), 1, "carol", WED).unwrap();
        let result = digest(env.data_path(), WED).unwrap();
        assert_eq!(result.digest.rate, 25);
        let human = result.to_human();
        assert!(human.contains("Total: 4 | Done: 1 | Pending: 3 | 25%"));
        assert!(human.contains("[x] [1] C1 - Iguana - carol"));
    }
}
