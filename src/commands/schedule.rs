//! `rota schedule` and `rota sub` commands.

use super::{Output, date_or_today, open_rota, task_line, to_json_string};
use crate::Result;
use crate::models::{Board, Role, Substitution, TaskId, Weekday, WeeklySchedule};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
pub struct BoardResult {
    pub weekday_name: &'static str,
    #[serde(flatten)]
    pub board: Board,
}

impl Output for BoardResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "{} (weekday {})",
            self.weekday_name, self.board.weekday
        )];
        for (role, tasks) in self.board.iter() {
            lines.push(format!("\n{} ({})", role, tasks.len()));
            for task in tasks {
                lines.push(format!("  {}", task_line(task)));
            }
        }
        lines.join("\n")
    }
}

/// The board for a weekday, or for the weekday of a date.
pub fn schedule_show(
    data_dir: &Path,
    weekday: Option<i64>,
    date: Option<&str>,
) -> Result<BoardResult> {
    let weekday = match weekday {
        Some(n) => Weekday::new(n)?,
        None => Weekday::from_date(date_or_today(date)?),
    };
    let board = open_rota(data_dir)?.board(weekday)?;
    Ok(BoardResult {
        weekday_name: weekday.name(),
        board,
    })
}

#[derive(Serialize)]
pub struct AssignmentResult {
    pub role: Role,
    pub weekday: Weekday,
    pub task_ids: Vec<TaskId>,
}

impl Output for AssignmentResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        if self.task_ids.is_empty() {
            return format!("Cleared {} on {}", self.role, self.weekday.name());
        }
        let ids: Vec<String> = self.task_ids.iter().map(|id| id.to_string()).collect();
        format!(
            "{} on {}: {}",
            self.role,
            self.weekday.name(),
            ids.join(", ")
        )
    }
}

/// Replace a role's assignments for a weekday.
pub fn schedule_set(
    data_dir: &Path,
    role: &str,
    weekday: i64,
    task_ids: &[TaskId],
) -> Result<AssignmentResult> {
    let role: Role = role.parse()?;
    let weekday = Weekday::new(weekday)?;
    let rota = open_rota(data_dir)?;
    rota.replace_assignments(role, weekday, task_ids)?;

    let board = rota.board(weekday)?;
    Ok(AssignmentResult {
        role,
        weekday,
        task_ids: board.tasks_for(role).iter().map(|t| t.id).collect(),
    })
}

#[derive(Serialize)]
pub struct OverviewResult {
    #[serde(flatten)]
    pub schedule: WeeklySchedule,
}

impl Output for OverviewResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        let header = "Mon | Tue | Wed | Thu | Fri | Sat | Sun";
        let mut lines = vec![format!("{:<30} {}", "Role", header)];
        for (role, days) in self.schedule.iter() {
            let cells: Vec<String> = days
                .values()
                .map(|ids| {
                    if ids.is_empty() {
                        "-".to_string()
                    } else {
                        ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",")
                    }
                })
                .collect();
            lines.push(format!("{:<30} {}", role.as_str(), cells.join(" | ")));
        }
        lines.join("\n")
    }
}

pub fn schedule_overview(data_dir: &Path) -> Result<OverviewResult> {
    let schedule = open_rota(data_dir)?.weekly_schedule()?;
    Ok(OverviewResult { schedule })
}

#[derive(Serialize)]
pub struct SubstituteResult {
    pub main_role: Role,
    pub substitute: Option<Role>,
    pub date: NaiveDate,
}

impl Output for SubstituteResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        match self.substitute {
            Some(sub) => format!("{} covers {} on {}", sub, self.main_role, self.date),
            None => format!("Cleared substitute for {} on {}", self.main_role, self.date),
        }
    }
}

pub fn sub_set(
    data_dir: &Path,
    main_role: &str,
    substitute: &str,
    date: Option<&str>,
) -> Result<SubstituteResult> {
    let main_role: Role = main_role.parse()?;
    let substitute: Role = substitute.parse()?;
    let date = date_or_today(date)?;
    open_rota(data_dir)?.set_substitute(main_role, date, Some(substitute))?;
    Ok(SubstituteResult {
        main_role,
        substitute: Some(substitute),
        date,
    })
}

pub fn sub_clear(data_dir: &Path, main_role: &str, date: Option<&str>) -> Result<SubstituteResult> {
    let main_role: Role = main_role.parse()?;
    let date = date_or_today(date)?;
    open_rota(data_dir)?.set_substitute(main_role, date, None)?;
    Ok(SubstituteResult {
        main_role,
        substitute: None,
        date,
    })
}

#[derive(Serialize)]
pub struct SubstitutionsResult {
    pub date: NaiveDate,
    pub substitutions: Vec<Substitution>,
}

impl Output for SubstitutionsResult {
    fn to_json(&self) -> String {
        to_json_string(self)
    }

    fn to_human(&self) -> String {
        if self.substitutions.is_empty() {
            return format!("No substitutions on {}", self.date);
        }
        self.substitutions
            .iter()
            .map(|s| format!("{} <- {}", s.main_role, s.substitute))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn sub_list(data_dir: &Path, date: Option<&str>) -> Result<SubstitutionsResult> {
    let date = date_or_today(date)?;
    let substitutions = open_rota(data_dir)?.substitutes_for_date(date)?;
    Ok(SubstitutionsResult {
        date,
        substitutions,
    })
}
