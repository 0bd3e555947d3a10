//! Data models for the care rota.
//!
//! This module defines the core data structures:
//! - `Role` - The fixed set of staff roles tasks are assigned to
//! - `Weekday` - ISO weekday (1 = Monday .. 7 = Sunday), the recurrence unit
//! - `Task` - A unit of recurring care work at a cage
//! - `Substitution` - One role covering another role's duties for a day
//! - `Completion` - Who completed a task on a given day
//! - `CareAction` - Individual care actions logged against a task
//! - `Board` / `WeeklySchedule` - Role-to-task views over the schedule

pub mod board;

pub use board::{Board, WeeklySchedule};

use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Stable integer identifier of a task in the catalog.
pub type TaskId = i64;

/// Staff role.
///
/// Declaration order is the canonical iteration order: boards, substitution
/// listings and the resolver's first-match lookup all walk roles in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    KeeperI,
    KeeperII,
    KeeperIII,
    Zootechnician,
    Veterinarian,
    VeterinaryAssistant,
    Entomologist,
    /// Supervisory: sees the unfiltered board
    Admin,
    /// Supervisory: sees the unfiltered board
    Zoologist,
}

impl Role {
    /// Roles that tasks can be scheduled to, in canonical order.
    pub const OPERATIONAL: [Role; 7] = [
        Role::KeeperI,
        Role::KeeperII,
        Role::KeeperIII,
        Role::Zootechnician,
        Role::Veterinarian,
        Role::VeterinaryAssistant,
        Role::Entomologist,
    ];

    /// Every known role, operational first.
    pub const ALL: [Role; 9] = [
        Role::KeeperI,
        Role::KeeperII,
        Role::KeeperIII,
        Role::Zootechnician,
        Role::Veterinarian,
        Role::VeterinaryAssistant,
        Role::Entomologist,
        Role::Admin,
        Role::Zoologist,
    ];

    /// Display string. This is also the persisted identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::KeeperI => "Vivāriju dzīvnieku kopējs I",
            Role::KeeperII => "Vivāriju dzīvnieku kopējs II",
            Role::KeeperIII => "Vivāriju dzīvnieku kopējs III",
            Role::Zootechnician => "Zootehniķis",
            Role::Veterinarian => "Veterinārārsts",
            Role::VeterinaryAssistant => "Veterinārārsta asistents",
            Role::Entomologist => "Entomologs",
            Role::Admin => "Admin",
            Role::Zoologist => "Zoologs",
        }
    }

    /// Short ASCII name accepted on the command line.
    pub fn slug(&self) -> &'static str {
        match self {
            Role::KeeperI => "keeper-1",
            Role::KeeperII => "keeper-2",
            Role::KeeperIII => "keeper-3",
            Role::Zootechnician => "zootechnician",
            Role::Veterinarian => "veterinarian",
            Role::VeterinaryAssistant => "vet-assistant",
            Role::Entomologist => "entomologist",
            Role::Admin => "admin",
            Role::Zoologist => "zoologist",
        }
    }

    /// Whether this role sees the full board instead of a personal list.
    pub fn is_supervisory(&self) -> bool {
        matches!(self, Role::Admin | Role::Zoologist)
    }

    /// Parse a role from its display string or slug.
    ///
    /// Display strings must match exactly (after trimming); slugs are
    /// case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == trimmed || r.slug().eq_ignore_ascii_case(trimmed))
    }

    /// Reject supervisory roles where only schedulable roles make sense.
    pub fn ensure_operational(self) -> Result<Self> {
        if self.is_supervisory() {
            return Err(Error::InvalidInput(format!(
                "role '{}' cannot hold scheduled duties",
                self
            )));
        }
        Ok(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| Error::InvalidInput(format!("unknown role: '{}'", s)))
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Role::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("unknown role: '{}'", s)))
    }
}

/// ISO weekday, 1 = Monday .. 7 = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Weekday(u8);

impl Weekday {
    /// Create a weekday, rejecting anything outside 1..=7.
    pub fn new(day: i64) -> Result<Self> {
        if (1..=7).contains(&day) {
            Ok(Self(day as u8))
        } else {
            Err(Error::InvalidInput(format!(
                "weekday must be 1-7, got {}",
                day
            )))
        }
    }

    /// Weekday of a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.weekday().number_from_monday() as u8)
    }

    /// All seven weekdays, Monday first.
    pub fn all() -> impl Iterator<Item = Weekday> {
        (1..=7).map(Weekday)
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    pub fn name(&self) -> &'static str {
        match self.0 {
            1 => "Monday",
            2 => "Tuesday",
            3 => "Wednesday",
            4 => "Thursday",
            5 => "Friday",
            6 => "Saturday",
            _ => "Sunday",
        }
    }
}

impl TryFrom<u8> for Weekday {
    type Error = Error;

    fn try_from(day: u8) -> Result<Self> {
        Self::new(day.into())
    }
}

impl From<Weekday> for u8 {
    fn from(day: Weekday) -> Self {
        day.0
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unit of recurring care work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable catalog identifier
    pub id: TaskId,

    /// Location label, used for ordering boards
    pub cage: String,

    /// Free-text description (usually the animal)
    pub name: String,
}

impl Task {
    pub fn new(id: TaskId, cage: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            cage: cage.into(),
            name: name.into(),
        }
    }
}

/// A catalog entry as supplied by the seed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Explicit id; defaults to the 1-based position in the seed list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    pub cage: String,
    pub name: String,
}

/// One role's duties covered by another role on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    /// The role whose duties are being covered
    pub main_role: Role,

    /// The role doing the covering
    pub substitute: Role,

    pub date: NaiveDate,
}

/// Record that a task was done on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub task_id: TaskId,
    pub date: NaiveDate,
    /// Person identifier of the last person to mark it complete
    pub completed_by: String,
}

/// A single care action logged against a task (e.g. "fed", "cleaned").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareAction {
    pub id: i64,
    pub task_id: TaskId,
    pub action: String,
    pub username: String,
    pub date: NaiveDate,
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| Error::InvalidInput(format!("invalid date '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_display_and_slug() {
        assert_eq!(Role::parse("Zootehniķis"), Some(Role::Zootechnician));
        assert_eq!(Role::parse("  Veterinārārsts "), Some(Role::Veterinarian));
        assert_eq!(Role::parse("VET-ASSISTANT"), Some(Role::VeterinaryAssistant));
        assert_eq!(Role::parse("keeper-3"), Some(Role::KeeperIII));
        assert_eq!(Role::parse("Zoologs"), Some(Role::Zoologist));
        assert_eq!(Role::parse("Janitor"), None);
    }

    #[test]
    fn test_role_from_str_unknown_is_invalid_input() {
        let err = "Janitor".parse::<Role>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_role_order_is_declaration_order() {
        let mut shuffled = vec![Role::Entomologist, Role::KeeperI, Role::Veterinarian];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Role::KeeperI, Role::Veterinarian, Role::Entomologist]
        );
        assert!(Role::OPERATIONAL.iter().all(|r| !r.is_supervisory()));
    }

    #[test]
    fn test_ensure_operational() {
        assert!(Role::Entomologist.ensure_operational().is_ok());
        assert!(matches!(
            Role::Admin.ensure_operational(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_role_serializes_as_display_string() {
        let json = serde_json::to_string(&Role::Veterinarian).unwrap();
        assert_eq!(json, "\"Veterinārārsts\"");
        let back: Role = serde_json::from_str("\"veterinarian\"").unwrap();
        assert_eq!(back, Role::Veterinarian);
        assert!(serde_json::from_str::<Role>("\"Nobody\"").is_err());
    }

    #[test]
    fn test_weekday_bounds() {
        assert!(Weekday::new(1).is_ok());
        assert!(Weekday::new(7).is_ok());
        assert!(matches!(Weekday::new(0), Err(Error::InvalidInput(_))));
        assert!(matches!(Weekday::new(8), Err(Error::InvalidInput(_))));
        let err = Weekday::new(300).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: weekday must be 1-7, got 300");
        assert!(serde_json::from_str::<Weekday>("9").is_err());
    }

    #[test]
    fn test_weekday_from_date_is_monday_first() {
        // 2024-01-01 was a Monday, 2024-01-07 a Sunday
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(Weekday::from_date(monday).number(), 1);
        assert_eq!(Weekday::from_date(sunday).number(), 7);
        assert_eq!(Weekday::from_date(sunday).name(), "Sunday");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-06").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()
        );
        assert!(matches!(parse_date("06.03.2024"), Err(Error::InvalidInput(_))));
    }
}
