//! CLI argument definitions for the rota.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::resolver::Surface;

/// Zoorota - weekly animal-care rota for zoo staff roles.
///
/// Start with `rota system init`, plan the week with `rota schedule set`,
/// then ask `rota today --role <role>` what needs doing.
#[derive(Parser, Debug)]
#[command(name = "rota")]
#[command(
    author,
    version,
    about = "Weekly animal-care rota with daily substitutions",
    long_about = None
)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Directory holding rota.db (overrides ROTA_DATA_DIR and config.toml)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Path to config.toml
    #[arg(long, global = true, env = "ROTA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// System administration commands
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },

    /// List every role with its CLI name
    Roles,

    /// Task catalog commands
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Weekly schedule commands
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommands,
    },

    /// Daily substitution commands
    Sub {
        #[command(subcommand)]
        command: SubCommands,
    },

    /// Show what a role has to do on a date
    Today {
        /// Role display name or CLI name (e.g. zootechnician)
        #[arg(short, long)]
        role: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,

        /// Delivery surface shaping supervisory views
        #[arg(long, value_enum, default_value_t = SurfaceArg::Desktop)]
        surface: SurfaceArg,
    },

    /// Mark a task done for a date
    Complete {
        /// Task ID
        task_id: i64,

        /// Who completed it
        #[arg(long)]
        by: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Withdraw a completion
    Cancel {
        /// Task ID
        task_id: i64,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List completions for a date
    Done {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Care action log commands
    Action {
        #[command(subcommand)]
        command: ActionCommands,
    },

    /// Completion statistics for a date
    Digest {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
}

/// System subcommands
#[derive(Subcommand, Debug)]
pub enum SystemCommands {
    /// Create the database (and seed the task catalog)
    Init {
        /// JSON seed file; falls back to `seed_file` in config.toml
        #[arg(long)]
        seed: Option<PathBuf>,
    },

    /// Show storage location, counts, config sources and build info
    Info,
}

/// Task catalog subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List all tasks ordered by cage
    List,

    /// Add a task
    Add {
        /// Cage label
        cage: String,

        /// Animal or task name
        name: String,
    },

    /// Edit a task
    Edit {
        /// Task ID
        id: i64,

        /// New cage label
        #[arg(long)]
        cage: Option<String>,

        /// New name
        #[arg(long)]
        name: Option<String>,
    },

    /// Seed an empty catalog from a JSON file
    Seed {
        /// JSON seed file
        file: PathBuf,
    },
}

/// Weekly schedule subcommands
#[derive(Subcommand, Debug)]
pub enum ScheduleCommands {
    /// Show the board for a weekday
    Show {
        /// Weekday number (1 = Monday .. 7 = Sunday)
        #[arg(short, long, conflicts_with = "date", allow_negative_numbers = true)]
        weekday: Option<i64>,

        /// Show the weekday of this date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Replace a role's tasks for a weekday (no ids clears it)
    Set {
        /// Role display name or CLI name
        role: String,

        /// Weekday number (1 = Monday .. 7 = Sunday)
        #[arg(allow_negative_numbers = true)]
        weekday: i64,

        /// Task IDs
        task_ids: Vec<i64>,
    },

    /// Task IDs per role per weekday
    Overview,
}

/// Substitution subcommands
#[derive(Subcommand, Debug)]
pub enum SubCommands {
    /// Have one role cover another's duties for a day
    Set {
        /// Role being covered
        main: String,

        /// Covering role
        substitute: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Remove the substitute for a role
    Clear {
        /// Role being covered
        main: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List substitutions for a date
    List {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
}

/// Care action subcommands
#[derive(Subcommand, Debug)]
pub enum ActionCommands {
    /// Record care actions performed on a task
    Record {
        /// Task ID
        task_id: i64,

        /// Who performed them
        #[arg(long)]
        by: String,

        /// Actions, e.g. fed cleaned
        #[arg(required = true)]
        actions: Vec<String>,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List care actions for a date
    List {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SurfaceArg {
    #[default]
    Desktop,
    Mobile,
}

impl From<SurfaceArg> for Surface {
    fn from(arg: SurfaceArg) -> Self {
        match arg {
            SurfaceArg::Desktop => Surface::Desktop,
            SurfaceArg::Mobile => Surface::Mobile,
        }
    }
}
