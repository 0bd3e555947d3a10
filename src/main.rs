//! Rota CLI - weekly animal-care rota for zoo staff roles.

use clap::Parser;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;
use zoorota::cli::{
    ActionCommands, Cli, Commands, ScheduleCommands, SubCommands, SystemCommands, TaskCommands,
};
use zoorota::commands::{self, Output};
use zoorota::config::{ConfigOverrides, LogFormat, OutputFormat, ResolvedConfig, resolve_config};

fn main() {
    let cli = Cli::parse();

    let mut overrides = ConfigOverrides::new().with_verbose(cli.verbose);
    if let Some(ref path) = cli.config {
        overrides = overrides.with_config_path(path);
    }
    if let Some(ref dir) = cli.data_dir {
        overrides = overrides.with_data_dir(dir);
    }
    if cli.human_readable {
        overrides = overrides.with_output_format(OutputFormat::Human);
    }

    let config = match resolve_config(&overrides) {
        Ok(config) => config,
        Err(e) => exit_with_error(&e, cli.human_readable),
    };
    init_logging(config.log_filter(), config.log_format());

    let human = config.output_format() == OutputFormat::Human;
    if let Err(e) = run_command(cli.command, &config, human) {
        exit_with_error(&e, human);
    }
}

/// Install the stderr log subscriber.
fn init_logging(filter: &str, format: LogFormat) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    // Only fails if a subscriber is already set
    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

fn exit_with_error(e: &zoorota::Error, human: bool) -> ! {
    if human {
        eprintln!("Error: {}", e);
    } else {
        eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
    }
    process::exit(1);
}

fn run_command(
    command: Commands,
    config: &ResolvedConfig,
    human: bool,
) -> Result<(), zoorota::Error> {
    let data_dir: &Path = config.data_dir();

    match command {
        Commands::System { command } => match command {
            SystemCommands::Init { seed } => {
                let seed = seed.as_deref().or(config.seed_file().map(|p| p.as_path()));
                let result = commands::system_init(data_dir, seed)?;
                output(&result, human);
            }
            SystemCommands::Info => {
                let result = commands::system_info(config)?;
                output(&result, human);
            }
        },
        Commands::Roles => {
            output(&commands::roles(), human);
        }
        Commands::Task { command } => match command {
            TaskCommands::List => {
                let result = commands::task_list(data_dir)?;
                output(&result, human);
            }
            TaskCommands::Add { cage, name } => {
                let result = commands::task_add(data_dir, &cage, &name)?;
                output(&result, human);
            }
            TaskCommands::Edit { id, cage, name } => {
                let result = commands::task_edit(data_dir, id, cage.as_deref(), name.as_deref())?;
                output(&result, human);
            }
            TaskCommands::Seed { file } => {
                let result = commands::task_seed(data_dir, &file)?;
                output(&result, human);
            }
        },
        Commands::Schedule { command } => match command {
            ScheduleCommands::Show { weekday, date } => {
                let result = commands::schedule_show(data_dir, weekday, date.as_deref())?;
                output(&result, human);
            }
            ScheduleCommands::Set {
                role,
                weekday,
                task_ids,
            } => {
                let result = commands::schedule_set(data_dir, &role, weekday, &task_ids)?;
                output(&result, human);
            }
            ScheduleCommands::Overview => {
                let result = commands::schedule_overview(data_dir)?;
                output(&result, human);
            }
        },
        Commands::Sub { command } => match command {
            SubCommands::Set {
                main,
                substitute,
                date,
            } => {
                let result = commands::sub_set(data_dir, &main, &substitute, date.as_deref())?;
                output(&result, human);
            }
            SubCommands::Clear { main, date } => {
                let result = commands::sub_clear(data_dir, &main, date.as_deref())?;
                output(&result, human);
            }
            SubCommands::List { date } => {
                let result = commands::sub_list(data_dir, date.as_deref())?;
                output(&result, human);
            }
        },
        Commands::Today {
            role,
            date,
            surface,
        } => {
            let result = commands::today(data_dir, &role, date.as_deref(), surface.into())?;
            output(&result, human);
        }
        Commands::Complete { task_id, by, date } => {
            let result = commands::complete(data_dir, task_id, &by, date.as_deref())?;
            output(&result, human);
        }
        Commands::Cancel { task_id, date } => {
            let result = commands::cancel(data_dir, task_id, date.as_deref())?;
            output(&result, human);
        }
        Commands::Done { date } => {
            let result = commands::done(data_dir, date.as_deref())?;
            output(&result, human);
        }
        Commands::Action { command } => match command {
            ActionCommands::Record {
                task_id,
                by,
                actions,
                date,
            } => {
                let result =
                    commands::action_record(data_dir, task_id, &by, &actions, date.as_deref())?;
                output(&result, human);
            }
            ActionCommands::List { date } => {
                let result = commands::action_list(data_dir, date.as_deref())?;
                output(&result, human);
            }
        },
        Commands::Digest { date } => {
            let result = commands::digest(data_dir, date.as_deref())?;
            output(&result, human);
        }
    }

    Ok(())
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
