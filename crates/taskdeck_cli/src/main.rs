//! `taskdeck` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, resolve configuration and start logging.
//! - Open the SQLite-backed key-value store and hand an `AppState` to the
//!   command dispatcher.

mod commands;
mod render;

use chrono::NaiveDate;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use taskdeck_core::db::open_db;
use taskdeck_core::{
    init_from_config, AppState, ConfigInput, CoreConfig, DefaultView, Priority,
    SqliteKvRepository, Theme,
};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "Local task manager with categories and a dashboard")]
#[command(version)]
struct Cli {
    /// Database file (default `taskdeck.sqlite3` in the working directory).
    #[arg(long, global = true, env = "TASKDECK_DB")]
    db: Option<PathBuf>,
    /// Log level: trace|debug|info|warn|error.
    #[arg(long, global = true, env = "TASKDECK_LOG_LEVEL")]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; no logs are written without it.
    #[arg(long, global = true, env = "TASKDECK_LOG_DIR")]
    log_dir: Option<String>,
    /// Turn file logging on or off (true|false).
    #[arg(
        long,
        global = true,
        env = "TASKDECK_LOGGING",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    logging: Option<bool>,
    /// Print JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },
    /// Counts and completion rate.
    Stats,
    Dashboard,
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Task { command } => match command {
                TaskCommand::Add(_) => "task_add",
                TaskCommand::Edit(_) => "task_edit",
                TaskCommand::Done { .. } => "task_done",
                TaskCommand::Delete { .. } => "task_delete",
                TaskCommand::Show { .. } => "task_show",
                TaskCommand::List(_) => "task_list",
            },
            Self::Category { command } => match command {
                CategoryCommand::Add { .. } => "category_add",
                CategoryCommand::Edit { .. } => "category_edit",
                CategoryCommand::Delete { .. } => "category_delete",
                CategoryCommand::List => "category_list",
                CategoryCommand::Colors => "category_colors",
            },
            Self::Stats => "stats",
            Self::Dashboard => "dashboard",
            Self::Settings { .. } => "settings",
        }
    }
}

#[derive(Subcommand)]
enum TaskCommand {
    Add(TaskAddArgs),
    Edit(TaskEditArgs),
    /// Toggle completion.
    Done { id: Uuid },
    Delete { id: Uuid },
    Show { id: Uuid },
    List(TaskListArgs),
}

#[derive(Args)]
struct TaskAddArgs {
    title: String,
    #[arg(short, long, default_value = "")]
    description: String,
    #[arg(short, long, value_enum, default_value_t = PriorityArg::Medium)]
    priority: PriorityArg,
    /// Due date, YYYY-MM-DD.
    #[arg(long)]
    due: Option<NaiveDate>,
    #[arg(short, long)]
    category: Option<Uuid>,
}

#[derive(Args)]
struct TaskEditArgs {
    id: Uuid,
    #[arg(long)]
    title: Option<String>,
    #[arg(short, long)]
    description: Option<String>,
    #[arg(short, long, value_enum)]
    priority: Option<PriorityArg>,
    #[arg(long, conflicts_with = "clear_due")]
    due: Option<NaiveDate>,
    #[arg(long)]
    clear_due: bool,
    #[arg(short, long, conflicts_with = "clear_category")]
    category: Option<Uuid>,
    #[arg(long)]
    clear_category: bool,
}

#[derive(Args)]
struct TaskListArgs {
    #[arg(long, value_enum, default_value_t = StatusArg::All)]
    status: StatusArg,
    /// Case-insensitive text matched against title or description.
    #[arg(short, long, default_value = "")]
    query: String,
    #[arg(short, long)]
    category: Option<Uuid>,
    #[arg(short, long, value_enum)]
    priority: Option<PriorityArg>,
}

#[derive(Subcommand)]
enum CategoryCommand {
    Add {
        name: String,
        /// `#RRGGBB`; a palette color is picked when omitted.
        #[arg(long)]
        color: Option<String>,
    },
    Edit {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a category and detach it from its tasks.
    Delete { id: Uuid },
    List,
    /// Show the default color palette.
    Colors,
}

#[derive(Subcommand)]
enum SettingsCommand {
    Show,
    Set {
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,
        #[arg(long, value_enum)]
        default_view: Option<ViewArg>,
        #[arg(long)]
        notifications: Option<bool>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StatusArg {
    All,
    Pending,
    Completed,
    Overdue,
    Today,
    Soon,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ViewArg {
    Dashboard,
    All,
    Completed,
}

impl From<ViewArg> for DefaultView {
    fn from(value: ViewArg) -> Self {
        match value {
            ViewArg::Dashboard => DefaultView::Dashboard,
            ViewArg::All => DefaultView::All,
            ViewArg::Completed => DefaultView::Completed,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> commands::CliResult<()> {
    let config = CoreConfig::resolve(ConfigInput {
        db_path: cli.db,
        log_level: cli.log_level,
        log_dir: cli.log_dir,
        logging_enabled: cli.logging,
    })?;

    // Logging is optional for a CLI session; keep going without it.
    if let Err(err) = init_from_config(&config) {
        eprintln!("warning: logging disabled: {err}");
    }

    let command_name = cli.command.name();
    info!("event=cli_command module=cli status=start command={command_name}");

    let conn = open_db(&config.db_path)?;
    let mut state = AppState::load(SqliteKvRepository::new(&conn));
    let result = commands::dispatch(&mut state, cli.command, cli.json);
    match &result {
        Ok(()) => info!("event=cli_command module=cli status=ok command={command_name}"),
        Err(err) => error!(
            "event=cli_command module=cli status=error command={command_name} error={err}"
        ),
    }
    result
}
