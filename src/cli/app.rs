//! Main CLI application structure

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{add, focus, habit, logging, note, reflect, task, today};
use crate::domain::EntryKind;
use crate::storage::{Config, Workspace};

#[derive(Parser)]
#[command(name = "daybook")]
#[command(author, version, about = "Local-first notes, tasks and habits with quick-add parsing")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long, global = true, env = "DAYBOOK_TODAY", hide = true)]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new daybook workspace
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Quick-add a task or note from free text
    ///
    /// Examples:
    ///   daybook add buy milk tomorrow !!
    ///   daybook add "note: idea for the garden #home"
    ///   daybook add call mom 15/3 urgent
    Add {
        /// Text to parse
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Force the entry type (note or task)
        #[arg(long = "as", value_name = "TYPE")]
        as_kind: Option<EntryKind>,

        /// Show what would be created without saving
        #[arg(long)]
        preview: bool,
    },

    /// Parse quick-add text and print the result
    Parse {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Manage tasks
    #[command(subcommand)]
    Task(task::TaskCommands),

    /// Manage notes
    #[command(subcommand)]
    Note(note::NoteCommands),

    /// Track habits
    #[command(subcommand)]
    Habit(habit::HabitCommands),

    /// Weekly reflections
    #[command(subcommand)]
    Reflect(reflect::ReflectCommands),

    /// Pomodoro focus sessions
    #[command(subcommand)]
    Focus(focus::FocusCommands),

    /// Show today's agenda, habits and daily note
    Today,

    /// List tasks due today that have not been reminded recently
    Remind,
}

/// The moment commands treat as "now"
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    pub today: NaiveDate,
    pub now: NaiveDateTime,
}

impl Clock {
    /// Local time, with the date replaced by `today` when given
    pub fn new(today: Option<NaiveDate>) -> Self {
        let local = Local::now().naive_local();
        match today {
            Some(date) => Self {
                today: date,
                now: date.and_time(local.time()),
            },
            None => Self {
                today: local.date(),
                now: local,
            },
        }
    }

    /// `now` as a UTC instant
    pub fn now_utc(&self) -> DateTime<Utc> {
        self.now
            .and_local_timezone(Local)
            .earliest()
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(Utc::now)
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let format = match cli.format {
        Some(format) => format,
        None => Config::load_global()?.default_format,
    };
    let output = Output::new(format, cli.verbose);
    let clock = Clock::new(cli.today);

    output.verbose_ctx("clock", &format!("today is {}", clock.today));

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing workspace at: {}", path));
            let workspace = Workspace::init(&path)?;
            output.success(&format!(
                "Initialized daybook workspace at {}",
                workspace.root().display()
            ));
        }

        Commands::Add {
            text,
            as_kind,
            preview,
        } => add::add(&output, &clock, &text.join(" "), as_kind, preview)?,
        Commands::Parse { text } => add::parse(&output, &clock, &text.join(" "))?,

        Commands::Task(cmd) => task::run(cmd, &output, &clock)?,
        Commands::Note(cmd) => note::run(cmd, &output, &clock)?,
        Commands::Habit(cmd) => habit::run(cmd, &output, &clock)?,
        Commands::Reflect(cmd) => reflect::run(cmd, &output, &clock)?,
        Commands::Focus(cmd) => focus::run(cmd, &output, &clock)?,

        Commands::Today => today::dashboard(&output, &clock)?,
        Commands::Remind => today::remind(&output, &clock)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
