use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

use crate::models::{BoardStatus, Quadrant, SettingKey, DEFAULT_HABIT_GOAL};

const VERSION: &str = env!("LIFEORG_VERSION");

#[derive(Parser)]
#[command(
    name = "lifeorg",
    version = VERSION,
    about = "Tasks, habits and a focus timer in a local store",
    after_help = "\
NOTE:
  Data lives in a single SQLite file on this device (see --db / LIFEORG_DB).
  `export` and `import` are the only way to move data between devices.

EXIT CODES:
  0  Success
  1  Error (validation, not found, storage, import format)

BEHAVIOR NOTES:
  Tasks are either matrix tasks (with a quadrant) or board tasks (with a status).
  `import` replaces all tasks and habits but merges settings key by key.
  `import` and `reset` require --yes.
  Set LIFEORG_LOG (e.g. `debug`) for diagnostics on stderr."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the store [default: <data dir>/lifeorg/lifeorg.db]
    #[arg(long, global = true, env = "LIFEORG_DB")]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the store if needed and print its location
    Init,

    /// Matrix and board tasks
    #[command(subcommand)]
    Task(TaskCommands),

    /// Habits and daily check-ins
    #[command(subcommand)]
    Habit(HabitCommands),

    /// Focus/break timer
    #[command(subcommand)]
    Timer(TimerCommands),

    /// Timer durations
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Write a JSON snapshot of all data
    #[command(after_help = "\
NOTE:
  Without --output the document is written to stdout as-is.
  If --output is a directory, the file is named life-organizer-backup-YYYY-MM-DD.json.")]
    Export {
        /// File or directory to write to
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Restore from a JSON snapshot
    #[command(after_help = "\
NOTE:
  Destructive: tasks and habits in the file replace all existing ones.
  Settings in the file are merged into existing settings.
  Only snapshot version 1 is accepted. Nothing is written if the file is invalid.")]
    Import {
        /// Snapshot file
        file: PathBuf,
        /// Confirm replacing existing data
        #[arg(long)]
        yes: bool,
    },

    /// Delete all tasks, habits and settings
    Reset {
        /// Confirm deleting everything
        #[arg(long)]
        yes: bool,
    },

    /// Show an overview
    Status,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to the matrix (--quadrant) or the board (--status)
    #[command(group(ArgGroup::new("placement").required(true).args(["quadrant", "status"])))]
    Add {
        /// Task title
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_enum)]
        quadrant: Option<Quadrant>,
        #[arg(long, value_enum)]
        status: Option<BoardStatus>,
    },
    /// List tasks grouped by quadrant and by status
    List {
        /// Only show one view
        #[arg(long, value_enum)]
        view: Option<TaskView>,
    },
    /// Show task details
    Show {
        /// Task ID or prefix
        id: String,
    },
    /// Change a task's title, description, quadrant or status
    #[command(group(ArgGroup::new("placement").args(["quadrant", "status"])))]
    Edit {
        /// Task ID or prefix
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// New description (empty string clears it)
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_enum)]
        quadrant: Option<Quadrant>,
        #[arg(long, value_enum)]
        status: Option<BoardStatus>,
    },
    /// Flip a task between open and completed
    Toggle {
        /// Task ID or prefix
        id: String,
    },
    /// Delete a task (no error if it does not exist)
    Delete {
        /// Exact task ID
        id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TaskView {
    Matrix,
    Board,
}

#[derive(Subcommand)]
pub enum HabitCommands {
    /// Add a habit
    Add {
        /// Habit name
        name: String,
        /// Target streak in days
        #[arg(long, default_value_t = DEFAULT_HABIT_GOAL)]
        goal: u32,
    },
    /// List habits with their streaks
    List,
    /// Show habit details and check-in history
    Show {
        /// Habit ID or prefix
        id: String,
    },
    /// Check in for today, or undo today's check-in
    Check {
        /// Habit ID or prefix
        id: String,
    },
    /// Delete a habit (no error if it does not exist)
    Delete {
        /// Exact habit ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum TimerCommands {
    /// Show the timer as a new session would start
    Status,
    /// Run an interactive timer session
    #[command(after_help = "\
SESSION COMMANDS (one per line on stdin):
  start          start or resume the countdown
  pause          stop the countdown, keeping the remaining time
  reset          back to a stopped focus interval
  status         print the current state
  export <path>  write a snapshot including the live timer state
  quit           end the session (end of input does the same)

NOTE:
  When a focus interval ends the timer switches to a short break and stops;
  `start` begins the break.")]
    Run {
        /// Start counting down immediately
        #[arg(long)]
        start: bool,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show all timer durations
    List,
    /// Show one duration in minutes
    Get {
        #[arg(value_enum)]
        key: SettingKey,
    },
    /// Set one duration in minutes
    Set {
        #[arg(value_enum)]
        key: SettingKey,
        minutes: u32,
    },
}
