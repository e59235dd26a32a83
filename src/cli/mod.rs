//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Workspace setup and capture | `init`, `add`, `parse` |
//! | Task | Todo management | `task list`, `task done`, `task due` |
//! | Note | Markdown notes | `note new`, `note daily`, `note pin` |
//! | Habit | Daily habits and streaks | `habit done`, `habit week` |
//! | Focus | Pomodoro sessions | `focus start`, `focus stop`, `focus log` |
//! | Review | Looking back and ahead | `today`, `remind`, `reflect set` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! daybook --verbose add buy milk tomorrow
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod logging;
mod add;
mod task;
mod note;
mod habit;
mod reflect;
mod focus;
mod today;

pub use app::{run, Cli, Clock, Commands};
pub use output::{Output, OutputFormat};
