//! # Storage Layer
//!
//! Persistence for daybook with git-friendly file formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Notes | Markdown + YAML frontmatter | `.daybook/notes/{id}.md` |
//! | Tasks | JSONL (one JSON per line) | `.daybook/tasks.jsonl` |
//! | Habits | JSONL | `.daybook/habits.jsonl` |
//! | Reflections | JSONL | `.daybook/reflections.jsonl` |
//! | Focus sessions | JSONL | `.daybook/focus.jsonl` |
//! | Reminder state | JSON object | `.daybook/state.json` |
//! | Config | TOML | `.daybook/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`JsonlStore`], [`NoteStore`] and [`JsonFileStore`] use file locking (`fs2`)
//! - All writes are atomic (temp file + rename)
//!
//! ## Key Types
//!
//! - [`Workspace`] - Entry point for accessing a daybook workspace
//! - [`NoteStore`] - Read/write notes as markdown files
//! - [`JsonlStore`] - Read/write tasks, habits, reflections and focus sessions as JSONL
//! - [`Config`] - Workspace and global configuration

mod jsonl;
mod markdown;
mod kv;
mod config;
mod workspace;

pub use jsonl::{FocusStore, HabitStore, JsonlStore, Record, ReflectionStore, TaskStore};
pub use markdown::NoteStore;
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore, ReminderLog};
pub use config::{
    Config, ConfigError, FocusConfig, GlobalConfig, OutputFormat, QuickAddConfig, ReminderConfig,
    WorkspaceConfig,
};
pub use workspace::{Workspace, WorkspaceError};
