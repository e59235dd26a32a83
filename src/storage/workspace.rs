//! Workspace management
//!
//! Handles workspace initialization and provides access to stores.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{Config, FocusStore, HabitStore, JsonFileStore, NoteStore, ReflectionStore, TaskStore};

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Not in a daybook workspace. Run 'daybook init' first.")]
    NotInWorkspace,

    #[error("Not a daybook workspace: {0}")]
    NotAWorkspace(PathBuf),
}

const DEFAULT_CONFIG: &str = r#"# daybook workspace configuration

[quick_add]
# How bare weekday names resolve:
#   "anchored"        - mon..thu count from next Monday, fri..sun from next Friday
#   "next_occurrence" - the next matching weekday after today
weekday_resolution = "anchored"

# Priority for quick-added tasks without ! markers or keywords
default_priority = "medium"

[reminders]
enabled = true

# Hours before the same task is reminded again
dedup_hours = 24

[focus]
# Pomodoro lengths in minutes
work_minutes = 25
break_minutes = 5
"#;

/// A daybook workspace
pub struct Workspace {
    root: PathBuf,
    config: Config,
}

impl Workspace {
    /// Opens an existing workspace at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let daybook_dir = root.join(".daybook");

        if !daybook_dir.is_dir() {
            return Err(WorkspaceError::NotAWorkspace(root).into());
        }

        let config = Config::for_workspace(&root)?;
        log::debug!("opened workspace at {}", root.display());

        Ok(Self { root, config })
    }

    /// Opens the workspace at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_workspace_root().ok_or(WorkspaceError::NotInWorkspace)?;

        Self::open(root)
    }

    /// Initializes a new workspace at the given path.
    ///
    /// Existing files are left alone, so running it twice is harmless.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let daybook_dir = root.join(".daybook");

        let notes_dir = daybook_dir.join("notes");
        fs::create_dir_all(&notes_dir).with_context(|| {
            format!("Failed to create notes directory: {}", notes_dir.display())
        })?;

        let config_path = daybook_dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let gitignore_path = daybook_dir.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(&gitignore_path, "# Reminder bookkeeping\nstate.json\n*.tmp\n").with_context(
                || format!("Failed to write .gitignore: {}", gitignore_path.display()),
            )?;
        }

        Self::open(root)
    }

    /// Returns the workspace root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .daybook directory path
    pub fn daybook_dir(&self) -> PathBuf {
        self.root.join(".daybook")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn task_store(&self) -> TaskStore {
        TaskStore::new(self.daybook_dir().join("tasks.jsonl"))
    }

    pub fn habit_store(&self) -> HabitStore {
        HabitStore::new(self.daybook_dir().join("habits.jsonl"))
    }

    pub fn reflection_store(&self) -> ReflectionStore {
        ReflectionStore::new(self.daybook_dir().join("reflections.jsonl"))
    }

    pub fn focus_store(&self) -> FocusStore {
        FocusStore::new(self.daybook_dir().join("focus.jsonl"))
    }

    pub fn note_store(&self) -> NoteStore {
        NoteStore::new(self.daybook_dir().join("notes"))
    }

    /// Opens the reminder state file
    pub fn state_store(&self) -> Result<JsonFileStore> {
        JsonFileStore::open(self.daybook_dir().join("state.json"))
    }
}
