//! Configuration handling for daybook
//!
//! Configuration is stored in `.daybook/config.toml` (workspace) and
//! `~/.config/daybook/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Priority, QuickInputParser, SessionKind, WeekdayResolution};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Settings for `daybook add`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct QuickAddConfig {
    /// How bare weekday names resolve to dates
    pub weekday_resolution: WeekdayResolution,

    /// Priority given to quick-added tasks without an explicit marker
    pub default_priority: Priority,
}

impl QuickAddConfig {
    /// Builds a parser that follows these settings
    pub fn parser(&self) -> QuickInputParser {
        QuickInputParser::with_resolution(self.weekday_resolution)
    }
}

/// Settings for `daybook remind`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReminderConfig {
    pub enabled: bool,

    /// Hours before the same task can be reminded again
    pub dedup_hours: u32,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dedup_hours: 24,
        }
    }
}

/// Pomodoro lengths for `daybook focus`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FocusConfig {
    pub work_minutes: u32,
    pub break_minutes: u32,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            break_minutes: 5,
        }
    }
}

impl FocusConfig {
    pub fn minutes_for(&self, kind: SessionKind) -> u32 {
        match kind {
            SessionKind::Work => self.work_minutes,
            SessionKind::Break => self.break_minutes,
        }
    }
}

/// Workspace-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub quick_add: QuickAddConfig,

    pub reminders: ReminderConfig,

    pub focus: FocusConfig,
}

impl WorkspaceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reminders.dedup_hours == 0 {
            return Err(ConfigError::Invalid(
                "reminders.dedup_hours must be at least 1".to_string(),
            ));
        }
        if self.focus.work_minutes == 0 || self.focus.break_minutes == 0 {
            return Err(ConfigError::Invalid(
                "focus.work_minutes and focus.break_minutes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + workspace)
#[derive(Debug, Clone)]
pub struct Config {
    pub workspace: WorkspaceConfig,
    pub global: GlobalConfig,
    pub workspace_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let workspace_root = Self::find_workspace_root();
        let workspace = match &workspace_root {
            Some(root) => Self::load_workspace_config(root)?,
            None => WorkspaceConfig::default(),
        };

        Ok(Self {
            workspace,
            global,
            workspace_root,
        })
    }

    /// Loads configuration for a specific workspace
    pub fn for_workspace(workspace_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let workspace = Self::load_workspace_config(workspace_root)?;

        Ok(Self {
            workspace,
            global,
            workspace_root: Some(workspace_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "daybook", "daybook").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    pub fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads workspace configuration from a specific root
    fn load_workspace_config(workspace_root: &Path) -> Result<WorkspaceConfig> {
        let config_path = workspace_root.join(".daybook").join("config.toml");

        if !config_path.exists() {
            return Ok(WorkspaceConfig::default());
        }

        let content = fs::read_to_string(&config_path).with_context(|| {
            format!("Failed to read workspace config: {}", config_path.display())
        })?;

        let config: WorkspaceConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse workspace config")?;
        config.validate()?;

        log::debug!("loaded workspace config from {}", config_path.display());
        Ok(config)
    }

    /// Finds the workspace root by looking for a `.daybook/` directory
    pub fn find_workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_workspace_root_from(&current)
    }

    /// Walks up from `start` looking for a `.daybook/` directory
    pub fn find_workspace_root_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(".daybook").is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = WorkspaceConfig::default();

        assert_eq!(config.quick_add.weekday_resolution, WeekdayResolution::Anchored);
        assert_eq!(config.quick_add.default_priority, Priority::Medium);
        assert!(config.reminders.enabled);
        assert_eq!(config.reminders.dedup_hours, 24);
        assert_eq!(config.focus.minutes_for(SessionKind::Work), 25);
        assert_eq!(config.focus.minutes_for(SessionKind::Break), 5);
        assert_eq!(GlobalConfig::default().default_format, OutputFormat::Text);
    }

    #[test]
    fn parse_workspace_config() {
        let toml = r#"
[quick_add]
weekday_resolution = "next_occurrence"
default_priority = "high"

[reminders]
dedup_hours = 6

[focus]
work_minutes = 50
"#;

        let config: WorkspaceConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.quick_add.weekday_resolution, WeekdayResolution::NextOccurrence);
        assert_eq!(config.quick_add.default_priority, Priority::High);
        assert!(config.reminders.enabled);
        assert_eq!(config.reminders.dedup_hours, 6);
        assert_eq!(config.focus.work_minutes, 50);
        assert_eq!(config.focus.break_minutes, 5);
        assert_eq!(
            config.quick_add.parser(),
            QuickInputParser::with_resolution(WeekdayResolution::NextOccurrence)
        );
    }

    #[test]
    fn parse_global_config() {
        let config: GlobalConfig = toml::from_str(r#"default_format = "json""#).unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
    }

    #[test]
    fn zero_dedup_window_is_rejected() {
        let config: WorkspaceConfig = toml::from_str("[reminders]\ndedup_hours = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config: WorkspaceConfig = toml::from_str("[focus]\nbreak_minutes = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn bad_workspace_config_is_reported() {
        let dir = TempDir::new().unwrap();
        let daybook_dir = dir.path().join(".daybook");
        fs::create_dir_all(&daybook_dir).unwrap();
        fs::write(daybook_dir.join("config.toml"), "[quick_add]\nweekday_resolution = 3\n").unwrap();

        let err = Config::load_workspace_config(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse workspace config"));
    }

    #[test]
    fn find_workspace_root_walks_up() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".daybook")).unwrap();

        let sub_dir = dir.path().join("sub").join("dir");
        fs::create_dir_all(&sub_dir).unwrap();

        let root = Config::find_workspace_root_from(&sub_dir);
        assert_eq!(root.as_deref(), Some(dir.path()));
    }

    #[test]
    fn find_workspace_root_outside_workspace() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Config::find_workspace_root_from(dir.path()), None);
    }
}
