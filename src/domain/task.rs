//! Task domain model
//!
//! Tasks are the actionable entries: a title, an optional due date, a
//! priority and a todo/done status. Quick-add produces most of them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::id::ItemId;
use super::quick_input::ParsedInput;

/// Priority of a task
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => f.pad("low"),
            Priority::Medium => f.pad("medium"),
            Priority::High => f.pad("high"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" | "l" => Ok(Priority::Low),
            "medium" | "med" | "m" => Ok(Priority::Medium),
            "high" | "h" => Ok(Priority::High),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    Done,
}

impl TaskStatus {
    /// Returns true if this status represents completion
    pub fn is_complete(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Todo => write!(f, "todo"),
            TaskStatus::Done => write!(f, "done"),
        }
    }
}

/// A task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: ItemId,

    /// Human-readable title
    pub title: String,

    /// Optional longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Archived tasks are hidden from every list except the archive
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub archived: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,

    /// When the task was completed (if done)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new todo task with medium priority
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        let title = title.into();
        Self {
            id: ItemId::task(&title, now),
            title,
            description: None,
            due_date: None,
            priority: Priority::default(),
            status: TaskStatus::Todo,
            tags: Vec::new(),
            archived: false,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Builds a task from a quick-add result.
    ///
    /// Quick-added tasks without a detected date are due `today`; without a
    /// detected priority they get `default_priority`.
    pub fn from_parsed(parsed: &ParsedInput, today: NaiveDate, default_priority: Priority) -> Self {
        let mut task = Self::new(parsed.title.clone());
        task.due_date = Some(parsed.due_date.unwrap_or(today));
        task.priority = parsed.priority.unwrap_or(default_priority);
        task.tags = parsed.tags.clone();
        task
    }

    /// Returns true if the task is neither done nor archived
    pub fn is_open(&self) -> bool {
        !self.archived && !self.status.is_complete()
    }

    /// Returns true if the task is open and its due date has passed
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_open() && self.due_date.is_some_and(|due| due < today)
    }

    /// Marks the task as done
    pub fn complete(&mut self) {
        let now = Utc::now();
        self.status = TaskStatus::Done;
        self.completed_at = Some(now);
        self.updated_at = now;
    }

    /// Moves a done task back to todo
    pub fn reopen(&mut self) {
        self.status = TaskStatus::Todo;
        self.completed_at = None;
        self.updated_at = Utc::now();
    }

    /// Flips between todo and done, returning the new status
    pub fn toggle(&mut self) -> TaskStatus {
        if self.status.is_complete() {
            self.reopen();
        } else {
            self.complete();
        }
        self.status
    }

    pub fn archive(&mut self) {
        self.archived = true;
        self.updated_at = Utc::now();
    }

    pub fn set_due_date(&mut self, due: Option<NaiveDate>) {
        self.due_date = due;
        self.updated_at = Utc::now();
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.updated_at = Utc::now();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
        self.updated_at = Utc::now();
    }
}

/// Search and filter criteria for task lists
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Case-insensitive substring of the title
    pub search: Option<String>,
    pub tag: Option<String>,
    pub priority: Option<Priority>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(search) = &self.search {
            if !task.title.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            let tag = tag.trim_start_matches('#').to_lowercase();
            if !task.tags.contains(&tag) {
                return false;
            }
        }
        self.priority.is_none_or(|p| task.priority == p)
    }
}
