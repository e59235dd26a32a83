//! Note domain model
//!
//! Notes are free-form markdown documents. They are stored as markdown
//! files with YAML frontmatter. A daily note is an ordinary note tied to a
//! calendar date; there is at most one per date.
//!
//! Notes link to each other with `[[Title]]` references in their body.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::id::ItemId;
use super::quick_input::ParsedInput;

static WIKI_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]]+)\]\]").unwrap());

/// A note document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier
    pub id: ItemId,

    /// Human-readable title
    pub title: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Pinned notes sort before everything else
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pinned: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub archived: bool,

    /// Set for daily notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Markdown body content (excluding frontmatter)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
}

impl Note {
    /// Creates a new empty note with the given title
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let now = Utc::now();

        Self {
            id: ItemId::note(&title, now),
            title,
            tags: Vec::new(),
            pinned: false,
            archived: false,
            daily_date: None,
            created_at: now,
            updated_at: now,
            content: String::new(),
        }
    }

    /// Builds a note from a quick-add result
    pub fn from_parsed(parsed: &ParsedInput) -> Self {
        let mut note = Self::new(parsed.title.clone());
        note.tags = parsed.tags.clone();
        note
    }

    /// Creates the daily note for a date
    pub fn daily(date: NaiveDate) -> Self {
        let mut note = Self::new(daily_note_title(date));
        note.daily_date = Some(date);
        note
    }

    pub fn is_daily(&self) -> bool {
        self.daily_date.is_some()
    }

    /// Sets the body content
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.updated_at = Utc::now();
    }

    /// Appends a paragraph to the body
    pub fn append(&mut self, text: &str) {
        if !self.content.is_empty() && !self.content.ends_with('\n') {
            self.content.push('\n');
        }
        self.content.push_str(text);
        self.content.push('\n');
        self.updated_at = Utc::now();
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        if self.pinned != pinned {
            self.pinned = pinned;
            self.updated_at = Utc::now();
        }
    }

    pub fn archive(&mut self) {
        self.archived = true;
        self.updated_at = Utc::now();
    }

    /// Titles referenced with `[[Title]]`, in order, without duplicates
    pub fn linked_titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = Vec::new();
        for caps in WIKI_LINK_RE.captures_iter(&self.content) {
            let title = caps[1].trim().to_string();
            if !title.is_empty() && !titles.contains(&title) {
                titles.push(title);
            }
        }
        titles
    }
}

/// Title used for daily notes, e.g. `Wednesday, January 10, 2024`
pub fn daily_note_title(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Represents the frontmatter section of a note file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteFrontmatter {
    pub id: ItemId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pinned: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Note> for NoteFrontmatter {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            tags: note.tags.clone(),
            pinned: note.pinned,
            archived: note.archived,
            daily_date: note.daily_date,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

impl NoteFrontmatter {
    /// Converts to a Note with the given body
    pub fn into_note(self, content: String) -> Note {
        Note {
            id: self.id,
            title: self.title,
            tags: self.tags,
            pinned: self.pinned,
            archived: self.archived,
            daily_date: self.daily_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
            content,
        }
    }
}

/// Search and filter criteria for note lists
#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    /// Case-insensitive substring of the title or the body
    pub search: Option<String>,
    pub tag: Option<String>,
}

impl NoteFilter {
    pub fn matches(&self, note: &Note) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !note.title.to_lowercase().contains(&needle)
                && !note.content.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        match &self.tag {
            Some(tag) => note.tags.contains(&tag.trim_start_matches('#').to_lowercase()),
            None => true,
        }
    }
}
