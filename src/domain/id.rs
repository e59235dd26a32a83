//! Hash-based IDs for notes, tasks, habits and focus sessions
//!
//! ID Format: `{prefix}-{7-char-hash}` where the prefix names the record kind:
//! - Notes: `n-3a9c0d2`
//! - Tasks: `t-9d3e5f2`
//! - Habits: `h-7f2b4c1`
//! - Focus sessions: `f-1c8e6a0`
//!
//! The hash is derived from title + creation timestamp, so the same title
//! created twice still gets two IDs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid ID format: expected '{{n|t|h|f}}-{{7-char-hash}}', got '{0}'")]
    InvalidFormat(String),

    #[error("Expected a {expected} ID, got '{got}'")]
    WrongKind { expected: IdKind, got: String },
}

/// Generates a 7-character hash from title and timestamp
fn generate_hash(title: &str, timestamp: DateTime<Utc>) -> String {
    let input = format!("{}{}", title, timestamp.timestamp_nanos_opt().unwrap_or(0));
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

/// The kind of record an ID points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdKind {
    Note,
    Task,
    Habit,
    Focus,
}

impl IdKind {
    fn prefix(self) -> &'static str {
        match self {
            IdKind::Note => "n",
            IdKind::Task => "t",
            IdKind::Habit => "h",
            IdKind::Focus => "f",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "n" => Some(IdKind::Note),
            "t" => Some(IdKind::Task),
            "h" => Some(IdKind::Habit),
            "f" => Some(IdKind::Focus),
            _ => None,
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdKind::Note => write!(f, "note"),
            IdKind::Task => write!(f, "task"),
            IdKind::Habit => write!(f, "habit"),
            IdKind::Focus => write!(f, "focus session"),
        }
    }
}

/// Record ID in the format `{prefix}-{7-char-hash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId {
    kind: IdKind,
    hash: String,
}

impl ItemId {
    /// Creates a new ID of the given kind from title and timestamp
    pub fn new(kind: IdKind, title: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            hash: generate_hash(title, timestamp),
        }
    }

    pub fn note(title: &str, timestamp: DateTime<Utc>) -> Self {
        Self::new(IdKind::Note, title, timestamp)
    }

    pub fn task(title: &str, timestamp: DateTime<Utc>) -> Self {
        Self::new(IdKind::Task, title, timestamp)
    }

    pub fn habit(title: &str, timestamp: DateTime<Utc>) -> Self {
        Self::new(IdKind::Habit, title, timestamp)
    }

    /// Returns the kind of record this ID refers to
    pub fn kind(&self) -> IdKind {
        self.kind
    }

    /// Parses an ID and checks that it has the expected kind
    pub fn parse_kind(s: &str, expected: IdKind) -> Result<Self, IdError> {
        let id: ItemId = s.parse()?;
        if id.kind != expected {
            return Err(IdError::WrongKind {
                expected,
                got: s.trim().to_string(),
            });
        }
        Ok(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{}-{}", self.kind.prefix(), self.hash))
    }
}

impl FromStr for ItemId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (prefix, hash) = s
            .split_once('-')
            .ok_or_else(|| IdError::InvalidFormat(s.to_string()))?;

        let kind = IdKind::from_prefix(prefix).ok_or_else(|| IdError::InvalidFormat(s.to_string()))?;

        if hash.len() != 7 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IdError::InvalidFormat(s.to_string()));
        }

        Ok(Self {
            kind,
            hash: hash.to_ascii_lowercase(),
        })
    }
}

impl TryFrom<String> for ItemId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_generation_is_unique_for_different_timestamps() {
        let title = "Same Title";
        let ts1 = Utc::now();
        let ts2 = ts1 + chrono::Duration::nanoseconds(1);

        let id1 = ItemId::task(title, ts1);
        let id2 = ItemId::task(title, ts2);

        assert_ne!(id1, id2);
    }

    #[test]
    fn id_format_carries_kind_prefix() {
        let ts = Utc::now();

        let note = ItemId::note("Test", ts).to_string();
        let task = ItemId::task("Test", ts).to_string();
        let habit = ItemId::habit("Test", ts).to_string();

        assert!(note.starts_with("n-"));
        assert!(task.starts_with("t-"));
        assert!(habit.starts_with("h-"));
        assert_eq!(task.len(), 9); // "t-" + 7 chars
    }

    #[test]
    fn id_parses_correctly() {
        let original = ItemId::habit("Stretch", Utc::now());
        let parsed: ItemId = original.to_string().parse().unwrap();

        assert_eq!(original, parsed);
        assert_eq!(parsed.kind(), IdKind::Habit);
    }

    #[test]
    fn id_rejects_invalid_format() {
        assert!("invalid".parse::<ItemId>().is_err());
        assert!("t-short".parse::<ItemId>().is_err());
        assert!("t-toolonggg".parse::<ItemId>().is_err());
        assert!("t-gggggg1".parse::<ItemId>().is_err()); // 'g' is not hex
        assert!("x-1234567".parse::<ItemId>().is_err()); // unknown prefix
    }

    #[test]
    fn parse_kind_rejects_other_kinds() {
        let err = ItemId::parse_kind("n-1234567", IdKind::Task).unwrap_err();
        assert_eq!(
            err,
            IdError::WrongKind {
                expected: IdKind::Task,
                got: "n-1234567".to_string()
            }
        );

        assert!(ItemId::parse_kind("t-1234567", IdKind::Task).is_ok());
    }

    #[test]
    fn parse_normalizes_hash_case() {
        let id: ItemId = "t-ABCDEF1".parse().unwrap();
        assert_eq!(id.to_string(), "t-abcdef1");
    }

    #[test]
    fn serde_roundtrip_id() {
        let original = ItemId::note("Test", Utc::now());
        let json = serde_json::to_string(&original).unwrap();
        let parsed: ItemId = serde_json::from_str(&json).unwrap();

        assert_eq!(original, parsed);
    }
}
