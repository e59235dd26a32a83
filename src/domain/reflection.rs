//! Weekly reflections
//!
//! One reflection per week, keyed by the Monday the week starts on.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which part of a reflection to edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectionField {
    Wins,
    Lessons,
    Notes,
}

impl std::str::FromStr for ReflectionField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wins" | "win" => Ok(ReflectionField::Wins),
            "lessons" | "lesson" => Ok(ReflectionField::Lessons),
            "notes" | "note" => Ok(ReflectionField::Notes),
            _ => Err(format!("Unknown reflection field: {} (expected wins, lessons or notes)", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReflection {
    /// Monday of the reflected week
    pub week_start: NaiveDate,

    #[serde(default)]
    pub wins: String,

    #[serde(default)]
    pub lessons: String,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl WeeklyReflection {
    /// Creates an empty reflection for the week containing `date`
    pub fn for_week_of(date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            week_start: week_start(date),
            wins: String::new(),
            lessons: String::new(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set(&mut self, field: ReflectionField, text: impl Into<String>) {
        let text = text.into();
        match field {
            ReflectionField::Wins => self.wins = text,
            ReflectionField::Lessons => self.lessons = text,
            ReflectionField::Notes => self.notes = text,
        }
        self.updated_at = Utc::now();
    }

    pub fn is_empty(&self) -> bool {
        self.wins.is_empty() && self.lessons.is_empty() && self.notes.is_empty()
    }
}

/// Monday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday();
    date.checked_sub_days(Days::new(back.into())).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weeks_start_on_monday() {
        assert_eq!(week_start(date(2024, 1, 10)), date(2024, 1, 8));
        assert_eq!(week_start(date(2024, 1, 8)), date(2024, 1, 8));
        assert_eq!(week_start(date(2024, 1, 14)), date(2024, 1, 8));
    }

    #[test]
    fn set_fields() {
        let mut reflection = WeeklyReflection::for_week_of(date(2024, 1, 10));
        assert!(reflection.is_empty());

        reflection.set(ReflectionField::Wins, "Shipped the parser");
        reflection.set("lessons".parse().unwrap(), "Write tests first");

        assert_eq!(reflection.wins, "Shipped the parser");
        assert_eq!(reflection.lessons, "Write tests first");
        assert!(!reflection.is_empty());
    }
}
