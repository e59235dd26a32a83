//! Habit domain model
//!
//! A habit owns the set of calendar days it was completed on. Streaks are
//! never stored; they are computed from the completion set when a habit is
//! displayed.

use std::collections::BTreeSet;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::id::ItemId;
use super::streak::{compute_streak, Streak};

fn default_icon() -> String {
    "✓".to_string()
}

/// A tracked habit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: ItemId,

    pub name: String,

    #[serde(default = "default_icon")]
    pub icon: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub archived: bool,

    /// Days the habit was completed on
    #[serde(default)]
    pub completions: BTreeSet<NaiveDate>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Display view of a habit with its streaks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitSummary {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completed_today: bool,
    pub total_completions: usize,
}

/// One cell of a week view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayMark {
    pub date: NaiveDate,
    pub completed: bool,
}

impl Habit {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let now = Utc::now();

        Self {
            id: ItemId::habit(&name, now),
            name,
            icon: default_icon(),
            archived: false,
            completions: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completions.contains(&date)
    }

    /// Adds the completion for `date`, or removes it if already present.
    /// Returns true when the habit is now completed on that day.
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        let completed = if self.completions.remove(&date) {
            false
        } else {
            self.completions.insert(date);
            true
        };
        self.updated_at = Utc::now();
        completed
    }

    pub fn archive(&mut self) {
        self.archived = true;
        self.updated_at = Utc::now();
    }

    pub fn streak(&self, today: NaiveDate) -> Streak {
        compute_streak(self.completions.iter().copied(), today)
    }

    pub fn summary(&self, today: NaiveDate) -> HabitSummary {
        let streak = self.streak(today);
        HabitSummary {
            id: self.id.to_string(),
            name: self.name.clone(),
            icon: self.icon.clone(),
            current_streak: streak.current,
            longest_streak: streak.longest,
            completed_today: self.is_completed_on(today),
            total_completions: self.completions.len(),
        }
    }

    /// The seven days ending at `last`, oldest first
    pub fn week(&self, last: NaiveDate) -> Vec<DayMark> {
        (0..7u64)
            .rev()
            .filter_map(|back| last.checked_sub_days(Days::new(back)))
            .map(|date| DayMark {
                date,
                completed: self.is_completed_on(date),
            })
            .collect()
    }
}
