//! Focus sessions
//!
//! A session is one work or break interval of the pomodoro cycle. A session
//! without `ended_at` is still running; there is at most one at a time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::id::{IdKind, ItemId};

/// Work or break
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    #[default]
    Work,
    Break,
}

impl SessionKind {
    /// The interval that follows this one
    pub fn next(self) -> Self {
        match self {
            SessionKind::Work => SessionKind::Break,
            SessionKind::Break => SessionKind::Work,
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionKind::Work => f.pad("work"),
            SessionKind::Break => f.pad("break"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusSession {
    pub id: ItemId,

    pub kind: SessionKind,

    /// Task worked on during a work session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<ItemId>,

    /// Length the timer was set to
    pub planned_minutes: u32,

    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl FocusSession {
    pub fn start(
        kind: SessionKind,
        planned_minutes: u32,
        task_id: Option<ItemId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ItemId::new(IdKind::Focus, &kind.to_string(), now),
            kind,
            task_id,
            planned_minutes,
            started_at: now,
            ended_at: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.ended_at.is_none()
    }

    /// When the timer runs out
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.started_at + Duration::minutes(self.planned_minutes.into())
    }

    /// Time left on the timer, never negative
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        let end = self.ended_at.unwrap_or(now);
        (self.ends_at() - end).max(Duration::zero())
    }

    /// Stops a running session; a stopped session keeps its end time
    pub fn stop(&mut self, now: DateTime<Utc>) {
        if self.is_running() {
            self.ended_at = Some(now.max(self.started_at));
        }
    }

    /// Whole minutes spent so far (or in total, once stopped)
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> i64 {
        let end = self.ended_at.unwrap_or(now).max(self.started_at);
        (end - self.started_at).num_minutes()
    }

    /// A stopped session that ran for its full planned length
    pub fn is_complete(&self) -> bool {
        self.ended_at.is_some_and(|end| end >= self.ends_at())
    }
}

/// Totals over a set of sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FocusSummary {
    pub sessions: usize,
    pub work_minutes: i64,
    pub break_minutes: i64,
    /// Work sessions that ran their full length
    pub completed_work: usize,
}

impl FocusSummary {
    pub fn build<'a, I>(sessions: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a FocusSession>,
    {
        let mut summary = Self::default();
        for session in sessions {
            summary.sessions += 1;
            let minutes = session.elapsed_minutes(now);
            match session.kind {
                SessionKind::Work => {
                    summary.work_minutes += minutes;
                    if session.is_complete() {
                        summary.completed_work += 1;
                    }
                }
                SessionKind::Break => summary.break_minutes += minutes,
            }
        }
        summary
    }
}

/// `MM:SS`, minutes not capped at 60
pub fn format_countdown(remaining: Duration) -> String {
    let seconds = remaining.num_seconds().max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
