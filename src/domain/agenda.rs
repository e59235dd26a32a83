//! Agenda buckets for the dashboard
//!
//! Groups tasks relative to a given day. Archived tasks never appear.

use chrono::NaiveDate;
use serde::Serialize;

use super::task::{Priority, Task};

/// How many high-priority tasks the focus list shows
pub const FOCUS_LIMIT: usize = 3;

/// Tasks grouped for a single day
#[derive(Debug, Clone, Default, Serialize)]
pub struct Agenda {
    pub due_today: Vec<Task>,
    pub overdue: Vec<Task>,
    pub upcoming: Vec<Task>,
    pub completed: Vec<Task>,
    /// Open high-priority tasks, capped at [`FOCUS_LIMIT`]
    pub focus: Vec<Task>,
}

impl Agenda {
    pub fn build<'a, I>(tasks: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut tasks: Vec<&Task> = tasks.into_iter().filter(|t| !t.archived).collect();
        tasks.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then_with(|| b.priority.cmp(&a.priority))
                .then_with(|| a.created_at.cmp(&b.created_at))
        });

        let mut agenda = Agenda::default();
        for task in tasks {
            if task.status.is_complete() {
                agenda.completed.push(task.clone());
                continue;
            }

            match task.due_date {
                Some(due) if due == today => agenda.due_today.push(task.clone()),
                Some(due) if due < today => agenda.overdue.push(task.clone()),
                Some(_) => agenda.upcoming.push(task.clone()),
                None => {}
            }

            if task.priority == Priority::High && agenda.focus.len() < FOCUS_LIMIT {
                agenda.focus.push(task.clone());
            }
        }
        agenda
    }

    /// Number of open tasks that need attention today
    pub fn open_count(&self) -> usize {
        self.due_today.len() + self.overdue.len()
    }

    /// Tasks to work on in a focus session: the high-priority list, or
    /// the first few tasks due today when nothing is high priority
    pub fn focus_tasks(&self) -> &[Task] {
        if !self.focus.is_empty() {
            &self.focus
        } else {
            &self.due_today[..self.due_today.len().min(FOCUS_LIMIT)]
        }
    }
}
