//! Domain models for daybook
//!
//! Contains the core logic without any I/O concerns. The quick-add parser
//! and the streak calculator are pure functions of their inputs and a date.

mod id;
mod quick_input;
mod streak;
mod task;
mod note;
mod habit;
mod agenda;
mod reflection;
mod focus;

pub use id::{IdError, IdKind, ItemId};
pub use quick_input::{parse_quick_input, EntryKind, ParsedInput, QuickInputParser, WeekdayResolution};
pub use streak::{compute_streak, parse_day, Streak};
pub use task::{Priority, Task, TaskFilter, TaskStatus};
pub use note::{daily_note_title, Note, NoteFilter, NoteFrontmatter};
pub use habit::{DayMark, Habit, HabitSummary};
pub use agenda::{Agenda, FOCUS_LIMIT};
pub use reflection::{week_start, ReflectionField, WeeklyReflection};
pub use focus::{format_countdown, FocusSession, FocusSummary, SessionKind};
