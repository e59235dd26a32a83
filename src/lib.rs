//! daybook - local-first notes, tasks and habits
//!
//! Free text goes in through the quick-add parser, which turns lines like
//! `call mom tomorrow !! #family` into a dated, prioritised task. Habits
//! keep a set of completion days and report current and longest streaks.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{
    compute_streak, parse_quick_input, EntryKind, Habit, Note, ParsedInput, Priority,
    QuickInputParser, Streak, Task, TaskStatus,
};
