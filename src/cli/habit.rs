//! Habit CLI commands

use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;

use super::app::Clock;
use super::output::Output;
use crate::domain::{Habit, HabitSummary, IdKind, ItemId};
use crate::storage::{HabitStore, Workspace};

#[derive(Subcommand)]
pub enum HabitCommands {
    /// Start tracking a habit
    New {
        /// Habit name
        name: String,

        /// Icon shown next to the name
        #[arg(long)]
        icon: Option<String>,
    },

    /// List habits with their streaks
    List {
        /// Include archived habits
        #[arg(long)]
        archived: bool,
    },

    /// Toggle completion for a day
    Done {
        /// Habit ID
        id: String,

        /// Day to toggle (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show the last seven days for each habit
    Week {
        /// Only this habit
        id: Option<String>,

        /// Last day of the week shown (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Archive a habit
    Archive {
        /// Habit ID
        id: String,
    },

    /// Delete a habit and its history
    Delete {
        /// Habit ID
        id: String,
    },
}

pub fn run(cmd: HabitCommands, output: &Output, clock: &Clock) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let store = workspace.habit_store();

    match cmd {
        HabitCommands::New { name, icon } => new_habit(output, &store, &name, icon),
        HabitCommands::List { archived } => list_habits(output, &store, clock.today, archived),
        HabitCommands::Done { id, date } => {
            toggle_habit(output, &store, &id, date.unwrap_or(clock.today), clock.today)
        }
        HabitCommands::Week { id, date } => {
            week_view(output, &store, id.as_deref(), date.unwrap_or(clock.today))
        }
        HabitCommands::Archive { id } => archive_habit(output, &store, &id),
        HabitCommands::Delete { id } => delete_habit(output, &store, &id),
    }
}

fn load_habit(store: &HabitStore, id_str: &str) -> Result<Habit> {
    let id = ItemId::parse_kind(id_str, IdKind::Habit)?;
    store
        .get(&id)?
        .ok_or_else(|| anyhow::anyhow!("Habit not found: {}", id))
}

/// Active habits in creation order
fn active_habits(store: &HabitStore, include_archived: bool) -> Result<Vec<Habit>> {
    let mut habits: Vec<Habit> = store
        .read_all()?
        .into_values()
        .filter(|h| include_archived || !h.archived)
        .collect();
    habits.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(habits)
}

pub(super) fn print_summary(summary: &HabitSummary) {
    let mark = if summary.completed_today { "[x]" } else { "[ ]" };
    println!(
        "{:<10} {} {} {:<24} streak {:>3}  best {:>3}",
        summary.id,
        mark,
        summary.icon,
        summary.name,
        summary.current_streak,
        summary.longest_streak
    );
}

fn new_habit(output: &Output, store: &HabitStore, name: &str, icon: Option<String>) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Habit name cannot be empty");
    }

    let mut habit = Habit::new(name);
    if let Some(icon) = icon {
        habit = habit.with_icon(icon);
    }
    store.append(&habit)?;

    if output.is_json() {
        output.data(&habit);
    } else {
        output.success(&format!("Created habit: {} - {}", habit.id, habit.name));
    }

    Ok(())
}

fn list_habits(output: &Output, store: &HabitStore, today: NaiveDate, archived: bool) -> Result<()> {
    let summaries: Vec<HabitSummary> = active_habits(store, archived)?
        .iter()
        .map(|h| h.summary(today))
        .collect();

    if output.is_json() {
        output.data(&summaries);
    } else if summaries.is_empty() {
        println!("No habits");
    } else {
        for summary in &summaries {
            print_summary(summary);
        }
    }

    Ok(())
}

fn toggle_habit(
    output: &Output,
    store: &HabitStore,
    id_str: &str,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<()> {
    let mut habit = load_habit(store, id_str)?;

    if date > today {
        anyhow::bail!("Cannot complete a habit in the future ({})", date);
    }

    let completed = habit.toggle(date);
    store.update(&habit)?;

    let summary = habit.summary(today);
    if output.is_json() {
        output.data(&serde_json::json!({
            "id": summary.id,
            "date": date,
            "completed": completed,
            "current_streak": summary.current_streak,
            "longest_streak": summary.longest_streak,
        }));
    } else if completed {
        output.success(&format!(
            "{} {} done for {} (streak {})",
            habit.icon, habit.name, date, summary.current_streak
        ));
    } else {
        output.success(&format!("{} {} unmarked for {}", habit.icon, habit.name, date));
    }

    Ok(())
}

fn week_view(output: &Output, store: &HabitStore, id: Option<&str>, last: NaiveDate) -> Result<()> {
    let habits = match id {
        Some(id) => vec![load_habit(store, id)?],
        None => active_habits(store, false)?,
    };

    if output.is_json() {
        let items: Vec<_> = habits
            .iter()
            .map(|h| {
                serde_json::json!({
                    "id": h.id.to_string(),
                    "name": h.name,
                    "days": h.week(last),
                })
            })
            .collect();
        output.data(&items);
        return Ok(());
    }

    if habits.is_empty() {
        println!("No habits");
        return Ok(());
    }

    let header: Vec<String> = habits[0]
        .week(last)
        .iter()
        .map(|d| d.date.format("%a").to_string())
        .collect();
    println!("{:<24} {}", "", header.join(" "));

    for habit in &habits {
        let cells: Vec<&str> = habit
            .week(last)
            .iter()
            .map(|d| if d.completed { " x " } else { " . " })
            .collect();
        println!("{:<24} {}", habit.name, cells.join(" "));
    }

    Ok(())
}

fn archive_habit(output: &Output, store: &HabitStore, id_str: &str) -> Result<()> {
    let mut habit = load_habit(store, id_str)?;
    habit.archive();
    store.update(&habit)?;

    output.success(&format!("Archived habit: {}", habit.id));
    Ok(())
}

fn delete_habit(output: &Output, store: &HabitStore, id_str: &str) -> Result<()> {
    let id = ItemId::parse_kind(id_str, IdKind::Habit)?;

    if !store.remove(&id)? {
        anyhow::bail!("Habit not found: {}", id);
    }

    output.success(&format!("Deleted habit: {}", id));
    Ok(())
}
