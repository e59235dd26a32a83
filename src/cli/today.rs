//! Today dashboard and reminders

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};

use super::app::Clock;
use super::habit::print_summary;
use super::output::Output;
use crate::domain::{Agenda, HabitSummary, Task};
use crate::storage::{ReminderLog, Workspace};

fn print_bucket(title: &str, tasks: &[Task]) {
    if tasks.is_empty() {
        return;
    }
    println!("{} ({})", title, tasks.len());
    for task in tasks {
        let mark = if task.status.is_complete() { "[x]" } else { "[ ]" };
        let due = task.due_date.map(|d| d.format("%b %-d").to_string()).unwrap_or_default();
        println!("  {} {:<10} {:<7} {:<7} {}", mark, task.id, due, task.priority, task.title);
    }
    println!();
}

pub fn dashboard(output: &Output, clock: &Clock) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let today = clock.today;

    let tasks = workspace.task_store().read_all()?;
    let agenda = Agenda::build(tasks.values(), today);

    let mut habits: Vec<_> = workspace
        .habit_store()
        .read_all()?
        .into_values()
        .filter(|h| !h.archived)
        .collect();
    habits.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    let habits: Vec<HabitSummary> = habits.iter().map(|h| h.summary(today)).collect();

    let daily = workspace.note_store().daily(today)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "date": today,
            "agenda": agenda,
            "habits": habits,
            "daily_note": daily.map(|n| serde_json::json!({
                "id": n.id.to_string(),
                "title": n.title,
            })),
        }));
        return Ok(());
    }

    println!("{}", today.format("%A, %B %-d, %Y"));
    println!();

    if !agenda.focus.is_empty() {
        println!("Focus");
        for task in &agenda.focus {
            println!("  * {}", task.title);
        }
        println!();
    }

    print_bucket("Overdue", &agenda.overdue);
    print_bucket("Today", &agenda.due_today);
    print_bucket("Upcoming", &agenda.upcoming);
    print_bucket("Completed", &agenda.completed);

    if agenda.open_count() == 0 {
        println!("Nothing due today.");
        println!();
    }

    if !habits.is_empty() {
        let done = habits.iter().filter(|h| h.completed_today).count();
        println!("Habits ({}/{})", done, habits.len());
        for summary in &habits {
            print_summary(summary);
        }
        println!();
    }

    match daily {
        Some(note) => println!("Daily note: {} ({})", note.title, note.id),
        None => println!("No daily note yet (daybook note daily)"),
    }

    Ok(())
}

/// Open tasks due on `today` that were not reminded within the window.
/// Each returned task is recorded as reminded at `now`.
fn collect_due_reminders<'a, I>(
    tasks: I,
    today: NaiveDate,
    reminded: &mut ReminderLog<'_>,
    now: DateTime<Utc>,
) -> Result<Vec<Task>>
where
    I: IntoIterator<Item = &'a Task>,
{
    reminded.prune(now)?;

    let mut due: Vec<&Task> = tasks
        .into_iter()
        .filter(|t| t.is_open() && t.due_date == Some(today))
        .collect();
    due.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.created_at.cmp(&b.created_at)));

    let mut fresh = Vec::new();
    for task in due {
        if reminded.recently_reminded(&task.id, now) {
            log::debug!("skipping {}: reminded recently", task.id);
            continue;
        }
        reminded.record(&task.id, now)?;
        fresh.push(task.clone());
    }
    Ok(fresh)
}

pub fn remind(output: &Output, clock: &Clock) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let settings = &workspace.config().workspace.reminders;

    if !settings.enabled {
        output.success("Reminders are disabled in .daybook/config.toml");
        return Ok(());
    }

    let tasks = workspace.task_store().read_all()?;
    let mut state = workspace.state_store()?;
    let mut reminded = ReminderLog::new(&mut state, settings.dedup_hours);
    let reminders = collect_due_reminders(tasks.values(), clock.today, &mut reminded, Utc::now())?;

    if output.is_json() {
        output.data(&reminders);
    } else if reminders.is_empty() {
        println!("No new reminders");
    } else {
        for task in &reminders {
            println!("Due today: {} ({}, {})", task.title, task.id, task.priority);
        }
    }

    Ok(())
}
