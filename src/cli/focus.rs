//! Focus (pomodoro) commands

use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::Subcommand;

use super::app::Clock;
use super::output::Output;
use crate::domain::{
    format_countdown, Agenda, FocusSession, FocusSummary, IdKind, ItemId, SessionKind, Task,
};
use crate::storage::{FocusStore, Workspace};

#[derive(Subcommand)]
pub enum FocusCommands {
    /// Start a work session (or a break)
    Start {
        /// Task to work on
        #[arg(long, conflicts_with = "take_break")]
        task: Option<String>,

        /// Start a break instead of a work session
        #[arg(long = "break")]
        take_break: bool,

        /// Override the configured length in minutes
        #[arg(long, short)]
        minutes: Option<u32>,
    },

    /// Stop the running session
    Stop,

    /// Show the running session and time left
    Status,

    /// List the sessions of a day
    Log {
        /// Day to show (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(cmd: FocusCommands, output: &Output, clock: &Clock) -> Result<()> {
    let workspace = Workspace::open_current()?;

    match cmd {
        FocusCommands::Start {
            task,
            take_break,
            minutes,
        } => start(output, clock, &workspace, task.as_deref(), take_break, minutes),
        FocusCommands::Stop => stop(output, clock, &workspace),
        FocusCommands::Status => status(output, clock, &workspace),
        FocusCommands::Log { date } => log_day(output, clock, &workspace, date.unwrap_or(clock.today)),
    }
}

/// The session without an end time, if any
fn running_session(store: &FocusStore) -> Result<Option<FocusSession>> {
    Ok(store
        .read_all()?
        .into_values()
        .filter(|s| s.is_running())
        .max_by_key(|s| s.started_at))
}

/// High-priority tasks, or the first few due today
fn suggested_tasks(workspace: &Workspace, today: NaiveDate) -> Result<Vec<Task>> {
    let tasks = workspace.task_store().read_all()?;
    Ok(Agenda::build(tasks.values(), today).focus_tasks().to_vec())
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

fn print_suggestions(tasks: &[Task]) {
    if tasks.is_empty() {
        return;
    }
    println!("Focus on:");
    for task in tasks {
        println!("  {:<10} {}", task.id, task.title);
    }
}

fn start(
    output: &Output,
    clock: &Clock,
    workspace: &Workspace,
    task_id: Option<&str>,
    take_break: bool,
    minutes: Option<u32>,
) -> Result<()> {
    let store = workspace.focus_store();
    if let Some(active) = running_session(&store)? {
        anyhow::bail!(
            "A {} session is already running ({}); stop it with 'daybook focus stop'",
            active.kind,
            active.id
        );
    }

    let kind = if take_break {
        SessionKind::Break
    } else {
        SessionKind::Work
    };
    let minutes = minutes.unwrap_or_else(|| workspace.config().workspace.focus.minutes_for(kind));
    if minutes == 0 {
        anyhow::bail!("A session needs at least one minute");
    }

    let task = match task_id {
        Some(id) => {
            let id = ItemId::parse_kind(id, IdKind::Task)?;
            let task = workspace
                .task_store()
                .get(&id)?
                .ok_or_else(|| anyhow::anyhow!("Task not found: {}", id))?;
            Some(task)
        }
        None => None,
    };

    let session = FocusSession::start(kind, minutes, task.as_ref().map(|t| t.id.clone()), clock.now_utc());
    store.append(&session)?;
    output.verbose_ctx("focus", &format!("started {} at {}", session.id, session.started_at));

    let suggestions = if kind == SessionKind::Work && task.is_none() {
        suggested_tasks(workspace, clock.today)?
    } else {
        Vec::new()
    };

    if output.is_json() {
        output.data(&serde_json::json!({
            "session": session,
            "ends_at": session.ends_at(),
            "task": task.as_ref().map(|t| &t.title),
            "suggestions": suggestions,
        }));
        return Ok(());
    }

    output.success(&format!(
        "Started {} minute {} session ({}), ends at {}",
        minutes,
        kind,
        session.id,
        local_time(session.ends_at())
    ));
    if let Some(task) = &task {
        println!("Working on: {} ({})", task.title, task.id);
    }
    print_suggestions(&suggestions);

    Ok(())
}

fn stop(output: &Output, clock: &Clock, workspace: &Workspace) -> Result<()> {
    let store = workspace.focus_store();
    let mut session = running_session(&store)?
        .ok_or_else(|| anyhow::anyhow!("No focus session is running"))?;

    let now = clock.now_utc();
    session.stop(now);
    store.update(&session)?;

    let minutes = session.elapsed_minutes(now);
    let next = session.kind.next();
    let next_minutes = workspace.config().workspace.focus.minutes_for(next);

    if output.is_json() {
        output.data(&serde_json::json!({
            "session": session,
            "minutes": minutes,
            "completed": session.is_complete(),
            "next": { "kind": next, "minutes": next_minutes },
        }));
        return Ok(());
    }

    let full = if session.is_complete() { " (full session)" } else { "" };
    output.success(&format!(
        "Stopped {} session {} after {} min{}",
        session.kind, session.id, minutes, full
    ));
    let flag = if next == SessionKind::Break { " --break" } else { "" };
    println!(
        "Next: {} minute {} (daybook focus start{})",
        next_minutes, next, flag
    );

    Ok(())
}

fn status(output: &Output, clock: &Clock, workspace: &Workspace) -> Result<()> {
    let store = workspace.focus_store();
    let now = clock.now_utc();

    let Some(session) = running_session(&store)? else {
        let suggestions = suggested_tasks(workspace, clock.today)?;
        if output.is_json() {
            output.data(&serde_json::json!({
                "session": null,
                "suggestions": suggestions,
            }));
        } else {
            println!("No focus session running");
            print_suggestions(&suggestions);
        }
        return Ok(());
    };

    let remaining = session.remaining(now);
    let task = match &session.task_id {
        Some(id) => workspace.task_store().get(id)?,
        None => None,
    };

    if output.is_json() {
        output.data(&serde_json::json!({
            "session": session,
            "remaining_seconds": remaining.num_seconds(),
            "task": task.as_ref().map(|t| &t.title),
        }));
        return Ok(());
    }

    if remaining.num_seconds() > 0 {
        println!(
            "{} session {}: {} left (ends at {})",
            session.kind,
            session.id,
            format_countdown(remaining),
            local_time(session.ends_at())
        );
    } else {
        println!(
            "{} session {}: time is up, run 'daybook focus stop'",
            session.kind, session.id
        );
    }
    if let Some(task) = task {
        println!("Working on: {} ({})", task.title, task.id);
    }

    Ok(())
}

fn log_day(output: &Output, clock: &Clock, workspace: &Workspace, day: NaiveDate) -> Result<()> {
    let mut sessions: Vec<FocusSession> = workspace
        .focus_store()
        .read_all()?
        .into_values()
        .filter(|s| s.started_at.with_timezone(&Local).date_naive() == day)
        .collect();
    sessions.sort_by_key(|s| s.started_at);

    let now = clock.now_utc();
    let summary = FocusSummary::build(&sessions, now);

    if output.is_json() {
        output.data(&serde_json::json!({
            "date": day,
            "sessions": sessions,
            "summary": summary,
        }));
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No focus sessions on {}", day);
        return Ok(());
    }

    let titles: HashMap<ItemId, String> = workspace
        .task_store()
        .read_all()?
        .into_iter()
        .map(|(id, task)| (id, task.title))
        .collect();

    println!("Focus sessions on {}", day.format("%A, %B %-d, %Y"));
    for session in &sessions {
        let state = if session.is_running() { " (running)" } else { "" };
        let title = session
            .task_id
            .as_ref()
            .and_then(|id| titles.get(id))
            .map(String::as_str)
            .unwrap_or("");
        println!(
            "  {}  {:<5} {:>3} min{}  {}",
            local_time(session.started_at),
            session.kind,
            session.elapsed_minutes(now),
            state,
            title
        );
    }
    println!();
    println!(
        "Focused {} min, {} min of breaks, {} full work session(s)",
        summary.work_minutes, summary.break_minutes, summary.completed_work
    );

    Ok(())
}
