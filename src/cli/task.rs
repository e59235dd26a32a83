//! Task CLI commands

use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;

use super::add::format_tags;
use super::app::Clock;
use super::output::Output;
use crate::domain::{IdKind, ItemId, Priority, Task, TaskFilter, TaskStatus};
use crate::storage::{TaskStore, Workspace};

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task with explicit fields (see `daybook add` for free text)
    Add {
        /// Task title
        title: String,

        /// Due date (YYYY-MM-DD or a word like "tomorrow" or "friday")
        #[arg(long)]
        due: Option<String>,

        /// Priority (low, medium, high)
        #[arg(long, short)]
        priority: Option<Priority>,

        /// Longer description
        #[arg(long, short)]
        description: Option<String>,

        /// Tags, repeatable
        #[arg(long = "tag", short)]
        tags: Vec<String>,
    },

    /// List open tasks
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,

        /// Show archived tasks instead
        #[arg(long, conflicts_with = "all")]
        archived: bool,

        /// Only tasks whose title contains this text
        #[arg(long, short)]
        search: Option<String>,

        /// Only tasks with this tag
        #[arg(long, short)]
        tag: Option<String>,

        /// Only tasks with this priority
        #[arg(long, short)]
        priority: Option<Priority>,
    },

    /// Show task details
    Show {
        /// Task ID
        id: String,
    },

    /// Toggle a task between todo and done
    Done {
        /// Task ID
        id: String,
    },

    /// Archive a task
    Archive {
        /// Task ID
        id: String,
    },

    /// Delete a task permanently
    Delete {
        /// Task ID
        id: String,
    },

    /// Set or clear a due date
    Due {
        /// Task ID
        id: String,

        /// New due date, or "none" to clear
        date: String,
    },

    /// Change priority
    Priority {
        /// Task ID
        id: String,

        /// New priority (low, medium, high)
        priority: Priority,
    },
}

pub fn run(cmd: TaskCommands, output: &Output, clock: &Clock) -> Result<()> {
    let workspace = Workspace::open_current()?;

    match cmd {
        TaskCommands::Add {
            title,
            due,
            priority,
            description,
            tags,
        } => add_task(output, clock, &workspace, &title, due.as_deref(), priority, description, tags),
        TaskCommands::List {
            all,
            archived,
            search,
            tag,
            priority,
        } => {
            let filter = TaskFilter {
                search,
                tag,
                priority,
            };
            list_tasks(output, clock, &workspace, all, archived, &filter)
        }
        TaskCommands::Show { id } => show_task(output, clock, &workspace, &id),
        TaskCommands::Done { id } => toggle_task(output, &workspace, &id),
        TaskCommands::Archive { id } => archive_task(output, &workspace, &id),
        TaskCommands::Delete { id } => delete_task(output, &workspace, &id),
        TaskCommands::Due { id, date } => set_due(output, clock, &workspace, &id, &date),
        TaskCommands::Priority { id, priority } => set_priority(output, &workspace, &id, priority),
    }
}

/// Reads a date given as ISO or as a quick-add date word
fn resolve_date(workspace: &Workspace, clock: &Clock, text: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d") {
        return Ok(date);
    }

    workspace
        .config()
        .workspace
        .quick_add
        .parser()
        .parse(text, clock.now)
        .due_date
        .ok_or_else(|| anyhow::anyhow!("Could not read a date from '{}'", text))
}

fn load_task(store: &TaskStore, id_str: &str) -> Result<Task> {
    let id = ItemId::parse_kind(id_str, IdKind::Task)?;
    store
        .get(&id)?
        .ok_or_else(|| anyhow::anyhow!("Task not found: {}", id))
}

#[allow(clippy::too_many_arguments)]
fn add_task(
    output: &Output,
    clock: &Clock,
    workspace: &Workspace,
    title: &str,
    due: Option<&str>,
    priority: Option<Priority>,
    description: Option<String>,
    tags: Vec<String>,
) -> Result<()> {
    let title = title.trim();
    if title.is_empty() {
        anyhow::bail!("Task title cannot be empty");
    }

    let mut task = Task::new(title);
    if let Some(due) = due {
        task.set_due_date(Some(resolve_date(workspace, clock, due)?));
    }
    task.set_priority(priority.unwrap_or(workspace.config().workspace.quick_add.default_priority));
    if let Some(description) = description {
        task.set_description(description);
    }
    task.tags = tags
        .into_iter()
        .map(|t| t.trim_start_matches('#').to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    workspace.task_store().append(&task)?;

    if output.is_json() {
        output.data(&task);
    } else {
        output.success(&format!("Created task: {} - {}", task.id, task.title));
    }

    Ok(())
}

fn status_mark(task: &Task) -> &'static str {
    match task.status {
        TaskStatus::Todo => "[ ]",
        TaskStatus::Done => "[x]",
    }
}

fn list_tasks(
    output: &Output,
    clock: &Clock,
    workspace: &Workspace,
    all: bool,
    archived: bool,
    filter: &TaskFilter,
) -> Result<()> {
    let mut tasks: Vec<Task> = workspace
        .task_store()
        .read_all()?
        .into_values()
        .filter(|t| {
            if archived {
                t.archived
            } else {
                !t.archived && (all || !t.status.is_complete())
            }
        })
        .filter(|t| filter.matches(t))
        .collect();

    // Dated tasks first, soonest first; then priority
    tasks.sort_by(|a, b| {
        a.due_date
            .is_none()
            .cmp(&b.due_date.is_none())
            .then_with(|| a.due_date.cmp(&b.due_date))
            .then_with(|| b.priority.cmp(&a.priority))
            .then_with(|| a.created_at.cmp(&b.created_at))
    });

    output.verbose_ctx("task", &format!("{} task(s) match", tasks.len()));

    if output.is_json() {
        output.data(&tasks);
    } else if tasks.is_empty() {
        println!("No tasks");
    } else {
        println!("{:<10} {:<4} {:<11} {:<7} TITLE", "ID", "", "DUE", "PRI");
        println!("{}", "-".repeat(60));

        for task in &tasks {
            let due = match task.due_date {
                Some(d) if task.is_overdue(clock.today) => format!("{}!", d),
                Some(d) => d.to_string(),
                None => "-".to_string(),
            };
            let mut line = format!(
                "{:<10} {:<4} {:<11} {:<7} {}",
                task.id,
                status_mark(task),
                due,
                task.priority,
                task.title
            );
            if !task.tags.is_empty() {
                line.push_str(&format!("  {}", format_tags(&task.tags)));
            }
            println!("{}", line);
        }
    }

    Ok(())
}

fn show_task(output: &Output, clock: &Clock, workspace: &Workspace, id_str: &str) -> Result<()> {
    let task = load_task(&workspace.task_store(), id_str)?;

    if output.is_json() {
        output.data(&task);
        return Ok(());
    }

    println!("Task: {}", task.id);
    println!("Title: {}", task.title);
    println!("Status: {}", task.status);
    println!("Priority: {}", task.priority);
    match task.due_date {
        Some(due) if task.is_overdue(clock.today) => println!("Due: {} (overdue)", due),
        Some(due) => println!("Due: {}", due),
        None => println!("Due: -"),
    }
    if !task.tags.is_empty() {
        println!("Tags: {}", format_tags(&task.tags));
    }
    if task.archived {
        println!("Archived: yes");
    }
    println!("Created: {}", task.created_at.format("%Y-%m-%d %H:%M"));
    println!("Updated: {}", task.updated_at.format("%Y-%m-%d %H:%M"));
    if let Some(completed) = task.completed_at {
        println!("Completed: {}", completed.format("%Y-%m-%d %H:%M"));
    }

    if let Some(desc) = &task.description {
        println!("\nDescription:");
        println!("{}", desc);
    }

    Ok(())
}

fn toggle_task(output: &Output, workspace: &Workspace, id_str: &str) -> Result<()> {
    let store = workspace.task_store();
    let mut task = load_task(&store, id_str)?;

    let status = task.toggle();
    store.update(&task)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": task.id.to_string(),
            "status": status,
            "completed_at": task.completed_at,
        }));
    } else if status.is_complete() {
        output.success(&format!("Completed task: {}", task.id));
    } else {
        output.success(&format!("Reopened task: {}", task.id));
    }

    Ok(())
}

fn archive_task(output: &Output, workspace: &Workspace, id_str: &str) -> Result<()> {
    let store = workspace.task_store();
    let mut task = load_task(&store, id_str)?;

    task.archive();
    store.update(&task)?;

    output.success(&format!("Archived task: {}", task.id));
    Ok(())
}

fn delete_task(output: &Output, workspace: &Workspace, id_str: &str) -> Result<()> {
    let id = ItemId::parse_kind(id_str, IdKind::Task)?;

    if !workspace.task_store().remove(&id)? {
        anyhow::bail!("Task not found: {}", id);
    }

    output.success(&format!("Deleted task: {}", id));
    Ok(())
}

fn set_due(
    output: &Output,
    clock: &Clock,
    workspace: &Workspace,
    id_str: &str,
    date: &str,
) -> Result<()> {
    let store = workspace.task_store();
    let mut task = load_task(&store, id_str)?;

    let due = if date.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(resolve_date(workspace, clock, date)?)
    };
    task.set_due_date(due);
    store.update(&task)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": task.id.to_string(),
            "due_date": task.due_date,
        }));
    } else {
        match task.due_date {
            Some(due) => output.success(&format!("{} is due {}", task.id, due)),
            None => output.success(&format!("Cleared due date for {}", task.id)),
        }
    }

    Ok(())
}

fn set_priority(output: &Output, workspace: &Workspace, id_str: &str, priority: Priority) -> Result<()> {
    let store = workspace.task_store();
    let mut task = load_task(&store, id_str)?;

    task.set_priority(priority);
    store.update(&task)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": task.id.to_string(),
            "priority": task.priority,
        }));
    } else {
        output.success(&format!("{} priority set to {}", task.id, task.priority));
    }

    Ok(())
}
