//! Quick-add and parse commands

use anyhow::Result;

use super::app::Clock;
use super::output::Output;
use crate::domain::{EntryKind, Note, ParsedInput, Priority, Task};
use crate::storage::{Config, Workspace};

fn print_parsed(parsed: &ParsedInput) {
    println!("Type:     {}", parsed.kind);
    println!("Title:    {}", parsed.title);
    if let Some(due) = parsed.due_date {
        println!("Due:      {}", due);
    }
    if let Some(priority) = parsed.priority {
        println!("Priority: {}", priority);
    }
    if !parsed.tags.is_empty() {
        println!("Tags:     {}", format_tags(&parsed.tags));
    }
}

pub(super) fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("#{}", t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses text with the workspace settings, or defaults outside a workspace
pub fn parse(output: &Output, clock: &Clock, text: &str) -> Result<()> {
    let parsed = parse_entry(&Config::load()?, clock, text, None);

    if output.is_json() {
        output.data(&parsed);
    } else {
        print_parsed(&parsed);
    }

    Ok(())
}

fn parse_entry(config: &Config, clock: &Clock, text: &str, as_kind: Option<EntryKind>) -> ParsedInput {
    let mut parsed = config.workspace.quick_add.parser().parse(text, clock.now);
    if let Some(kind) = as_kind {
        parsed.kind = kind;
    }
    parsed
}

pub fn add(
    output: &Output,
    clock: &Clock,
    text: &str,
    as_kind: Option<EntryKind>,
    preview: bool,
) -> Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("Nothing to add");
    }

    if preview {
        let parsed = parse_entry(&Config::load()?, clock, text, as_kind);
        if output.is_json() {
            output.data(&parsed);
        } else {
            print_parsed(&parsed);
        }
        return Ok(());
    }

    let workspace = Workspace::open_current()?;
    let config = workspace.config();
    let parsed = parse_entry(config, clock, text, as_kind);
    output.verbose_ctx("add", &format!("parsed as {}: {:?}", parsed.kind, parsed.title));

    if parsed.title.is_empty() {
        anyhow::bail!("Nothing left to add after parsing '{}'", text.trim());
    }

    match parsed.kind {
        EntryKind::Task => {
            let default_priority = config.workspace.quick_add.default_priority;
            let task = Task::from_parsed(&parsed, clock.today, default_priority);
            workspace.task_store().append(&task)?;
            report_task(output, &task);
        }
        EntryKind::Note => {
            let note = Note::from_parsed(&parsed);
            workspace.note_store().write(&note)?;

            if output.is_json() {
                output.data(&serde_json::json!({
                    "type": "note",
                    "id": note.id.to_string(),
                    "title": note.title,
                    "tags": note.tags,
                }));
            } else {
                output.success(&format!("Created note: {} - {}", note.id, note.title));
            }
        }
    }

    Ok(())
}

fn report_task(output: &Output, task: &Task) {
    if output.is_json() {
        output.data(&serde_json::json!({
            "type": "task",
            "id": task.id.to_string(),
            "title": task.title,
            "due_date": task.due_date,
            "priority": task.priority,
            "tags": task.tags,
        }));
        return;
    }

    let mut line = format!("Created task: {} - {}", task.id, task.title);
    if let Some(due) = task.due_date {
        line.push_str(&format!(" (due {})", due));
    }
    if task.priority != Priority::Medium {
        line.push_str(&format!(" [{}]", task.priority));
    }
    output.success(&line);
}
