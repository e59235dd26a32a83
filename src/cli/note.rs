//! Note CLI commands

use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;

use super::add::format_tags;
use super::app::Clock;
use super::output::Output;
use crate::domain::{IdKind, ItemId, Note, NoteFilter};
use crate::storage::{NoteStore, Workspace};

#[derive(Subcommand)]
pub enum NoteCommands {
    /// Create a note
    New {
        /// Note title
        title: String,

        /// Initial markdown content
        #[arg(long, short, allow_hyphen_values = true)]
        content: Option<String>,

        /// Tags, repeatable
        #[arg(long = "tag", short)]
        tags: Vec<String>,
    },

    /// List notes, pinned first
    List {
        /// Include archived notes
        #[arg(long)]
        archived: bool,

        /// Only notes whose title or content contains this text
        #[arg(long, short)]
        search: Option<String>,

        /// Only notes with this tag
        #[arg(long, short)]
        tag: Option<String>,
    },

    /// Show a note and the notes it links to
    Show {
        /// Note ID
        id: String,
    },

    /// Pin a note to the top of the list
    Pin {
        /// Note ID
        id: String,
    },

    /// Unpin a note
    Unpin {
        /// Note ID
        id: String,
    },

    /// Archive a note
    Archive {
        /// Note ID
        id: String,
    },

    /// Delete a note permanently
    Delete {
        /// Note ID
        id: String,
    },

    /// Open (or create) the daily note
    Daily {
        /// Date of the daily note (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Append a line to the note
        #[arg(long, allow_hyphen_values = true)]
        append: Option<String>,
    },
}

pub fn run(cmd: NoteCommands, output: &Output, clock: &Clock) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let store = workspace.note_store();

    match cmd {
        NoteCommands::New {
            title,
            content,
            tags,
        } => new_note(output, &store, &title, content, tags),
        NoteCommands::List {
            archived,
            search,
            tag,
        } => list_notes(output, &store, archived, &NoteFilter { search, tag }),
        NoteCommands::Show { id } => show_note(output, &store, &id),
        NoteCommands::Pin { id } => set_pinned(output, &store, &id, true),
        NoteCommands::Unpin { id } => set_pinned(output, &store, &id, false),
        NoteCommands::Archive { id } => archive_note(output, &store, &id),
        NoteCommands::Delete { id } => delete_note(output, &store, &id),
        NoteCommands::Daily { date, append } => {
            daily_note(output, &store, date.unwrap_or(clock.today), append.as_deref())
        }
    }
}

fn load_note(store: &NoteStore, id_str: &str) -> Result<Note> {
    let id = ItemId::parse_kind(id_str, IdKind::Note)?;
    store
        .read(&id)?
        .ok_or_else(|| anyhow::anyhow!("Note not found: {}", id))
}

fn new_note(
    output: &Output,
    store: &NoteStore,
    title: &str,
    content: Option<String>,
    tags: Vec<String>,
) -> Result<()> {
    let title = title.trim();
    if title.is_empty() {
        anyhow::bail!("Note title cannot be empty");
    }

    let mut note = Note::new(title);
    if let Some(content) = content {
        note.set_content(content);
    }
    note.tags = tags
        .into_iter()
        .map(|t| t.trim_start_matches('#').to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    store.write(&note)?;

    if output.is_json() {
        output.data(&note);
    } else {
        output.success(&format!("Created note: {} - {}", note.id, note.title));
    }

    Ok(())
}

fn list_notes(
    output: &Output,
    store: &NoteStore,
    include_archived: bool,
    filter: &NoteFilter,
) -> Result<()> {
    let notes: Vec<Note> = store
        .list(include_archived)?
        .into_iter()
        .filter(|n| filter.matches(n))
        .collect();

    if output.is_json() {
        let items: Vec<_> = notes
            .iter()
            .map(|n| {
                serde_json::json!({
                    "id": n.id.to_string(),
                    "title": n.title,
                    "tags": n.tags,
                    "pinned": n.pinned,
                    "archived": n.archived,
                    "daily_date": n.daily_date,
                    "updated_at": n.updated_at,
                })
            })
            .collect();
        output.data(&items);
    } else if notes.is_empty() {
        println!("No notes");
    } else {
        println!("{:<10} {:<2} {:<17} TITLE", "ID", "", "UPDATED");
        println!("{}", "-".repeat(60));

        for note in &notes {
            let flag = if note.pinned {
                "*"
            } else if note.archived {
                "a"
            } else {
                ""
            };
            let mut line = format!(
                "{:<10} {:<2} {:<17} {}",
                note.id,
                flag,
                note.updated_at.format("%Y-%m-%d %H:%M"),
                note.title
            );
            if !note.tags.is_empty() {
                line.push_str(&format!("  {}", format_tags(&note.tags)));
            }
            println!("{}", line);
        }
    }

    Ok(())
}

fn show_note(output: &Output, store: &NoteStore, id_str: &str) -> Result<()> {
    let note = load_note(store, id_str)?;

    // Resolve [[Title]] links against existing notes
    let mut links = Vec::new();
    for title in note.linked_titles() {
        let target = store.find_by_title(&title)?;
        links.push((title, target.map(|n| n.id)));
    }

    if output.is_json() {
        let resolved: Vec<_> = links
            .iter()
            .map(|(title, id)| {
                serde_json::json!({
                    "title": title,
                    "id": id.as_ref().map(|i| i.to_string()),
                })
            })
            .collect();
        output.data(&serde_json::json!({
            "note": note,
            "links": resolved,
        }));
        return Ok(());
    }

    println!("# {}", note.title);
    let mut meta = vec![note.id.to_string()];
    if note.pinned {
        meta.push("pinned".to_string());
    }
    if note.archived {
        meta.push("archived".to_string());
    }
    if !note.tags.is_empty() {
        meta.push(format_tags(&note.tags));
    }
    println!("{}", meta.join(" | "));
    println!();

    if note.content.trim().is_empty() {
        println!("(empty)");
    } else {
        println!("{}", note.content.trim_end());
    }

    if !links.is_empty() {
        println!("\nLinks:");
        for (title, id) in &links {
            match id {
                Some(id) => println!("  [[{}]] -> {}", title, id),
                None => println!("  [[{}]] (missing)", title),
            }
        }
    }

    Ok(())
}

fn set_pinned(output: &Output, store: &NoteStore, id_str: &str, pinned: bool) -> Result<()> {
    let mut note = load_note(store, id_str)?;
    note.set_pinned(pinned);
    store.write(&note)?;

    let verb = if pinned { "Pinned" } else { "Unpinned" };
    output.success(&format!("{} note: {}", verb, note.id));
    Ok(())
}

fn archive_note(output: &Output, store: &NoteStore, id_str: &str) -> Result<()> {
    let mut note = load_note(store, id_str)?;
    note.archive();
    store.write(&note)?;

    output.success(&format!("Archived note: {}", note.id));
    Ok(())
}

fn delete_note(output: &Output, store: &NoteStore, id_str: &str) -> Result<()> {
    let id = ItemId::parse_kind(id_str, IdKind::Note)?;

    if !store.remove(&id)? {
        anyhow::bail!("Note not found: {}", id);
    }

    output.success(&format!("Deleted note: {}", id));
    Ok(())
}

fn daily_note(output: &Output, store: &NoteStore, date: NaiveDate, append: Option<&str>) -> Result<()> {
    let (mut note, created) = store.daily_or_create(date)?;
    output.verbose_ctx("daily", &format!("{} daily note {}", if created { "created" } else { "found" }, note.id));

    if let Some(text) = append {
        note.append(text);
        store.write(&note)?;
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "note": note,
            "created": created,
        }));
        return Ok(());
    }

    if created {
        output.success(&format!("Created daily note: {} - {}", note.id, note.title));
    }
    println!("# {}", note.title);
    if !note.content.trim().is_empty() {
        println!();
        println!("{}", note.content.trim_end());
    }

    Ok(())
}
