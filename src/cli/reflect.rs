//! Weekly reflection commands

use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;

use super::app::Clock;
use super::output::Output;
use crate::domain::{week_start, ReflectionField, WeeklyReflection};
use crate::storage::{ReflectionStore, Workspace};

#[derive(Subcommand)]
pub enum ReflectCommands {
    /// Show the reflection for a week
    Show {
        /// Any day in the week (defaults to today)
        #[arg(long)]
        week: Option<NaiveDate>,
    },

    /// Write one section of a weekly reflection
    Set {
        /// Section: wins, lessons or notes
        field: ReflectionField,

        /// New text for the section
        #[arg(allow_hyphen_values = true)]
        text: String,

        /// Any day in the week (defaults to today)
        #[arg(long)]
        week: Option<NaiveDate>,
    },

    /// List past reflections, newest first
    List,
}

pub fn run(cmd: ReflectCommands, output: &Output, clock: &Clock) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let store = workspace.reflection_store();

    match cmd {
        ReflectCommands::Show { week } => show(output, &store, week.unwrap_or(clock.today)),
        ReflectCommands::Set { field, text, week } => {
            set(output, &store, field, &text, week.unwrap_or(clock.today))
        }
        ReflectCommands::List => list(output, &store),
    }
}

fn print_section(label: &str, text: &str) {
    println!("{}:", label);
    if text.trim().is_empty() {
        println!("  -");
    } else {
        for line in text.lines() {
            println!("  {}", line);
        }
    }
}

fn show(output: &Output, store: &ReflectionStore, day: NaiveDate) -> Result<()> {
    let reflection = store
        .get(&week_start(day))?
        .unwrap_or_else(|| WeeklyReflection::for_week_of(day));

    if output.is_json() {
        output.data(&reflection);
        return Ok(());
    }

    println!("Week of {}", reflection.week_start.format("%B %-d, %Y"));
    print_section("Wins", &reflection.wins);
    print_section("Lessons", &reflection.lessons);
    print_section("Notes", &reflection.notes);
    Ok(())
}

fn set(
    output: &Output,
    store: &ReflectionStore,
    field: ReflectionField,
    text: &str,
    day: NaiveDate,
) -> Result<()> {
    let mut reflection = store
        .get(&week_start(day))?
        .unwrap_or_else(|| WeeklyReflection::for_week_of(day));

    reflection.set(field, text.trim());
    store.update(&reflection)?;

    if output.is_json() {
        output.data(&reflection);
    } else {
        output.success(&format!("Updated reflection for week of {}", reflection.week_start));
    }

    Ok(())
}

fn list(output: &Output, store: &ReflectionStore) -> Result<()> {
    let mut reflections: Vec<WeeklyReflection> = store
        .read_sorted()?
        .into_iter()
        .filter(|r| !r.is_empty())
        .collect();
    reflections.reverse();

    if output.is_json() {
        output.data(&reflections);
    } else if reflections.is_empty() {
        println!("No reflections yet");
    } else {
        for r in &reflections {
            let first_win = r.wins.lines().next().unwrap_or("");
            println!("{}  {}", r.week_start, first_win);
        }
    }

    Ok(())
}
