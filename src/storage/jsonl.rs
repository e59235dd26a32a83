//! JSONL storage for tasks, habits, reflections and focus sessions
//!
//! Each record type lives in its own `.daybook/*.jsonl` file with one JSON
//! object per line. Uses file locking for concurrent access safety.

use std::collections::HashMap;
use std::fmt::Display;
use std::fs::{self, File, OpenOptions};
use std::hash::Hash;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::{FocusSession, Habit, ItemId, Task, WeeklyReflection};

/// A record that can live in a [`JsonlStore`]
pub trait Record: Serialize + DeserializeOwned + Clone {
    type Key: Clone + Eq + Hash + Ord + Display;

    /// Human-readable record name for error messages
    const NAME: &'static str;

    fn key(&self) -> Self::Key;
}

impl Record for Task {
    type Key = ItemId;
    const NAME: &'static str = "task";

    fn key(&self) -> ItemId {
        self.id.clone()
    }
}

impl Record for Habit {
    type Key = ItemId;
    const NAME: &'static str = "habit";

    fn key(&self) -> ItemId {
        self.id.clone()
    }
}

impl Record for FocusSession {
    type Key = ItemId;
    const NAME: &'static str = "focus session";

    fn key(&self) -> ItemId {
        self.id.clone()
    }
}

impl Record for WeeklyReflection {
    type Key = NaiveDate;
    const NAME: &'static str = "reflection";

    fn key(&self) -> NaiveDate {
        self.week_start
    }
}

/// Store for records in JSONL format
pub struct JsonlStore<T: Record> {
    path: PathBuf,
    _record: PhantomData<T>,
}

pub type TaskStore = JsonlStore<Task>;
pub type HabitStore = JsonlStore<Habit>;
pub type ReflectionStore = JsonlStore<WeeklyReflection>;
pub type FocusStore = JsonlStore<FocusSession>;

impl<T: Record> JsonlStore<T> {
    /// Creates a new store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all records from the store.
    ///
    /// Later lines win over earlier ones with the same key, so appended
    /// updates shadow the original record until the next full rewrite.
    pub fn read_all(&self) -> Result<HashMap<T::Key, T>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open {} store: {}", T::NAME, self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .with_context(|| format!("Failed to acquire read lock on {} store", T::NAME))?;

        let reader = BufReader::new(&file);
        let mut records = HashMap::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let record: T = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse {} at line {}", T::NAME, line_num + 1))?;

            records.insert(record.key(), record);
        }

        log::debug!("read {} {} record(s) from {}", records.len(), T::NAME, self.path.display());

        // Lock is released when file is dropped
        Ok(records)
    }

    /// Reads all records sorted by key
    pub fn read_sorted(&self) -> Result<Vec<T>> {
        let mut records: Vec<T> = self.read_all()?.into_values().collect();
        records.sort_by_key(|r| r.key());
        Ok(records)
    }

    /// Reads a single record by key
    pub fn get(&self, key: &T::Key) -> Result<Option<T>> {
        Ok(self.read_all()?.remove(key))
    }

    /// Writes all records to the store (full rewrite)
    pub fn write_all(&self, records: &HashMap<T::Key, T>) -> Result<()> {
        self.ensure_parent()?;

        // Write to temp file first
        let temp_path = self.path.with_extension("jsonl.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            // Acquire exclusive lock
            file.lock_exclusive()
                .with_context(|| format!("Failed to acquire write lock on {} store", T::NAME))?;

            let mut writer = BufWriter::new(&file);

            // Sort by key for consistent output
            let mut sorted: Vec<_> = records.values().collect();
            sorted.sort_by_key(|r| r.key());

            for record in sorted {
                let line = serde_json::to_string(record)
                    .with_context(|| format!("Failed to serialize {}", T::NAME))?;
                writeln!(writer, "{}", line).with_context(|| format!("Failed to write {}", T::NAME))?;
            }

            writer
                .flush()
                .with_context(|| format!("Failed to flush {} store", T::NAME))?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        log::debug!("wrote {} {} record(s) to {}", records.len(), T::NAME, self.path.display());
        Ok(())
    }

    /// Appends a single record (used for quick adds without full rewrite)
    pub fn append(&self, record: &T) -> Result<()> {
        self.ensure_parent()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {} store: {}", T::NAME, self.path.display()))?;

        // Acquire exclusive lock
        file.lock_exclusive()
            .with_context(|| format!("Failed to acquire write lock on {} store", T::NAME))?;

        let mut writer = BufWriter::new(&file);
        let line = serde_json::to_string(record)
            .with_context(|| format!("Failed to serialize {}", T::NAME))?;
        writeln!(writer, "{}", line).with_context(|| format!("Failed to write {}", T::NAME))?;

        writer
            .flush()
            .with_context(|| format!("Failed to flush {} store", T::NAME))?;

        log::debug!("appended {} {}", T::NAME, record.key());
        Ok(())
    }

    /// Updates a single record (reads all, updates, writes all)
    pub fn update(&self, record: &T) -> Result<()> {
        let mut records = self.read_all()?;
        records.insert(record.key(), record.clone());
        self.write_all(&records)
    }

    /// Removes a record by key
    pub fn remove(&self, key: &T::Key) -> Result<bool> {
        let mut records = self.read_all()?;
        let removed = records.remove(key).is_some();
        if removed {
            self.write_all(&records)?;
        }
        Ok(removed)
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(())
    }
}
