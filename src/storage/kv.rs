//! Small key-value state store
//!
//! Backs reminder bookkeeping in `.daybook/state.json`. Commands take a
//! `&mut dyn KeyValueStore` so tests can swap in [`MemoryStore`].

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use fs2::FileExt;

use crate::domain::ItemId;

/// String key-value persistence
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;

    /// Keys starting with `prefix`, sorted
    fn keys_with_prefix(&self, prefix: &str) -> Vec<String>;
}

/// In-memory store, mostly for tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect()
    }
}

/// JSON object on disk, rewritten atomically on every change
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens the store. A missing file starts empty; a file that does not
    /// parse is logged and reset. Read and lock failures are errors.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = if path.exists() {
            Self::read_locked(&path)?
        } else {
            String::new()
        };

        let entries = if content.trim().is_empty() {
            BTreeMap::new()
        } else {
            match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("resetting state file {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            }
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_locked(path: &Path) -> Result<String> {
        let mut file = File::open(path)
            .with_context(|| format!("Failed to open state file: {}", path.display()))?;
        file.lock_shared()
            .context("Failed to acquire read lock on state file")?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;
        Ok(content)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
            file.lock_exclusive()
                .context("Failed to acquire write lock on state file")?;

            let mut writer = BufWriter::new(&file);
            serde_json::to_writer_pretty(&mut writer, &self.entries)
                .context("Failed to serialize state")?;
            writer.flush().context("Failed to flush state file")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect()
    }
}

const REMINDER_PREFIX: &str = "reminded:";

/// Tracks when each task was last reminded about
pub struct ReminderLog<'a> {
    store: &'a mut dyn KeyValueStore,
    window: Duration,
}

impl<'a> ReminderLog<'a> {
    pub fn new(store: &'a mut dyn KeyValueStore, dedup_hours: u32) -> Self {
        Self {
            store,
            window: Duration::hours(i64::from(dedup_hours)),
        }
    }

    fn key(id: &ItemId) -> String {
        format!("{}{}", REMINDER_PREFIX, id)
    }

    fn stamp(&self, key: &str) -> Option<DateTime<Utc>> {
        let raw = self.store.get(key)?;
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(e) => {
                log::warn!("ignoring bad reminder stamp for {}: {}", key, e);
                None
            }
        }
    }

    /// True if the task was reminded less than one window before `now`
    pub fn recently_reminded(&self, id: &ItemId, now: DateTime<Utc>) -> bool {
        self.stamp(&Self::key(id))
            .is_some_and(|at| now.signed_duration_since(at) < self.window)
    }

    pub fn record(&mut self, id: &ItemId, now: DateTime<Utc>) -> Result<()> {
        self.store.set(&Self::key(id), now.to_rfc3339())
    }

    /// Drops stamps older than the window; returns how many went
    pub fn prune(&mut self, now: DateTime<Utc>) -> Result<usize> {
        let mut pruned = 0;
        for key in self.store.keys_with_prefix(REMINDER_PREFIX) {
            let stale = self
                .stamp(&key)
                .is_none_or(|at| now.signed_duration_since(at) >= self.window);
            if stale {
                self.store.remove(&key)?;
                pruned += 1;
            }
        }
        if pruned > 0 {
            log::debug!("pruned {} reminder stamp(s)", pruned);
        }
        Ok(pruned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, hour, 0, 0).unwrap()
    }

    #[test]
    fn reminder_dedup_window() {
        let mut store = MemoryStore::default();
        let id = ItemId::task("Pay rent", at(0));

        let mut log = ReminderLog::new(&mut store, 24);
        assert!(!log.recently_reminded(&id, at(8)));

        log.record(&id, at(8)).unwrap();
        assert!(log.recently_reminded(&id, at(9)));
        assert!(log.recently_reminded(&id, at(8) + Duration::hours(23)));
        assert!(!log.recently_reminded(&id, at(8) + Duration::hours(24)));
    }

    #[test]
    fn prune_drops_old_and_garbage_stamps() {
        let mut store = MemoryStore::default();
        let old = ItemId::task("old", at(0));
        let fresh = ItemId::task("fresh", at(0));
        store.set("reminded:t-bad0000", "yesterday".to_string()).unwrap();
        store.set("other", "kept".to_string()).unwrap();

        let mut log = ReminderLog::new(&mut store, 4);
        log.record(&old, at(1)).unwrap();
        log.record(&fresh, at(9)).unwrap();

        assert_eq!(log.prune(at(10)).unwrap(), 2);
        assert!(log.recently_reminded(&fresh, at(10)));

        assert_eq!(store.keys_with_prefix("reminded:").len(), 1);
        assert_eq!(store.get("other").as_deref(), Some("kept"));
    }

    #[test]
    fn json_file_store_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("a", "1".to_string()).unwrap();
        store.set("b", "2".to_string()).unwrap();
        store.remove("a").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("a"), None);
        assert_eq!(reopened.get("b").as_deref(), Some("2"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_state_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.keys_with_prefix("").is_empty());
    }

    #[test]
    fn unreadable_state_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::create_dir_all(&path).unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read state file"));
    }
}
