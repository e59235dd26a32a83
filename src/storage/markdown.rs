//! Markdown storage for notes
//!
//! Notes are stored as markdown files in `.daybook/notes/`.
//! Each file has YAML frontmatter for metadata and a markdown body.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use fs2::FileExt;

use crate::domain::{ItemId, Note, NoteFrontmatter};

/// Store for notes as markdown files
pub struct NoteStore {
    /// Directory containing note files
    dir: PathBuf,
}

impl NoteStore {
    /// Creates a new note store at the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory containing note files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path to a note file
    fn note_path(&self, id: &ItemId) -> PathBuf {
        self.dir.join(format!("{}.md", id))
    }

    /// Reads a note from a file
    fn read_from_file(&self, path: &Path) -> Result<Note> {
        let mut file = File::open(path)
            .with_context(|| format!("Failed to open note file: {}", path.display()))?;
        file.lock_shared()
            .with_context(|| format!("Failed to acquire read lock on {}", path.display()))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .with_context(|| format!("Failed to read note file: {}", path.display()))?;

        parse_markdown(&content)
            .with_context(|| format!("Failed to parse note file: {}", path.display()))
    }

    /// Writes a note to its file atomically (temp file + rename)
    fn write_to_file(&self, note: &Note) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;

        let path = self.note_path(&note.id);
        let temp_path = path.with_extension("md.tmp");
        let content = render_markdown(note)?;

        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
            file.lock_exclusive()
                .with_context(|| format!("Failed to acquire write lock on {}", temp_path.display()))?;
            file.write_all(content.as_bytes())
                .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;
        }

        // Atomic rename
        fs::rename(&temp_path, &path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }

    /// Reads all notes; files that fail to parse are skipped with a warning
    pub fn read_all(&self) -> Result<HashMap<ItemId, Note>> {
        let mut notes = HashMap::new();

        if !self.dir.exists() {
            return Ok(notes);
        }

        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read directory: {}", self.dir.display()))?
        {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.extension().is_some_and(|e| e == "md") {
                match self.read_from_file(&path) {
                    Ok(note) => {
                        notes.insert(note.id.clone(), note);
                    }
                    Err(e) => log::warn!("skipping note {}: {:#}", path.display(), e),
                }
            }
        }

        Ok(notes)
    }

    /// Lists notes: pinned first, then most recently updated
    pub fn list(&self, include_archived: bool) -> Result<Vec<Note>> {
        let mut notes: Vec<Note> = self
            .read_all()?
            .into_values()
            .filter(|n| include_archived || !n.archived)
            .collect();
        notes.sort_by(|a, b| {
            b.pinned
                .cmp(&a.pinned)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
        });
        Ok(notes)
    }

    /// Reads a single note by ID
    pub fn read(&self, id: &ItemId) -> Result<Option<Note>> {
        let path = self.note_path(id);
        if !path.exists() {
            return Ok(None);
        }

        Ok(Some(self.read_from_file(&path)?))
    }

    /// Finds a note by title (case-insensitive)
    pub fn find_by_title(&self, title: &str) -> Result<Option<Note>> {
        Ok(self
            .read_all()?
            .into_values()
            .find(|n| n.title.eq_ignore_ascii_case(title.trim())))
    }

    /// Finds the daily note for a date
    pub fn daily(&self, date: NaiveDate) -> Result<Option<Note>> {
        Ok(self
            .read_all()?
            .into_values()
            .find(|n| n.daily_date == Some(date)))
    }

    /// Returns the daily note for a date, creating it if missing.
    /// The flag is true when the note was created.
    pub fn daily_or_create(&self, date: NaiveDate) -> Result<(Note, bool)> {
        if let Some(note) = self.daily(date)? {
            return Ok((note, false));
        }

        let note = Note::daily(date);
        self.write(&note)?;
        log::debug!("created daily note {} for {}", note.id, date);
        Ok((note, true))
    }

    /// Writes a note
    pub fn write(&self, note: &Note) -> Result<()> {
        self.write_to_file(note)
    }

    /// Removes a note by ID
    pub fn remove(&self, id: &ItemId) -> Result<bool> {
        let path = self.note_path(id);
        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path)
            .with_context(|| format!("Failed to remove note file: {}", path.display()))?;

        Ok(true)
    }

    /// Checks if a note exists
    pub fn exists(&self, id: &ItemId) -> bool {
        self.note_path(id).exists()
    }
}

/// Parses a markdown string into a Note
fn parse_markdown(content: &str) -> Result<Note> {
    let content = content.trim_start();

    let rest = content
        .strip_prefix("---")
        .ok_or_else(|| anyhow::anyhow!("Missing frontmatter (must start with ---)"))?;

    // Find the end of frontmatter
    let end_pos = rest
        .find("\n---")
        .ok_or_else(|| anyhow::anyhow!("Missing frontmatter end delimiter (---)"))?;

    let yaml_content = rest[..end_pos].trim();
    let body = rest[end_pos + 4..].trim_start_matches(['\r', '\n']);

    let fm: NoteFrontmatter =
        serde_yaml::from_str(yaml_content).context("Failed to parse frontmatter")?;

    Ok(fm.into_note(body.to_string()))
}

/// Renders a note to markdown
fn render_markdown(note: &Note) -> Result<String> {
    let frontmatter = NoteFrontmatter::from(note);
    let yaml = serde_yaml::to_string(&frontmatter).context("Failed to serialize frontmatter")?;

    let mut content = String::new();
    content.push_str("---\n");
    content.push_str(&yaml);
    content.push_str("---\n\n");
    content.push_str(&note.content);

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> NoteStore {
        NoteStore::new(dir.path().join("notes"))
    }

    #[test]
    fn read_empty_store() {
        let dir = TempDir::new().unwrap();

        let notes = store(&dir).read_all().unwrap();
        assert!(notes.is_empty());
    }

    #[test]
    fn write_and_read_note() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let mut note = Note::new("Reading List");
        note.set_content("# Books\n\n- Dune\n- [[Garden]] ideas --- maybe\n");
        note.tags = vec!["reading".to_string()];

        store.write(&note).unwrap();

        let loaded = store.read(&note.id).unwrap().unwrap();
        assert_eq!(loaded, note);
    }

    #[test]
    fn list_puts_pinned_first_and_hides_archived() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let plain = Note::new("Plain");
        let mut pinned = Note::new("Pinned");
        pinned.set_pinned(true);
        let mut archived = Note::new("Archived");
        archived.archive();

        store.write(&plain).unwrap();
        store.write(&pinned).unwrap();
        store.write(&archived).unwrap();

        let titles: Vec<String> = store.list(false).unwrap().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["Pinned", "Plain"]);
        assert_eq!(store.list(true).unwrap().len(), 3);
    }

    #[test]
    fn daily_note_is_created_once() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();

        let (first, created) = store.daily_or_create(date).unwrap();
        assert!(created);
        assert_eq!(first.title, "Wednesday, January 10, 2024");

        let (second, created) = store.daily_or_create(date).unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
        assert_eq!(store.read_all().unwrap().len(), 1);
    }

    #[test]
    fn find_by_title_ignores_case() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.write(&Note::new("Garden")).unwrap();

        assert!(store.find_by_title("garden").unwrap().is_some());
        assert!(store.find_by_title("orchard").unwrap().is_none());
    }

    #[test]
    fn remove_note() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let note = Note::new("Test");
        store.write(&note).unwrap();
        assert!(store.exists(&note.id));

        assert!(store.remove(&note.id).unwrap());
        assert!(!store.exists(&note.id));
        assert!(!store.remove(&note.id).unwrap());
    }

    #[test]
    fn broken_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.write(&Note::new("Good")).unwrap();
        fs::write(store.dir().join("n-0000000.md"), "no frontmatter here").unwrap();

        assert_eq!(store.read_all().unwrap().len(), 1);
    }

    #[test]
    fn atomic_write_no_temp_file_left() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let note = Note::new("Atomic Test");
        store.write(&note).unwrap();

        let temp_path = store.note_path(&note.id).with_extension("md.tmp");
        assert!(!temp_path.exists(), "Temp file should be removed after atomic write");
        assert!(store.note_path(&note.id).exists());
    }

    #[test]
    fn locks_are_released_after_io() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let note = Note::new("Locked");
        store.write(&note).unwrap();
        assert!(store.read(&note.id).unwrap().is_some());

        let file = File::open(store.note_path(&note.id)).unwrap();
        file.try_lock_exclusive().unwrap();
        FileExt::unlock(&file).unwrap();
    }
}
