//! Storage for the vocabulary list
//!
//! The whole list lives in one JSON document:
//! ```text
//! {data-dir}/
//! └── words.json    # Array of all entries, in insertion order
//! ```
//! Writes are last-write-wins per entry; there is no transaction beyond
//! rewriting the file.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use uuid::Uuid;

use super::models::{NewEntry, VocabEntry};

#[derive(Error, Debug)]
pub enum WordStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Word not found: {0}")]
    WordNotFound(Uuid),

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Word store lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, WordStoreError>;

/// Canonical owner of the vocabulary list.
///
/// Implementors only provide whole-list reads and writes; every other
/// operation is expressed on top of those two.
pub trait WordStore: Send + Sync {
    /// All entries in insertion order
    fn list(&self) -> Result<Vec<VocabEntry>>;

    /// Replace the stored list
    fn write_all(&self, entries: &[VocabEntry]) -> Result<()>;

    fn get(&self, id: Uuid) -> Result<VocabEntry> {
        self.list()?
            .into_iter()
            .find(|w| w.id == id)
            .ok_or(WordStoreError::WordNotFound(id))
    }

    fn filter(&self, predicate: &dyn Fn(&VocabEntry) -> bool) -> Result<Vec<VocabEntry>> {
        Ok(self.list()?.into_iter().filter(|w| predicate(w)).collect())
    }

    /// Insert or replace an entry by id
    fn upsert(&self, entry: &VocabEntry) -> Result<()> {
        let mut entries = self.list()?;
        let mut updated = entry.clone();
        updated.touch();
        match entries.iter().position(|w| w.id == entry.id) {
            Some(pos) => entries[pos] = updated,
            None => entries.push(updated),
        }
        self.write_all(&entries)
    }

    /// Upsert several entries with a single write
    fn upsert_many(&self, updates: &[VocabEntry]) -> Result<()> {
        if updates.is_empty() {
            return Ok(());
        }
        let mut entries = self.list()?;
        for entry in updates {
            let mut updated = entry.clone();
            updated.touch();
            match entries.iter().position(|w| w.id == entry.id) {
                Some(pos) => entries[pos] = updated,
                None => entries.push(updated),
            }
        }
        self.write_all(&entries)
    }

    fn create(&self, draft: NewEntry) -> Result<VocabEntry> {
        let entry = VocabEntry::new(draft);
        let mut entries = self.list()?;
        entries.push(entry.clone());
        self.write_all(&entries)?;
        Ok(entry)
    }

    /// Append already-built entries (bulk import)
    fn append(&self, new_entries: Vec<VocabEntry>) -> Result<()> {
        if new_entries.is_empty() {
            return Ok(());
        }
        let mut entries = self.list()?;
        entries.extend(new_entries);
        self.write_all(&entries)
    }

    fn set_active(&self, id: Uuid, active: bool) -> Result<()> {
        let mut entries = self.list()?;
        let entry = entries
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(WordStoreError::WordNotFound(id))?;
        entry.active = active;
        entry.touch();
        self.write_all(&entries)
    }

    /// Flip the active flag, returning the new value
    fn toggle_active(&self, id: Uuid) -> Result<bool> {
        let mut entries = self.list()?;
        let entry = entries
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(WordStoreError::WordNotFound(id))?;
        entry.active = !entry.active;
        entry.touch();
        let active = entry.active;
        self.write_all(&entries)?;
        Ok(active)
    }

    /// Set the active flag on every entry matching `predicate`; returns how many matched
    fn set_group_active(&self, predicate: &dyn Fn(&VocabEntry) -> bool, active: bool) -> Result<usize> {
        let mut entries = self.list()?;
        let mut matched = 0;
        for entry in entries.iter_mut().filter(|w| predicate(w)) {
            entry.active = active;
            entry.touch();
            matched += 1;
        }
        if matched > 0 {
            self.write_all(&entries)?;
        }
        Ok(matched)
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        let mut entries = self.list()?;
        let before = entries.len();
        entries.retain(|w| w.id != id);
        if entries.len() == before {
            return Err(WordStoreError::WordNotFound(id));
        }
        self.write_all(&entries)
    }

    /// Delete several entries; unknown ids are ignored. Returns how many were removed.
    fn delete_many(&self, ids: &[Uuid]) -> Result<usize> {
        let mut entries = self.list()?;
        let before = entries.len();
        entries.retain(|w| !ids.contains(&w.id));
        let removed = before - entries.len();
        if removed > 0 {
            self.write_all(&entries)?;
        }
        Ok(removed)
    }
}

/// Word store backed by a JSON file
pub struct FileWordStore {
    base_path: PathBuf,
}

impl FileWordStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("lexideck"))
            .ok_or(WordStoreError::DataDirNotFound)
    }

    /// Create the data directory and an empty words.json if missing
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        let words_path = self.words_path();
        if !words_path.exists() {
            let empty: Vec<VocabEntry> = Vec::new();
            fs::write(&words_path, serde_json::to_string_pretty(&empty)?)?;
            log::info!("Created word list at {:?}", words_path);
        }
        Ok(())
    }

    pub fn words_path(&self) -> PathBuf {
        self.base_path.join("words.json")
    }
}

impl WordStore for FileWordStore {
    fn list(&self) -> Result<Vec<VocabEntry>> {
        let words_path = self.words_path();
        if !words_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&words_path)?;
        let entries: Vec<VocabEntry> = serde_json::from_str(&content)?;
        Ok(entries)
    }

    fn write_all(&self, entries: &[VocabEntry]) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        fs::write(self.words_path(), serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

/// Word store kept in memory, for tests and throwaway sessions
#[derive(Default)]
pub struct MemoryWordStore {
    entries: Mutex<Vec<VocabEntry>>,
}

impl MemoryWordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<VocabEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl WordStore for MemoryWordStore {
    fn list(&self) -> Result<Vec<VocabEntry>> {
        let entries = self.entries.lock().map_err(|_| WordStoreError::Poisoned)?;
        Ok(entries.clone())
    }

    fn write_all(&self, new_entries: &[VocabEntry]) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| WordStoreError::Poisoned)?;
        *entries = new_entries.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::models::{Difficulty, Translation};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn draft(home: &str) -> NewEntry {
        let mut translations = BTreeMap::new();
        translations.insert("en".to_string(), Translation::new(format!("{}-en", home), ""));
        NewEntry {
            source: "Book".to_string(),
            subtopic1: "One".to_string(),
            subtopic2: "Two".to_string(),
            home_term: home.to_string(),
            home_example: String::new(),
            translations,
        }
    }

    fn create_test_storage() -> (FileWordStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileWordStore::new(temp_dir.path().to_path_buf());
        storage.init().unwrap();
        (storage, temp_dir)
    }

    #[test]
    fn test_create_and_list() {
        let (storage, _temp) = create_test_storage();

        let created = storage.create(draft("hus")).unwrap();
        storage.create(draft("bil")).unwrap();

        let entries = storage.list().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, created.id);
        assert_eq!(entries[1].home_term, "bil");
    }

    #[test]
    fn test_list_without_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileWordStore::new(temp_dir.path().join("missing"));
        assert!(storage.list().unwrap().is_empty());
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let (storage, _temp) = create_test_storage();
        let mut first = storage.create(draft("hus")).unwrap();
        storage.create(draft("bil")).unwrap();

        first.difficulty = Difficulty::Hard;
        first.back_count = 4;
        storage.upsert(&first).unwrap();

        let entries = storage.list().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].difficulty, Difficulty::Hard);
        assert_eq!(entries[0].back_count, 4);
    }

    #[test]
    fn test_set_active_and_toggle() {
        let (storage, _temp) = create_test_storage();
        let entry = storage.create(draft("hus")).unwrap();

        storage.set_active(entry.id, false).unwrap();
        assert!(!storage.get(entry.id).unwrap().active);

        assert!(storage.toggle_active(entry.id).unwrap());
        assert!(storage.get(entry.id).unwrap().active);

        let missing = storage.set_active(Uuid::new_v4(), true);
        assert!(matches!(missing, Err(WordStoreError::WordNotFound(_))));
    }

    #[test]
    fn test_group_active_and_filter() {
        let store = MemoryWordStore::new();
        store.create(draft("hus")).unwrap();
        store.create(draft("bil")).unwrap();
        store.create(draft("båt")).unwrap();

        let changed = store
            .set_group_active(&|w: &VocabEntry| w.home_term.starts_with('b'), false)
            .unwrap();
        assert_eq!(changed, 2);

        let active = store.filter(&|w: &VocabEntry| w.active).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].home_term, "hus");
    }

    #[test]
    fn test_delete_and_delete_many() {
        let store = MemoryWordStore::new();
        let a = store.create(draft("a")).unwrap();
        let b = store.create(draft("b")).unwrap();
        let c = store.create(draft("c")).unwrap();

        store.delete(a.id).unwrap();
        assert!(store.delete(a.id).is_err());

        let removed = store.delete_many(&[b.id, c.id, Uuid::new_v4()]).unwrap();
        assert_eq!(removed, 2);
        assert!(store.list().unwrap().is_empty());
    }
}
