use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use lexideck_lib::exchange::{self, FolderSyncSummary, ImportSummary};
use lexideck_lib::settings::{Settings, SettingsStore};
use lexideck_lib::words::{FileWordStore, NewEntry, VocabEntry, WordStore};

/// Shared application state for CLI commands
pub struct App {
    pub store: Arc<FileWordStore>,
    pub settings: SettingsStore,
}

impl App {
    /// Open the word store under `data_dir` (default: the user data directory)
    pub fn new(data_dir: Option<&Path>) -> Result<Self> {
        let data_dir: PathBuf = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => FileWordStore::default_data_dir().context("Failed to get data directory")?,
        };
        let store = FileWordStore::new(data_dir);
        store.init().context("Failed to initialize word store")?;

        let settings_path = SettingsStore::default_path().context("Failed to get config directory")?;
        let settings = SettingsStore::load(&settings_path)
            .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;

        Ok(Self {
            store: Arc::new(store),
            settings,
        })
    }

    pub fn settings(&self) -> &Settings {
        self.settings.settings()
    }

    pub fn list_words(&self) -> Result<Vec<VocabEntry>> {
        self.store.list().context("Failed to list words")
    }

    /// Find a word by id prefix or home term (case-insensitive, exact then prefix)
    pub fn find_word(&self, query: &str) -> Result<VocabEntry> {
        let words = self.list_words()?;
        let query_lower = query.to_lowercase();

        if let Some(w) = words
            .iter()
            .find(|w| w.id.to_string() == query_lower || w.home_term.to_lowercase() == query_lower)
        {
            return Ok(w.clone());
        }

        let matches: Vec<&VocabEntry> = words
            .iter()
            .filter(|w| {
                w.id.to_string().starts_with(&query_lower) || w.home_term.to_lowercase().starts_with(&query_lower)
            })
            .collect();

        match matches.len() {
            0 => bail!("No word matching '{}'", query),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous word '{}'. Matches:\n{}",
                query,
                matches
                    .iter()
                    .map(|w| format!("  - {} ({}) [{}]", w.home_term, w.topic_path(), &w.id.to_string()[..8]))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }

    pub fn add_word(&self, draft: NewEntry) -> Result<VocabEntry> {
        let key = draft.duplicate_key();
        if self.list_words()?.iter().any(|w| w.duplicate_key() == key) {
            bail!("'{}' already exists under {} / {} / {}", draft.home_term, draft.source, draft.subtopic1, draft.subtopic2);
        }
        self.store.create(draft).context("Failed to create word")
    }

    pub fn toggle_word(&self, query: &str) -> Result<(VocabEntry, bool)> {
        let word = self.find_word(query)?;
        let active = self.store.toggle_active(word.id).context("Failed to toggle word")?;
        Ok((word, active))
    }

    /// Set the active flag on every word under a topic path; empty parts match anything
    pub fn set_topic_active(
        &self,
        source: &str,
        subtopic1: Option<&str>,
        subtopic2: Option<&str>,
        active: bool,
    ) -> Result<usize> {
        let source = source.to_lowercase();
        let sub1 = subtopic1.map(str::to_lowercase);
        let sub2 = subtopic2.map(str::to_lowercase);
        let matches = move |w: &VocabEntry| {
            w.source.to_lowercase() == source
                && sub1.as_deref().map_or(true, |s| w.subtopic1.to_lowercase() == s)
                && sub2.as_deref().map_or(true, |s| w.subtopic2.to_lowercase() == s)
        };
        self.store
            .set_group_active(&matches, active)
            .context("Failed to update words")
    }

    pub fn delete_words(&self, queries: &[String]) -> Result<Vec<VocabEntry>> {
        let words = queries
            .iter()
            .map(|q| self.find_word(q))
            .collect::<Result<Vec<_>>>()?;
        let ids: Vec<_> = words.iter().map(|w| w.id).collect();
        self.store.delete_many(&ids).context("Failed to delete words")?;
        Ok(words)
    }

    pub fn import(&self, path: &Path) -> Result<ImportSummary> {
        exchange::import_csv_file(self.store.as_ref(), path)
            .with_context(|| format!("Failed to import {}", path.display()))
    }

    pub fn export(&self, path: &Path) -> Result<usize> {
        exchange::export_to_file(self.store.as_ref(), path)
            .with_context(|| format!("Failed to export to {}", path.display()))
    }

    pub fn sync(&self, dir: &Path) -> Result<FolderSyncSummary> {
        exchange::sync_folder(self.store.as_ref(), dir)
            .with_context(|| format!("Failed to sync {}", dir.display()))
    }
}
