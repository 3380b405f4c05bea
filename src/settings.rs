//! User settings
//!
//! Stored as TOML at `{config-dir}/lexideck/settings.toml`. A missing file
//! means defaults; unknown or out-of-range values are replaced by defaults
//! on load. Changes go through [`SettingsStore::update`], which saves and
//! then pushes the new settings to every subscriber.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flashcards::gestures::{GestureActionMap, DEFAULT_SWIPE_THRESHOLD};
use crate::flashcards::DEFAULT_INITIAL_DECK_SIZE;
use crate::languages::{find_language, DEFAULT_LANGUAGE};
use crate::words::Face;

pub const DEFAULT_THEME: &str = "dark-default";
pub const DEFAULT_REVEAL_DELAY_MS: u64 = 2000;
pub const DEFAULT_TTS_COMMAND: &str = "espeak-ng -v {voice}";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Could not serialize settings: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Config directory not found")]
    ConfigDirNotFound,
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// A color theme: primary, secondary, accent and background as hex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub colors: [&'static str; 4],
}

pub const THEMES: &[Theme] = &[
    Theme { id: "dark-default", name: "Default Dark", colors: ["#6366f1", "#a855f7", "#10b981", "#1f2937"] },
    Theme { id: "light-classic", name: "Classic Light", colors: ["#3b82f6", "#8b5cf6", "#16a34a", "#f3f4f6"] },
    Theme { id: "dark-ocean", name: "Ocean Dark", colors: ["#06b6d4", "#3b82f6", "#f59e0b", "#1e293b"] },
    Theme { id: "dark-sunset", name: "Sunset Dark", colors: ["#f97316", "#ef4444", "#eab308", "#292524"] },
    Theme { id: "dark-forest", name: "Forest Dark", colors: ["#16a34a", "#ca8a04", "#0ea5e9", "#2d3f3c"] },
    Theme { id: "dark-midnight", name: "Midnight Dark", colors: ["#3b82f6", "#4f46e5", "#84cc16", "#0f172a"] },
    Theme { id: "dark-grape", name: "Grape Dark", colors: ["#a855f7", "#ec4899", "#22d3ee", "#1f2937"] },
    Theme { id: "dark-crimson", name: "Crimson Dark", colors: ["#dc2626", "#be123c", "#9ca3af", "#262626"] },
    Theme { id: "dark-cyber", name: "Cyber Dark", colors: ["#22d3ee", "#a3e635", "#d946ef", "#1a1a1a"] },
    Theme { id: "light-solar", name: "Solar Light", colors: ["#f59e0b", "#f97316", "#0ea5e9", "#f8fafc"] },
];

pub fn find_theme(id: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|t| t.id == id)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Translation language code
    pub language: String,
    pub start_face: Face,
    pub initial_deck_size: usize,
    /// Delay between reveal stages
    pub reveal_delay_ms: u64,
    pub swipe_threshold: f32,
    pub theme: String,
    /// Speech command; `{lang}` is the full tag, `{voice}` its primary subtag
    pub tts_command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gestures: GestureActionMap,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            start_face: Face::Home,
            initial_deck_size: DEFAULT_INITIAL_DECK_SIZE,
            reveal_delay_ms: DEFAULT_REVEAL_DELAY_MS,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            theme: DEFAULT_THEME.to_string(),
            tts_command: DEFAULT_TTS_COMMAND.to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gestures: GestureActionMap::default(),
        }
    }
}

impl Settings {
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn theme(&self) -> &'static Theme {
        find_theme(&self.theme).unwrap_or(&THEMES[0])
    }

    /// Replace values that cannot be used with their defaults
    pub fn sanitize(&mut self) {
        let defaults = Settings::default();
        if find_language(&self.language).is_none() {
            log::warn!("Unknown language '{}', using '{}'", self.language, defaults.language);
            self.language = defaults.language;
        }
        if find_theme(&self.theme).is_none() {
            log::warn!("Unknown theme '{}', using '{}'", self.theme, defaults.theme);
            self.theme = defaults.theme;
        }
        if self.initial_deck_size == 0 {
            self.initial_deck_size = defaults.initial_deck_size;
        }
        if !(self.swipe_threshold.is_finite() && self.swipe_threshold > 0.0) {
            self.swipe_threshold = defaults.swipe_threshold;
        }
        if self.tts_command.trim().is_empty() {
            self.tts_command = defaults.tts_command;
        }
    }
}

/// Owns the settings file and broadcasts changes
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
    subscribers: Vec<Sender<Settings>>,
}

impl SettingsStore {
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("lexideck").join("settings.toml"))
            .ok_or(SettingsError::ConfigDirNotFound)
    }

    /// Load settings from `path`, falling back to defaults if the file is missing
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut settings = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str::<Settings>(&content)?
        } else {
            log::debug!("No settings at {:?}, using defaults", path);
            Settings::default()
        };
        settings.sanitize();

        Ok(Self {
            path,
            settings,
            subscribers: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Receive a copy of the settings after every successful update
    pub fn subscribe(&mut self) -> Receiver<Settings> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Apply `change`, save, and notify subscribers
    pub fn update(&mut self, change: impl FnOnce(&mut Settings)) -> Result<&Settings> {
        let mut next = self.settings.clone();
        change(&mut next);
        next.sanitize();
        self.settings = next;
        self.save()?;

        let snapshot = self.settings.clone();
        self.subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
        Ok(&self.settings)
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(&self.settings)?)?;
        log::debug!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::gestures::{Direction, GestureAction};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let store = SettingsStore::load(temp.path().join("settings.toml")).unwrap();
        assert_eq!(store.settings(), &Settings::default());
        assert_eq!(store.settings().reveal_delay(), Duration::from_millis(2000));
        assert_eq!(store.settings().initial_deck_size, 10);
    }

    #[test]
    fn test_update_saves_and_notifies() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("settings.toml");
        let mut store = SettingsStore::load(&path).unwrap();
        let rx = store.subscribe();

        store
            .update(|s| {
                s.language = "es".to_string();
                s.gestures.set(Direction::Left, GestureAction::Hide);
            })
            .unwrap();

        let pushed = rx.try_recv().unwrap();
        assert_eq!(pushed.language, "es");
        assert_eq!(pushed.gestures.left, GestureAction::Hide);

        let reloaded = SettingsStore::load(&path).unwrap();
        assert_eq!(reloaded.settings(), &pushed);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let temp = TempDir::new().unwrap();
        let mut store = SettingsStore::load(temp.path().join("s.toml")).unwrap();
        drop(store.subscribe());
        store.update(|s| s.reveal_delay_ms = 500).unwrap();
        assert!(store.subscribers.is_empty());
    }

    #[test]
    fn test_partial_file_and_sanitize() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        fs::write(
            &path,
            "language = \"xx\"\ntheme = \"dark-ocean\"\ninitial_deck_size = 0\n\n[gestures]\nup = \"move-2\"\n",
        )
        .unwrap();

        let store = SettingsStore::load(&path).unwrap();
        let settings = store.settings();
        assert_eq!(settings.language, "en");
        assert_eq!(settings.theme().name, "Ocean Dark");
        assert_eq!(settings.initial_deck_size, 10);
        assert_eq!(settings.gestures.up, GestureAction::Move(2));
        assert_eq!(settings.gestures.down, GestureAction::ReadAloud);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        fs::write(&path, "language = [").unwrap();
        assert!(matches!(SettingsStore::load(&path), Err(SettingsError::TomlDe(_))));
    }
}
