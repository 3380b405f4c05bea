//! Data models for the vocabulary list

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How hard the learner finds a word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    Unmarked,
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Unmarked
    }
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Unmarked,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Unmarked => "unmarked",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unmarked" => Ok(Difficulty::Unmarked),
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

/// Which term set of a card is shown first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Face {
    /// Home-language (Swedish) term on the front
    Home,
    /// Translation term on the front
    Translation,
}

impl Default for Face {
    fn default() -> Self {
        Self::Home
    }
}

impl Face {
    pub fn toggled(self) -> Self {
        match self {
            Face::Home => Face::Translation,
            Face::Translation => Face::Home,
        }
    }
}

impl FromStr for Face {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "home" | "swedish" => Ok(Face::Home),
            "translation" | "source" => Ok(Face::Translation),
            other => Err(format!("unknown face '{}'", other)),
        }
    }
}

/// A translation of the home term into one language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub word: String,
    #[serde(default)]
    pub example: String,
}

impl Translation {
    pub fn new(word: impl Into<String>, example: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            example: example.into(),
        }
    }
}

/// A single vocabulary entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabEntry {
    pub id: Uuid,
    pub source: String,
    pub subtopic1: String,
    pub subtopic2: String,
    pub home_term: String,
    #[serde(default)]
    pub home_example: String,
    /// Keyed by language code (see `crate::languages`)
    #[serde(default)]
    pub translations: BTreeMap<String, Translation>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub back_count: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(rename = "isBlurredNext", default, skip_serializing_if = "Option::is_none")]
    pub blur_next: Option<bool>,
    /// Face recorded the last time the card was sent to the back of a deck
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<Face>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl VocabEntry {
    pub fn new(draft: NewEntry) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            source: draft.source,
            subtopic1: draft.subtopic1,
            subtopic2: draft.subtopic2,
            home_term: draft.home_term,
            home_example: draft.home_example,
            translations: draft.translations,
            active: true,
            back_count: 0,
            difficulty: Difficulty::Unmarked,
            blur_next: None,
            face: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive identity used to detect duplicate imports
    pub fn duplicate_key(&self) -> String {
        duplicate_key(&self.source, &self.subtopic1, &self.subtopic2, &self.home_term)
    }

    /// Whether the entry has a non-empty translation for `language`
    pub fn has_translation(&self, language: &str) -> bool {
        self.translations
            .get(language)
            .map_or(false, |t| !t.word.is_empty())
    }

    pub fn translation(&self, language: &str) -> Option<&Translation> {
        self.translations.get(language)
    }

    pub fn is_blurred_next(&self) -> bool {
        self.blur_next.unwrap_or(false)
    }

    /// Topic path joined for display
    pub fn topic_path(&self) -> String {
        format!("{} / {} / {}", self.source, self.subtopic1, self.subtopic2)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

pub fn duplicate_key(source: &str, subtopic1: &str, subtopic2: &str, home_term: &str) -> String {
    format!("{}|{}|{}|{}", source, subtopic1, subtopic2, home_term).to_lowercase()
}

/// Fields supplied when creating an entry; everything else gets defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewEntry {
    pub source: String,
    pub subtopic1: String,
    pub subtopic2: String,
    pub home_term: String,
    pub home_example: String,
    pub translations: BTreeMap<String, Translation>,
}

impl NewEntry {
    pub fn duplicate_key(&self) -> String {
        duplicate_key(&self.source, &self.subtopic1, &self.subtopic2, &self.home_term)
    }
}
