//! Data models for a flashcard session

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::languages::{language_or_default, HOME_SPEECH_TAG};
use crate::words::{Difficulty, Face, VocabEntry};

/// A word wrapped for one study session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCard {
    pub entry: VocabEntry,
    pub face: Face,
    /// Working copy of the entry's persisted blur-next flag
    pub is_blurred_next: bool,
}

impl SessionCard {
    pub fn new(entry: VocabEntry, face: Face) -> Self {
        let is_blurred_next = entry.is_blurred_next();
        Self {
            entry,
            face,
            is_blurred_next,
        }
    }

    pub fn id(&self) -> Uuid {
        self.entry.id
    }

    /// The entry as it should be written back to the word store
    pub fn to_entry(&self) -> VocabEntry {
        let mut entry = self.entry.clone();
        entry.blur_next = Some(self.is_blurred_next);
        entry
    }

    /// Front and back text of the card for the given translation language
    pub fn sides(&self, language: &str) -> CardSides {
        let (word, example) = match self.entry.translation(language) {
            Some(t) => (t.word.clone(), t.example.clone()),
            None => ("N/A".to_string(), String::new()),
        };
        let home = Side {
            term: self.entry.home_term.clone(),
            example: self.entry.home_example.clone(),
            speech_tag: HOME_SPEECH_TAG.to_string(),
        };
        let translation = Side {
            term: word,
            example,
            speech_tag: language_or_default(language).speech_tag.to_string(),
        };
        match self.face {
            Face::Home => CardSides { front: home, back: translation },
            Face::Translation => CardSides { front: translation, back: home },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Side {
    pub term: String,
    pub example: String,
    pub speech_tag: String,
}

impl Side {
    /// Text read aloud for this side: the term followed by its example
    pub fn spoken_text(&self) -> String {
        format!("{} {}", self.term, self.example).trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSides {
    pub front: Side,
    pub back: Side,
}

/// Overall state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    /// No active word matched the filters when the session started
    NoMatches,
    Active,
    /// Words matched, but every card has since been hidden
    Completed,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterError {
    #[error("At least one difficulty filter must be selected.")]
    LastFilter,
}

/// Difficulties a session draws cards from; never empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Difficulty>", into = "Vec<Difficulty>")]
pub struct DifficultyFilter {
    selected: BTreeSet<Difficulty>,
}

impl Default for DifficultyFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl DifficultyFilter {
    pub fn all() -> Self {
        Self {
            selected: Difficulty::ALL.into_iter().collect(),
        }
    }

    pub fn contains(&self, difficulty: Difficulty) -> bool {
        self.selected.contains(&difficulty)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Difficulty> + '_ {
        self.selected.iter().copied()
    }

    /// Add or remove a difficulty. Returns whether it is now selected.
    /// Removing the last remaining difficulty is rejected.
    pub fn toggle(&mut self, difficulty: Difficulty) -> Result<bool, FilterError> {
        if self.selected.contains(&difficulty) {
            if self.selected.len() == 1 {
                return Err(FilterError::LastFilter);
            }
            self.selected.remove(&difficulty);
            Ok(false)
        } else {
            self.selected.insert(difficulty);
            Ok(true)
        }
    }
}

impl TryFrom<Vec<Difficulty>> for DifficultyFilter {
    type Error = FilterError;

    fn try_from(value: Vec<Difficulty>) -> Result<Self, Self::Error> {
        let selected: BTreeSet<Difficulty> = value.into_iter().collect();
        if selected.is_empty() {
            return Err(FilterError::LastFilter);
        }
        Ok(Self { selected })
    }
}

impl From<DifficultyFilter> for Vec<Difficulty> {
    fn from(value: DifficultyFilter) -> Self {
        value.selected.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::{NewEntry, Translation};
    use std::collections::BTreeMap;

    fn entry() -> VocabEntry {
        let mut translations = BTreeMap::new();
        translations.insert("es".to_string(), Translation::new("casa", "Una casa."));
        VocabEntry::new(NewEntry {
            source: "s".to_string(),
            subtopic1: "a".to_string(),
            subtopic2: "b".to_string(),
            home_term: "hus".to_string(),
            home_example: "Ett hus.".to_string(),
            translations,
        })
    }

    #[test]
    fn test_sides_follow_face() {
        let mut card = SessionCard::new(entry(), Face::Home);
        let sides = card.sides("es");
        assert_eq!(sides.front.term, "hus");
        assert_eq!(sides.front.speech_tag, "sv-SE");
        assert_eq!(sides.back.term, "casa");
        assert_eq!(sides.back.speech_tag, "es-ES");

        card.face = Face::Translation;
        let sides = card.sides("es");
        assert_eq!(sides.front.spoken_text(), "casa Una casa.");
        assert_eq!(sides.back.term, "hus");
    }

    #[test]
    fn test_missing_translation_placeholder() {
        let card = SessionCard::new(entry(), Face::Home);
        assert_eq!(card.sides("en").back.term, "N/A");
        assert_eq!(card.sides("en").back.spoken_text(), "N/A");
    }

    #[test]
    fn test_blur_copied_from_entry() {
        let mut e = entry();
        e.blur_next = Some(true);
        let mut card = SessionCard::new(e, Face::Home);
        assert!(card.is_blurred_next);
        card.is_blurred_next = false;
        assert_eq!(card.to_entry().blur_next, Some(false));
    }

    #[test]
    fn test_filter_rejects_removing_last() {
        let mut filter = DifficultyFilter::all();
        assert_eq!(filter.toggle(Difficulty::Unmarked), Ok(false));
        assert_eq!(filter.toggle(Difficulty::Easy), Ok(false));
        assert_eq!(filter.toggle(Difficulty::Medium), Ok(false));

        let before = filter.clone();
        assert_eq!(filter.toggle(Difficulty::Hard), Err(FilterError::LastFilter));
        assert_eq!(filter, before);
        assert!(filter.contains(Difficulty::Hard));

        assert_eq!(filter.toggle(Difficulty::Easy), Ok(true));
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_filter_deserialize_rejects_empty() {
        let parsed: Result<DifficultyFilter, _> = serde_json::from_str("[]");
        assert!(parsed.is_err());
        let parsed: DifficultyFilter = serde_json::from_str("[\"hard\",\"easy\"]").unwrap();
        assert_eq!(parsed.len(), 2);
    }
}
