//! The study deck
//!
//! Cards live in one arena keyed by word id. Three ordered collections
//! refer into it and always partition it:
//! - `deck`: cards in rotation, `current_index` points into it
//! - `removed_stack`: cards taken out by shrinking, most recent last
//! - `pool`: matching cards never dealt yet, dealt front first
//!
//! Hidden cards leave the arena. The most recent one is kept aside so it
//! can be restored.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use uuid::Uuid;

use super::models::{DifficultyFilter, SessionCard, SessionStatus};
use crate::words::{Difficulty, Face, VocabEntry, WordStore, WordStoreError};

pub const DEFAULT_INITIAL_DECK_SIZE: usize = 10;

pub type Result<T> = std::result::Result<T, WordStoreError>;

pub struct DeckEngine {
    store: Arc<dyn WordStore>,
    cards: HashMap<Uuid, SessionCard>,
    deck: Vec<Uuid>,
    removed_stack: Vec<Uuid>,
    pool: VecDeque<Uuid>,
    current_index: usize,
    total_active_count: usize,
    matched_at_start: usize,
    last_hidden: Option<SessionCard>,
    initial_deck_size: usize,
}

impl DeckEngine {
    pub fn new(store: Arc<dyn WordStore>) -> Self {
        Self {
            store,
            cards: HashMap::new(),
            deck: Vec::new(),
            removed_stack: Vec::new(),
            pool: VecDeque::new(),
            current_index: 0,
            total_active_count: 0,
            matched_at_start: 0,
            last_hidden: None,
            initial_deck_size: DEFAULT_INITIAL_DECK_SIZE,
        }
    }

    /// Number of cards dealt by the next `initialize`; at least one
    pub fn set_initial_deck_size(&mut self, size: usize) {
        self.initial_deck_size = size.max(1);
    }

    pub fn store(&self) -> &Arc<dyn WordStore> {
        &self.store
    }

    /// Build a fresh session from `words`, discarding all previous state.
    ///
    /// A word takes part if it is active, has a translation for
    /// `language` and its difficulty is in `filter`. Input order is kept.
    pub fn initialize(&mut self, words: &[VocabEntry], filter: &DifficultyFilter, language: &str, start_face: Face) {
        self.cards.clear();
        self.deck.clear();
        self.removed_stack.clear();
        self.pool.clear();
        self.current_index = 0;
        self.last_hidden = None;

        let matching: Vec<SessionCard> = words
            .iter()
            .filter(|w| w.active && w.has_translation(language) && filter.contains(w.difficulty))
            .map(|w| SessionCard::new(w.clone(), start_face))
            .collect();

        self.total_active_count = matching.len();
        self.matched_at_start = matching.len();

        let deal = self.initial_deck_size.min(matching.len());
        for (i, card) in matching.into_iter().enumerate() {
            let id = card.id();
            if i < deal {
                self.deck.push(id);
            } else {
                self.pool.push_back(id);
            }
            self.cards.insert(id, card);
        }

        log::info!(
            "Initialized deck for '{}': {} in deck, {} in pool",
            language,
            self.deck.len(),
            self.pool.len()
        );
    }

    /// Move the current card `positions` places further back in the deck
    pub fn move_card(&mut self, positions: usize) -> bool {
        if self.deck.len() < 2 {
            return false;
        }
        let id = self.deck.remove(self.current_index);
        let target = (self.current_index + positions).min(self.deck.len());
        self.deck.insert(target, id);
        if self.current_index >= self.deck.len() {
            self.current_index = 0;
        }
        true
    }

    /// Move the current card to the tail of the deck and count the visit.
    ///
    /// The new back count, face and blur flag are written to the store.
    pub fn send_to_back(&mut self, reverse_face: bool, blur_next: bool) -> Result<bool> {
        if self.deck.len() < 2 {
            return Ok(false);
        }
        let id = self.deck.remove(self.current_index);
        let was_last = self.current_index == self.deck.len();
        self.deck.push(id);
        if was_last {
            self.current_index = 0;
        }

        let entry = match self.cards.get_mut(&id) {
            Some(card) => {
                card.entry.back_count += 1;
                if reverse_face {
                    card.face = card.face.toggled();
                }
                card.is_blurred_next = blur_next;
                card.entry.face = Some(card.face);
                card.to_entry()
            }
            None => return Ok(true),
        };
        self.persist(&entry)?;
        Ok(true)
    }

    /// Deactivate the current word and deal a replacement into its slot
    pub fn hide_card(&mut self) -> Result<bool> {
        if self.deck.is_empty() {
            return Ok(false);
        }
        let id = self.deck[self.current_index];
        let replacement = self.removed_stack.pop().or_else(|| self.pool.pop_front());
        match replacement {
            Some(next) => self.deck[self.current_index] = next,
            None => {
                self.deck.remove(self.current_index);
                if self.current_index >= self.deck.len() {
                    self.current_index = 0;
                }
            }
        }

        self.total_active_count = self.total_active_count.saturating_sub(1);
        let mut hidden = match self.cards.remove(&id) {
            Some(card) => card,
            None => return Ok(true),
        };
        hidden.entry.active = false;
        self.last_hidden = Some(hidden);

        if let Err(e) = self.store.set_active(id, false) {
            log::warn!("Failed to deactivate word {}: {}", id, e);
            return Err(e);
        }
        Ok(true)
    }

    /// Bring back the most recently hidden card at the current position
    pub fn undo_hide(&mut self) -> Result<bool> {
        let mut card = match self.last_hidden.take() {
            Some(card) => card,
            None => return Ok(false),
        };
        card.entry.active = true;
        let id = card.id();
        let index = self.current_index.min(self.deck.len());
        self.deck.insert(index, id);
        self.current_index = index;
        self.cards.insert(id, card);
        self.total_active_count += 1;

        if let Err(e) = self.store.set_active(id, true) {
            log::warn!("Failed to reactivate word {}: {}", id, e);
            return Err(e);
        }
        Ok(true)
    }

    /// Grow or shrink the deck toward `target`, clamped to `[1, total]`.
    /// Returns the resulting deck size.
    pub fn resize_deck(&mut self, target: usize) -> usize {
        if self.total_active_count == 0 {
            return self.deck.len();
        }
        let target = target.clamp(1, self.total_active_count);
        let current = self.deck.len();

        if target > current {
            for _ in current..target {
                match self.removed_stack.pop().or_else(|| self.pool.pop_front()) {
                    Some(id) => self.deck.push(id),
                    None => break,
                }
            }
        } else if target < current {
            let mut displaced = Vec::new();
            let mut index = self.current_index;
            for _ in target..current {
                if self.deck.len() <= 1 {
                    break;
                }
                if index + 1 >= self.deck.len() {
                    displaced.push(self.deck.remove(0));
                    index = index.saturating_sub(1);
                } else if let Some(id) = self.deck.pop() {
                    displaced.push(id);
                }
            }
            self.removed_stack.extend(displaced);
            self.current_index = if index >= self.deck.len() { 0 } else { index };
        }

        log::debug!("Deck resized from {} to {}", current, self.deck.len());
        self.deck.len()
    }

    /// Show `face` first on every card of the session. Not persisted.
    pub fn bulk_set_face(&mut self, face: Face) {
        for card in self.cards.values_mut() {
            card.face = face;
        }
    }

    /// Set the blur flag on every card of the session and persist each entry
    pub fn bulk_set_blur(&mut self, blur: bool) -> Result<usize> {
        let mut entries = Vec::with_capacity(self.cards.len());
        for id in self.ordered_ids() {
            if let Some(card) = self.cards.get_mut(&id) {
                card.is_blurred_next = blur;
                entries.push(card.to_entry());
            }
        }
        if let Err(e) = self.store.upsert_many(&entries) {
            log::warn!("Failed to persist blur flags: {}", e);
            return Err(e);
        }
        Ok(entries.len())
    }

    /// Mark the current card; it stays where it is
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<bool> {
        let entry = match self.current_mut() {
            Some(card) => {
                card.entry.difficulty = difficulty;
                card.to_entry()
            }
            None => return Ok(false),
        };
        self.persist(&entry)?;
        Ok(true)
    }

    /// Clear the current card's blur flag, writing it through to the store
    pub fn clear_blur(&mut self) -> Result<bool> {
        let entry = match self.current_mut() {
            Some(card) if card.is_blurred_next => {
                card.is_blurred_next = false;
                card.to_entry()
            }
            _ => return Ok(false),
        };
        self.persist(&entry)?;
        Ok(true)
    }

    fn persist(&self, entry: &VocabEntry) -> Result<()> {
        self.store.upsert(entry).map_err(|e| {
            log::warn!("Failed to save word {}: {}", entry.id, e);
            e
        })
    }

    fn current_mut(&mut self) -> Option<&mut SessionCard> {
        let id = *self.deck.get(self.current_index)?;
        self.cards.get_mut(&id)
    }

    fn ordered_ids(&self) -> Vec<Uuid> {
        self.deck
            .iter()
            .chain(self.removed_stack.iter())
            .chain(self.pool.iter())
            .copied()
            .collect()
    }

    pub fn current(&self) -> Option<&SessionCard> {
        let id = self.deck.get(self.current_index)?;
        self.cards.get(id)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Cards in rotation, in order
    pub fn deck(&self) -> Vec<&SessionCard> {
        self.deck.iter().filter_map(|id| self.cards.get(id)).collect()
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    pub fn removed_len(&self) -> usize {
        self.removed_stack.len()
    }

    pub fn total_active_count(&self) -> usize {
        self.total_active_count
    }

    pub fn last_hidden(&self) -> Option<&SessionCard> {
        self.last_hidden.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        if self.matched_at_start == 0 {
            SessionStatus::NoMatches
        } else if self.deck.is_empty() {
            SessionStatus::Completed
        } else {
            SessionStatus::Active
        }
    }

    /// Deck, removed stack and pool are disjoint, cover the arena, and
    /// add up to the active total
    pub fn is_consistent(&self) -> bool {
        let ids = self.ordered_ids();
        let unique: HashSet<&Uuid> = ids.iter().collect();
        unique.len() == ids.len()
            && ids.len() == self.cards.len()
            && ids.len() == self.total_active_count
            && ids.iter().all(|id| self.cards.contains_key(id))
            && (self.deck.is_empty() || self.current_index < self.deck.len())
    }
}
