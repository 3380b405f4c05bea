//! A running study session
//!
//! `StudySession` turns gestures, keys and typed answers into deck
//! operations. Immediate actions run at once. Deferred actions (moves and
//! send-to-back) on a card whose answer is not showing first go through
//! the reveal sequence in [`super::reveal`], and the host drives that
//! sequence by calling [`StudySession::tick`].

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use uuid::Uuid;

use super::deck::DeckEngine;
use super::gestures::{Direction, GestureAction, GestureActionMap, SwipeTracker};
use super::models::{CardSides, DifficultyFilter, FilterError, SessionCard, SessionStatus};
use super::reveal::{DeferredAction, RevealEvent, RevealMachine, RevealPhase};
use crate::languages::{language_or_default, HOME_LANGUAGE_NAME};
use crate::services::Speaker;
use crate::settings::Settings;
use crate::words::{Difficulty, Face, WordStore, WordStoreError};

/// Typed answer that means "I knew it, send it back"
pub const SEND_BACK_ANSWER: &str = "..";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Store(#[from] WordStoreError),

    #[error("{0}")]
    Filter(#[from] FilterError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// What a gesture or key press led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Executed,
    /// A deferred action is waiting for the reveal to finish
    Scheduled,
    /// Dropped because a reveal is already in progress
    Suppressed,
    /// Nothing to do: no card, no action bound, or no swipe
    Ignored,
}

/// How the current card is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardDisplay {
    Blurred,
    Front,
    Back,
}

pub struct StudySession {
    engine: DeckEngine,
    speaker: Box<dyn Speaker>,
    reveal: RevealMachine,
    swipe: SwipeTracker,
    gestures: GestureActionMap,
    filter: DifficultyFilter,
    language: String,
    start_face: Face,
    flipped: bool,
    blurred: bool,
    shown: Option<Uuid>,
    notice: Option<String>,
}

impl StudySession {
    /// Create a session; call [`StudySession::start`] to deal the first deck
    pub fn new(store: Arc<dyn WordStore>, speaker: Box<dyn Speaker>, settings: &Settings) -> Self {
        let mut engine = DeckEngine::new(store);
        engine.set_initial_deck_size(settings.initial_deck_size);
        Self {
            engine,
            speaker,
            reveal: RevealMachine::new(settings.reveal_delay()),
            swipe: SwipeTracker::new(settings.swipe_threshold),
            gestures: settings.gestures,
            filter: DifficultyFilter::all(),
            language: settings.language.clone(),
            start_face: settings.start_face,
            flipped: false,
            blurred: false,
            shown: None,
            notice: None,
        }
    }

    /// Pick up changed settings. A language change starts a new session.
    pub fn apply_settings(&mut self, settings: &Settings) -> Result<bool> {
        self.gestures = settings.gestures;
        self.swipe.set_threshold(settings.swipe_threshold);
        self.reveal.set_delay(settings.reveal_delay());
        self.engine.set_initial_deck_size(settings.initial_deck_size);
        self.start_face = settings.start_face;

        if settings.language != self.language {
            log::info!("Language changed from '{}' to '{}'", self.language, settings.language);
            self.language = settings.language.clone();
            self.start()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Deal a new session from the store. Any pending reveal is abandoned.
    pub fn start(&mut self) -> Result<()> {
        if self.reveal.cancel() {
            log::debug!("Cancelled pending reveal on restart");
        }
        let words = self.engine.store().list()?;
        self.engine
            .initialize(&words, &self.filter, &self.language, self.start_face);
        self.shown = None;
        self.refresh_display(true);
        Ok(())
    }

    pub fn restart(&mut self) -> Result<()> {
        self.start()
    }

    pub fn dispatch(&mut self, direction: Direction, now: Instant) -> Result<DispatchOutcome> {
        let action = self.gestures.action_for(direction);
        log::debug!("{} -> {}", direction, action);
        self.perform(action, now)
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.swipe.touch_start(x, y);
    }

    pub fn touch_end(&mut self, x: f32, y: f32, now: Instant) -> Result<DispatchOutcome> {
        match self.swipe.touch_end(x, y) {
            Some(direction) => self.dispatch(direction, now),
            None => Ok(DispatchOutcome::Ignored),
        }
    }

    pub fn perform(&mut self, action: GestureAction, now: Instant) -> Result<DispatchOutcome> {
        if self.engine.current().is_none() {
            return Ok(DispatchOutcome::Ignored);
        }
        match action {
            GestureAction::None => Ok(DispatchOutcome::Ignored),
            GestureAction::Flip => {
                self.flip()?;
                Ok(DispatchOutcome::Executed)
            }
            GestureAction::ReadAloud => {
                self.read_aloud();
                Ok(DispatchOutcome::Executed)
            }
            GestureAction::Hide => {
                self.hide()?;
                Ok(DispatchOutcome::Executed)
            }
            GestureAction::Mark(difficulty) => {
                self.set_difficulty(difficulty)?;
                Ok(DispatchOutcome::Executed)
            }
            GestureAction::Move(n) => self.defer(DeferredAction::Move(n), now),
            GestureAction::SendToBack { reverse, blur } => {
                self.defer(DeferredAction::SendToBack { reverse, blur }, now)
            }
        }
    }

    fn defer(&mut self, action: DeferredAction, now: Instant) -> Result<DispatchOutcome> {
        if self.reveal.is_locked() {
            log::debug!("Reveal in progress, ignoring {:?}", action);
            return Ok(DispatchOutcome::Suppressed);
        }
        if self.flipped && !self.blurred {
            self.execute(action)?;
            return Ok(DispatchOutcome::Executed);
        }

        if self.blurred {
            self.blurred = false;
            self.reveal.begin_unblur(action, now);
            self.engine.clear_blur()?;
        } else {
            self.flipped = true;
            self.reveal.begin_reveal(action, now);
        }
        Ok(DispatchOutcome::Scheduled)
    }

    fn execute(&mut self, action: DeferredAction) -> Result<()> {
        let result = match action {
            DeferredAction::Move(n) => {
                self.engine.move_card(usize::from(n));
                Ok(())
            }
            DeferredAction::SendToBack { reverse, blur } => self.engine.send_to_back(reverse, blur).map(|_| ()),
        };
        self.refresh_display(true);
        result.map_err(SessionError::from)
    }

    /// Advance a pending reveal. Returns whether anything changed.
    pub fn tick(&mut self, now: Instant) -> Result<bool> {
        let mut changed = false;
        while let Some(event) = self.reveal.tick(now) {
            changed = true;
            match event {
                RevealEvent::Flip => self.flipped = true,
                RevealEvent::Execute(action) => {
                    let result = self.execute(action);
                    self.reveal.finish();
                    result?;
                }
            }
        }
        Ok(changed)
    }

    /// Remove the blur if present, otherwise turn the card over
    pub fn flip(&mut self) -> Result<()> {
        if self.engine.current().is_none() {
            return Ok(());
        }
        if self.blurred {
            self.blurred = false;
            self.engine.clear_blur()?;
        } else {
            self.flipped = !self.flipped;
        }
        Ok(())
    }

    /// Speak the visible side: term then example
    pub fn read_aloud(&self) {
        if let Some(sides) = self.current_sides() {
            let side = if self.flipped { &sides.back } else { &sides.front };
            self.speaker.speak(&side.spoken_text(), &side.speech_tag);
        }
    }

    pub fn hide(&mut self) -> Result<bool> {
        let result = self.engine.hide_card();
        self.refresh_display(true);
        let hidden = result?;
        if hidden {
            self.notice = Some("Card hidden.".to_string());
        }
        Ok(hidden)
    }

    pub fn undo_hide(&mut self) -> Result<bool> {
        let result = self.engine.undo_hide();
        self.refresh_display(true);
        let restored = result?;
        if restored {
            self.notice = Some("Card restored.".to_string());
        }
        Ok(restored)
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<bool> {
        let marked = self.engine.set_difficulty(difficulty)?;
        if marked {
            self.notice = Some(format!("Card marked as {}.", difficulty));
        }
        Ok(marked)
    }

    /// Add or remove a difficulty from the filter and start over.
    /// Removing the last one is rejected and leaves the session untouched.
    pub fn toggle_filter(&mut self, difficulty: Difficulty) -> Result<bool> {
        match self.filter.toggle(difficulty) {
            Ok(selected) => {
                self.start()?;
                Ok(selected)
            }
            Err(e) => {
                self.notice = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    pub fn resize_deck(&mut self, size: usize) -> usize {
        let len = self.engine.resize_deck(size);
        self.refresh_display(false);
        len
    }

    pub fn bulk_set_face(&mut self, face: Face) {
        self.engine.bulk_set_face(face);
        self.flipped = false;
        let name = match face {
            Face::Home => HOME_LANGUAGE_NAME,
            Face::Translation => language_or_default(&self.language).english_name,
        };
        self.notice = Some(format!("Switched all cards to show {} first.", name));
    }

    pub fn bulk_set_blur(&mut self, blur: bool) -> Result<usize> {
        let count = self.engine.bulk_set_blur(blur)?;
        self.notice = Some(if blur {
            "Set all cards to be blurred on next view.".to_string()
        } else {
            "Set all cards to be unblurred.".to_string()
        });
        Ok(count)
    }

    /// Handle a typed answer: `..` sends the card back once revealed, any
    /// other text flips it
    pub fn submit_self_assessment(&mut self, text: &str, now: Instant) -> Result<DispatchOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(DispatchOutcome::Ignored);
        }
        if text == SEND_BACK_ANSWER {
            return self.perform(GestureAction::SendToBack { reverse: false, blur: false }, now);
        }
        self.perform(GestureAction::Flip, now)
    }

    /// Reset the per-card display when the current card changes (or always, if `force`)
    fn refresh_display(&mut self, force: bool) {
        let current = self.engine.current().map(SessionCard::id);
        if !force && current == self.shown {
            return;
        }
        if self.reveal.cancel() {
            log::debug!("Current card changed, dropping pending reveal");
        }
        self.shown = current;
        self.flipped = false;
        self.blurred = self.engine.current().map_or(false, |c| c.is_blurred_next);
    }

    pub fn status(&self) -> SessionStatus {
        self.engine.status()
    }

    pub fn current(&self) -> Option<&SessionCard> {
        self.engine.current()
    }

    pub fn current_sides(&self) -> Option<CardSides> {
        self.engine.current().map(|c| c.sides(&self.language))
    }

    pub fn display(&self) -> Option<CardDisplay> {
        self.engine.current()?;
        Some(if self.blurred {
            CardDisplay::Blurred
        } else if self.flipped {
            CardDisplay::Back
        } else {
            CardDisplay::Front
        })
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn is_blurred(&self) -> bool {
        self.blurred
    }

    pub fn is_locked(&self) -> bool {
        self.reveal.is_locked()
    }

    pub fn reveal_phase(&self) -> RevealPhase {
        self.reveal.phase()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.reveal.next_due()
    }

    pub fn engine(&self) -> &DeckEngine {
        &self.engine
    }

    pub fn filter(&self) -> &DifficultyFilter {
        &self.filter
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn gestures(&self) -> &GestureActionMap {
        &self.gestures
    }

    /// Message for the user about the last operation, if any
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::{MemoryWordStore, NewEntry, Translation, VocabEntry};
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::time::Duration;

    const DELAY: Duration = Duration::from_millis(2000);

    #[derive(Clone, Default)]
    struct RecordingSpeaker {
        spoken: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl Speaker for RecordingSpeaker {
        fn speak(&self, text: &str, language_tag: &str) {
            self.spoken
                .lock()
                .unwrap()
                .push((text.to_string(), language_tag.to_string()));
        }
    }

    fn words(n: usize) -> Vec<VocabEntry> {
        (0..n)
            .map(|i| {
                let mut translations = BTreeMap::new();
                translations.insert("en".to_string(), Translation::new(format!("word{}", i), format!("Example {}.", i)));
                VocabEntry::new(NewEntry {
                    source: "Book".to_string(),
                    subtopic1: "A".to_string(),
                    subtopic2: "B".to_string(),
                    home_term: format!("ord{}", i),
                    home_example: String::new(),
                    translations,
                })
            })
            .collect()
    }

    fn session_with(entries: Vec<VocabEntry>) -> (StudySession, Arc<MemoryWordStore>, RecordingSpeaker) {
        let store = Arc::new(MemoryWordStore::with_entries(entries));
        let speaker = RecordingSpeaker::default();
        let mut session = StudySession::new(store.clone(), Box::new(speaker.clone()), &Settings::default());
        session.start().unwrap();
        (session, store, speaker)
    }

    fn current_term(session: &StudySession) -> String {
        session.current().unwrap().entry.home_term.clone()
    }

    fn deck_terms(session: &StudySession) -> Vec<String> {
        session
            .engine()
            .deck()
            .iter()
            .map(|c| c.entry.home_term.clone())
            .collect()
    }

    #[test]
    fn test_deferred_move_runs_once_after_delay() {
        let (mut session, _, _) = session_with(words(3));
        let t0 = Instant::now();

        assert_eq!(session.dispatch(Direction::Right, t0).unwrap(), DispatchOutcome::Scheduled);
        assert_eq!(session.display(), Some(CardDisplay::Back));
        assert!(session.is_locked());

        let again = session.dispatch(Direction::Right, t0 + Duration::from_millis(500)).unwrap();
        assert_eq!(again, DispatchOutcome::Suppressed);

        assert!(!session.tick(t0 + Duration::from_millis(1999)).unwrap());
        assert_eq!(current_term(&session), "ord0");

        assert!(session.tick(t0 + DELAY).unwrap());
        assert_eq!(deck_terms(&session), vec!["ord1", "ord0", "ord2"]);
        assert_eq!(session.display(), Some(CardDisplay::Front));
        assert!(!session.is_locked());

        assert!(!session.tick(t0 + DELAY * 10).unwrap());
        assert_eq!(deck_terms(&session), vec!["ord1", "ord0", "ord2"]);
    }

    #[test]
    fn test_deferred_runs_at_once_when_flipped() {
        let (mut session, _, _) = session_with(words(3));
        let t0 = Instant::now();
        assert_eq!(session.dispatch(Direction::Up, t0).unwrap(), DispatchOutcome::Executed);
        assert!(session.is_flipped());

        assert_eq!(session.dispatch(Direction::Right, t0).unwrap(), DispatchOutcome::Executed);
        assert_eq!(current_term(&session), "ord1");
        assert!(!session.is_flipped());
    }

    #[test]
    fn test_blurred_card_takes_two_stages() {
        let mut entries = words(3);
        entries[0].blur_next = Some(true);
        let (mut session, store, _) = session_with(entries);
        let first = session.current().unwrap().id();
        assert_eq!(session.display(), Some(CardDisplay::Blurred));

        let t0 = Instant::now();
        assert_eq!(session.dispatch(Direction::Left, t0).unwrap(), DispatchOutcome::Scheduled);
        assert_eq!(session.display(), Some(CardDisplay::Front));
        assert_eq!(session.reveal_phase(), RevealPhase::Unblurring);
        assert_eq!(store.get(first).unwrap().blur_next, Some(false));

        session.tick(t0 + DELAY).unwrap();
        assert_eq!(session.display(), Some(CardDisplay::Back));
        assert_eq!(current_term(&session), "ord0");

        session.tick(t0 + DELAY * 2).unwrap();
        assert_eq!(deck_terms(&session), vec!["ord1", "ord2", "ord0"]);
        assert_eq!(store.get(first).unwrap().back_count, 1);
        assert!(!session.is_locked());
    }

    #[test]
    fn test_move_on_blurred_card_keeps_face() {
        let mut entries = words(4);
        entries[0].blur_next = Some(true);
        let (mut session, _, _) = session_with(entries);
        let t0 = Instant::now();

        assert_eq!(session.dispatch(Direction::Right, t0).unwrap(), DispatchOutcome::Scheduled);
        assert_eq!(session.tick(t0 + DELAY * 2).unwrap(), true);

        assert_eq!(deck_terms(&session), vec!["ord1", "ord0", "ord2", "ord3"]);
        let moved = session.engine().deck()[1];
        assert_eq!(moved.face, Face::Home);
        assert!(!moved.is_blurred_next);
        assert_eq!(moved.entry.back_count, 0);
    }

    #[test]
    fn test_unblurred_card_still_reveals_before_acting() {
        let mut entries = words(3);
        entries[0].blur_next = Some(true);
        let (mut session, _, _) = session_with(entries);
        let t0 = Instant::now();

        session.flip().unwrap();
        assert_eq!(session.display(), Some(CardDisplay::Front));
        assert_eq!(session.dispatch(Direction::Right, t0).unwrap(), DispatchOutcome::Scheduled);
        assert_eq!(session.reveal_phase(), RevealPhase::Revealing);
    }

    #[test]
    fn test_restart_cancels_pending_reveal() {
        let (mut session, _, _) = session_with(words(3));
        let t0 = Instant::now();
        session.dispatch(Direction::Right, t0).unwrap();
        session.restart().unwrap();
        assert!(!session.is_locked());

        assert!(!session.tick(t0 + DELAY * 3).unwrap());
        assert_eq!(deck_terms(&session), vec!["ord0", "ord1", "ord2"]);
        assert_eq!(session.display(), Some(CardDisplay::Front));
    }

    #[test]
    fn test_hide_cancels_pending_reveal() {
        let (mut session, store, _) = session_with(words(3));
        let t0 = Instant::now();
        let first = session.current().unwrap().id();
        session.dispatch(Direction::Right, t0).unwrap();

        session.perform(GestureAction::Hide, t0).unwrap();
        assert!(!store.get(first).unwrap().active);
        assert!(!session.is_locked());
        assert!(!session.tick(t0 + DELAY).unwrap());
        assert_eq!(deck_terms(&session), vec!["ord1", "ord2"]);
        assert_eq!(session.take_notice().as_deref(), Some("Card hidden."));

        assert!(session.undo_hide().unwrap());
        assert_eq!(current_term(&session), "ord0");
        assert!(store.get(first).unwrap().active);
    }

    #[test]
    fn test_self_assessment() {
        let (mut session, _, _) = session_with(words(3));
        let t0 = Instant::now();
        assert_eq!(session.submit_self_assessment("  ", t0).unwrap(), DispatchOutcome::Ignored);

        assert_eq!(session.submit_self_assessment("house", t0).unwrap(), DispatchOutcome::Executed);
        assert!(session.is_flipped());
        session.flip().unwrap();

        assert_eq!(session.submit_self_assessment("..", t0).unwrap(), DispatchOutcome::Scheduled);
        session.tick(t0 + DELAY).unwrap();
        assert_eq!(deck_terms(&session), vec!["ord1", "ord2", "ord0"]);
    }

    #[test]
    fn test_immediate_actions_ignore_lock() {
        let (mut session, store, _) = session_with(words(3));
        let t0 = Instant::now();
        session.dispatch(Direction::Right, t0).unwrap();
        let id = session.current().unwrap().id();

        let outcome = session.perform(GestureAction::Mark(Difficulty::Hard), t0).unwrap();
        assert_eq!(outcome, DispatchOutcome::Executed);
        assert_eq!(store.get(id).unwrap().difficulty, Difficulty::Hard);
        assert_eq!(session.take_notice().as_deref(), Some("Card marked as hard."));
        assert!(session.is_locked());
    }

    #[test]
    fn test_read_aloud_uses_visible_side() {
        let (mut session, _, speaker) = session_with(words(2));
        session.read_aloud();
        session.flip().unwrap();
        session.read_aloud();

        let spoken = speaker.spoken.lock().unwrap().clone();
        assert_eq!(
            spoken,
            vec![
                ("ord0".to_string(), "sv-SE".to_string()),
                ("word0 Example 0.".to_string(), "en-US".to_string()),
            ]
        );
    }

    #[test]
    fn test_toggle_filter_restarts_and_guards_last() {
        let mut entries = words(4);
        entries[1].difficulty = Difficulty::Hard;
        let (mut session, _, _) = session_with(entries);
        assert_eq!(session.engine().deck_len(), 4);

        assert_eq!(session.toggle_filter(Difficulty::Unmarked).unwrap(), false);
        assert_eq!(deck_terms(&session), vec!["ord1"]);

        session.toggle_filter(Difficulty::Easy).unwrap();
        session.toggle_filter(Difficulty::Medium).unwrap();
        let err = session.toggle_filter(Difficulty::Hard).unwrap_err();
        assert!(matches!(err, SessionError::Filter(FilterError::LastFilter)));
        assert_eq!(
            session.take_notice().as_deref(),
            Some("At least one difficulty filter must be selected.")
        );
        assert!(session.filter().contains(Difficulty::Hard));
        assert_eq!(deck_terms(&session), vec!["ord1"]);
    }

    #[test]
    fn test_status_transitions() {
        let (mut session, _, _) = session_with(words(1));
        assert_eq!(session.status(), SessionStatus::Active);
        session.hide().unwrap();
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.display(), None);
        assert_eq!(session.dispatch(Direction::Up, Instant::now()).unwrap(), DispatchOutcome::Ignored);

        let (empty, _, _) = session_with(Vec::new());
        assert_eq!(empty.status(), SessionStatus::NoMatches);
    }

    #[test]
    fn test_swipe_dispatch() {
        let (mut session, _, _) = session_with(words(3));
        let t0 = Instant::now();
        session.touch_start(200.0, 200.0);
        assert_eq!(session.touch_end(210.0, 220.0, t0).unwrap(), DispatchOutcome::Ignored);

        session.touch_start(200.0, 200.0);
        assert_eq!(session.touch_end(100.0, 210.0, t0).unwrap(), DispatchOutcome::Scheduled);
        session.tick(t0 + DELAY).unwrap();
        assert_eq!(deck_terms(&session), vec!["ord1", "ord2", "ord0"]);
    }

    #[test]
    fn test_apply_settings_language_restarts() {
        let mut entries = words(2);
        entries[1]
            .translations
            .insert("es".to_string(), Translation::new("palabra", ""));
        let (mut session, _, _) = session_with(entries);

        let mut settings = Settings::default();
        settings.gestures.right = GestureAction::Hide;
        assert!(!session.apply_settings(&settings).unwrap());
        assert_eq!(session.gestures().right, GestureAction::Hide);

        settings.language = "es".to_string();
        assert!(session.apply_settings(&settings).unwrap());
        assert_eq!(deck_terms(&session), vec!["ord1"]);
        assert_eq!(session.current_sides().unwrap().back.term, "palabra");
    }

    #[test]
    fn test_bulk_face_and_blur_notices() {
        let (mut session, store, _) = session_with(words(2));
        session.bulk_set_face(Face::Translation);
        assert_eq!(session.current_sides().unwrap().front.term, "word0");
        assert_eq!(
            session.take_notice().as_deref(),
            Some("Switched all cards to show English first.")
        );

        assert_eq!(session.bulk_set_blur(true).unwrap(), 2);
        assert!(store.list().unwrap().iter().all(|w| w.is_blurred_next()));
        // the card already on screen stays visible
        assert_eq!(session.display(), Some(CardDisplay::Front));
    }
}
