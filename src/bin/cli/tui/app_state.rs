use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use ratatui::prelude::Rect;

use lexideck_lib::flashcards::{Direction, DispatchOutcome, GestureAction, SessionError, StudySession};
use lexideck_lib::languages::{language_order, language_or_default};
use lexideck_lib::services::CommandSpeaker;
use lexideck_lib::settings::Settings;
use lexideck_lib::words::{Difficulty, Face, WordStore};

use crate::app::App;

/// Terminal cell size in logical pixels, used to scale mouse drags into swipes
pub const CELL_WIDTH_PX: f32 = 8.0;
pub const CELL_HEIGHT_PX: f32 = 16.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Study,
    /// Typing a self-assessment answer
    Answer,
    /// Typing a deck size
    Resize,
    /// Editing the gesture map
    Gestures,
}

pub struct TuiState {
    pub app: App,
    pub session: StudySession,
    settings_rx: Receiver<Settings>,
    pub mode: Mode,

    // Key state for multi-char sequences
    pub pending_key: Option<char>,

    // Card area for mouse hit-testing (updated each draw)
    pub card_area: Option<Rect>,

    pub input_text: String,
    pub flash_message: Option<String>,
    pub gesture_cursor: Direction,

    pub show_help: bool,
    pub quit: bool,
}

impl TuiState {
    pub fn new(mut app: App) -> Result<Self> {
        let settings = app.settings().clone();
        let settings_rx = app.settings.subscribe();
        let store: Arc<dyn WordStore> = app.store.clone();
        let speaker = Box::new(CommandSpeaker::new(settings.tts_command.clone()));

        let mut session = StudySession::new(store, speaker, &settings);
        session.start()?;

        Ok(Self {
            app,
            session,
            settings_rx,
            mode: Mode::Study,
            pending_key: None,
            card_area: None,
            input_text: String::new(),
            flash_message: None,
            gesture_cursor: Direction::Up,
            show_help: false,
            quit: false,
        })
    }

    pub fn settings(&self) -> &Settings {
        self.app.settings()
    }

    /// Feed saved settings changes into the session
    pub fn apply_settings_updates(&mut self) {
        while let Ok(settings) = self.settings_rx.try_recv() {
            match self.session.apply_settings(&settings) {
                Ok(true) => {
                    let name = language_or_default(&settings.language).english_name;
                    self.flash_message = Some(format!("Studying {}", name));
                }
                Ok(false) => {}
                Err(e) => self.report(e),
            }
        }
    }

    pub fn tick(&mut self, now: Instant) {
        if let Err(e) = self.session.tick(now) {
            self.report(e);
        }
        self.collect_notice();
    }

    fn collect_notice(&mut self) {
        if let Some(notice) = self.session.take_notice() {
            self.flash_message = Some(notice);
        }
    }

    fn report(&mut self, error: SessionError) {
        log::error!("{}", error);
        self.flash_message = Some(error.to_string());
    }

    fn handle_outcome(&mut self, outcome: Result<DispatchOutcome, SessionError>) {
        match outcome {
            Ok(DispatchOutcome::Suppressed) => {
                self.flash_message = Some("Wait for the answer to show...".to_string());
            }
            Ok(_) => self.collect_notice(),
            Err(e) => self.report(e),
        }
    }

    pub fn dispatch(&mut self, direction: Direction) {
        let outcome = self.session.dispatch(direction, Instant::now());
        self.handle_outcome(outcome);
    }

    pub fn perform(&mut self, action: GestureAction) {
        let outcome = self.session.perform(action, Instant::now());
        self.handle_outcome(outcome);
    }

    pub fn touch_start(&mut self, column: u16, row: u16) {
        self.session
            .touch_start(f32::from(column) * CELL_WIDTH_PX, f32::from(row) * CELL_HEIGHT_PX);
    }

    pub fn touch_end(&mut self, column: u16, row: u16) {
        let outcome = self.session.touch_end(
            f32::from(column) * CELL_WIDTH_PX,
            f32::from(row) * CELL_HEIGHT_PX,
            Instant::now(),
        );
        self.handle_outcome(outcome);
    }

    pub fn submit_answer(&mut self) {
        let text = std::mem::take(&mut self.input_text);
        self.mode = Mode::Study;
        let outcome = self.session.submit_self_assessment(&text, Instant::now());
        self.handle_outcome(outcome);
    }

    pub fn submit_resize(&mut self) {
        let text = std::mem::take(&mut self.input_text);
        self.mode = Mode::Study;
        match text.trim().parse::<usize>() {
            Ok(size) => self.resize_to(size),
            Err(_) => self.flash_message = Some(format!("Not a number: '{}'", text.trim())),
        }
    }

    pub fn resize_by(&mut self, delta: isize) {
        let size = self.session.engine().deck_len().saturating_add_signed(delta);
        self.resize_to(size);
    }

    fn resize_to(&mut self, size: usize) {
        let len = self.session.resize_deck(size);
        self.flash_message = Some(format!("Deck size: {}", len));
    }

    pub fn toggle_filter(&mut self, difficulty: Difficulty) {
        match self.session.toggle_filter(difficulty) {
            Ok(selected) => {
                let verb = if selected { "Showing" } else { "Hiding" };
                self.flash_message = Some(format!("{} {} cards", verb, difficulty));
            }
            Err(e) => self.report(e),
        }
    }

    pub fn flip_all_faces(&mut self) {
        let face = match self.session.current().map(|c| c.face) {
            Some(Face::Home) => Face::Translation,
            _ => Face::Home,
        };
        self.session.bulk_set_face(face);
        self.collect_notice();
    }

    pub fn set_blur_all(&mut self, blur: bool) {
        if let Err(e) = self.session.bulk_set_blur(blur) {
            self.report(e);
        }
        self.collect_notice();
    }

    pub fn undo_hide(&mut self) {
        match self.session.undo_hide() {
            Ok(true) => self.collect_notice(),
            Ok(false) => self.flash_message = Some("Nothing to undo".to_string()),
            Err(e) => self.report(e),
        }
    }

    pub fn restart(&mut self) {
        match self.session.restart() {
            Ok(()) => self.flash_message = Some("New session".to_string()),
            Err(e) => self.report(e),
        }
    }

    /// Switch to the next language in the table and save it
    pub fn cycle_language(&mut self) {
        let codes: Vec<&str> = language_order().collect();
        let current = codes
            .iter()
            .position(|c| *c == self.settings().language)
            .unwrap_or(0);
        let next = codes[(current + 1) % codes.len()].to_string();
        if let Err(e) = self.app.settings.update(|s| s.language = next) {
            log::error!("Failed to save settings: {}", e);
            self.flash_message = Some(format!("Failed to save settings: {}", e));
        }
    }

    /// Bind the next action to the selected direction and save it
    pub fn cycle_gesture(&mut self) {
        let direction = self.gesture_cursor;
        let next = self.settings().gestures.action_for(direction).next();
        if let Err(e) = self.app.settings.update(|s| s.gestures.set(direction, next)) {
            log::error!("Failed to save settings: {}", e);
            self.flash_message = Some(format!("Failed to save settings: {}", e));
        }
    }
}
