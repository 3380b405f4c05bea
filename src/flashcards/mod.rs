//! Flashcard study sessions
//!
//! This module provides:
//! - The deck engine (deck, removed stack and pool of session cards)
//! - Gesture resolution and the user-editable gesture map
//! - The reveal-then-act sequence for deferred actions
//! - `StudySession`, which wires the above to a word store and a speaker

pub mod deck;
pub mod gestures;
pub mod models;
pub mod reveal;
pub mod session;

pub use deck::{DeckEngine, DEFAULT_INITIAL_DECK_SIZE};
pub use gestures::{resolve_swipe, Direction, GestureAction, GestureActionMap, SwipeTracker};
pub use models::*;
pub use reveal::{DeferredAction, RevealEvent, RevealMachine, RevealPhase, TaskSlot};
pub use session::{CardDisplay, DispatchOutcome, SessionError, StudySession};
