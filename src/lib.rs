//! Vocabulary flashcards with a Swedish home language
//!
//! - `words`: the vocabulary list and its stores
//! - `exchange`: CSV import, export and folder sync
//! - `flashcards`: the study session engine
//! - `settings`: user settings and change notification
//! - `services`: speech output and example sentence suggestions

pub mod exchange;
pub mod flashcards;
pub mod languages;
pub mod services;
pub mod settings;
pub mod words;
