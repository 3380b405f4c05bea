//! Vocabulary list for lexideck
//!
//! This module provides:
//! - The vocabulary entry model (home term, translations, progress fields)
//! - The `WordStore` contract used by the flashcard engine
//! - JSON-file and in-memory store implementations

pub mod models;
pub mod storage;

pub use models::*;
pub use storage::{FileWordStore, MemoryWordStore, WordStore, WordStoreError};
