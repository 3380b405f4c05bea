//! Bulk CSV exchange for the vocabulary list
//!
//! Column layout: topic path (3), home term and example (2), then a
//! word/example pair for every language in `languages::LANGUAGES`.

use std::path::PathBuf;

use thiserror::Error;

use crate::languages::language_order;
use crate::words::WordStoreError;

pub mod export;
pub mod import;

pub use export::{export_csv, export_to_file};
pub use import::{import_csv, import_csv_file, parse_csv, sync_folder, FolderSyncSummary, ImportSummary};

/// Number of columns before the per-language pairs
pub(crate) const FIXED_COLUMNS: usize = 5;

pub(crate) const EXPORT_HEADER_FIXED: [&str; FIXED_COLUMNS] =
    ["Source", "Subtopic1", "Subtopic2", "Swedish", "SwedishExample"];

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Storage error: {0}")]
    Store(#[from] WordStoreError),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("No words to export")]
    NothingToExport,

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

pub type Result<T> = std::result::Result<T, ExchangeError>;

/// Normalized (lower-case, no whitespace) header an import must match
pub(crate) fn expected_header() -> Vec<String> {
    let mut header: Vec<String> = EXPORT_HEADER_FIXED.iter().map(|s| s.to_lowercase()).collect();
    for lang in language_order() {
        header.push(format!("{}_word", lang));
        header.push(format!("{}_example", lang));
    }
    header
}
