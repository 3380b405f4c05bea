//! CSV import for the vocabulary list
//!
//! Rows are validated individually; failures are counted, never raised.
//! A header mismatch rejects the whole file and counts every data row as
//! invalid.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use glob::glob;
use serde::Serialize;

use super::{expected_header, ExchangeError, Result, FIXED_COLUMNS};
use crate::languages::language_order;
use crate::words::{NewEntry, Translation, VocabEntry, WordStore};

/// Aggregate outcome of an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub added: usize,
    pub duplicates: usize,
    pub invalid: usize,
}

impl ImportSummary {
    fn absorb(&mut self, other: ImportSummary) {
        self.added += other.added;
        self.duplicates += other.duplicates;
        self.invalid += other.invalid;
    }
}

/// Outcome of importing every CSV file in a folder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderSyncSummary {
    pub files_processed: usize,
    pub files_failed: usize,
    #[serde(flatten)]
    pub totals: ImportSummary,
}

/// Entries parsed from one CSV text, not yet stored
#[derive(Debug, Clone, Default)]
pub struct ParsedImport {
    pub entries: Vec<NewEntry>,
    pub summary: ImportSummary,
}

fn normalize_header(field: &str) -> String {
    field
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Parse CSV text into new entries.
///
/// `existing_keys` holds the duplicate keys already known (store contents
/// and earlier rows/files); keys of accepted rows are added to it.
pub fn parse_csv(content: &str, existing_keys: &mut HashSet<String>) -> ParsedImport {
    let mut parsed = ParsedImport::default();

    let content = content.trim_start_matches('\u{feff}').trim();
    if content.is_empty() {
        return parsed;
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut records = reader.records();

    let header: Vec<String> = match records.next() {
        Some(Ok(record)) => record.iter().map(normalize_header).collect(),
        Some(Err(e)) => {
            log::error!("Failed to read CSV header: {}", e);
            parsed.summary.invalid = records.count();
            return parsed;
        }
        None => return parsed,
    };

    let expected = expected_header();
    if header != expected {
        log::error!("Header mismatch. Expected: {:?}, got: {:?}", expected, header);
        parsed.summary.invalid = records.count();
        return parsed;
    }

    for (row_idx, result) in records.enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::debug!("Skipping unreadable row {}: {}", row_idx + 1, e);
                parsed.summary.invalid += 1;
                continue;
            }
        };

        let field = |i: usize| record.get(i).unwrap_or("").to_string();

        let (source, subtopic1, subtopic2, home_term) = (field(0), field(1), field(2), field(3));
        if source.is_empty() || subtopic1.is_empty() || subtopic2.is_empty() || home_term.is_empty() {
            parsed.summary.invalid += 1;
            continue;
        }

        let mut draft = NewEntry {
            source,
            subtopic1,
            subtopic2,
            home_term,
            home_example: field(4),
            translations: BTreeMap::new(),
        };

        let key = draft.duplicate_key();
        if existing_keys.contains(&key) {
            parsed.summary.duplicates += 1;
            continue;
        }

        for (lang_idx, lang) in language_order().enumerate() {
            let word = field(FIXED_COLUMNS + lang_idx * 2);
            if word.is_empty() {
                continue;
            }
            let example = field(FIXED_COLUMNS + lang_idx * 2 + 1);
            draft.translations.insert(lang.to_string(), Translation::new(word, example));
        }

        if draft.translations.is_empty() {
            parsed.summary.invalid += 1;
            continue;
        }

        existing_keys.insert(key);
        parsed.entries.push(draft);
        parsed.summary.added += 1;
    }

    parsed
}

fn existing_keys(store: &dyn WordStore) -> Result<HashSet<String>> {
    Ok(store.list()?.iter().map(VocabEntry::duplicate_key).collect())
}

/// Import CSV text into the store
pub fn import_csv(store: &dyn WordStore, content: &str) -> Result<ImportSummary> {
    let mut keys = existing_keys(store)?;
    let parsed = parse_csv(content, &mut keys);

    let entries: Vec<VocabEntry> = parsed.entries.into_iter().map(VocabEntry::new).collect();
    store.append(entries)?;

    log::info!(
        "CSV import: {} added, {} duplicates, {} invalid",
        parsed.summary.added,
        parsed.summary.duplicates,
        parsed.summary.invalid
    );
    Ok(parsed.summary)
}

/// Import a CSV file into the store
pub fn import_csv_file(store: &dyn WordStore, path: &Path) -> Result<ImportSummary> {
    let content = fs::read_to_string(path)?;
    import_csv(store, &content)
}

/// Import every `*.csv` file in `dir`, sharing one duplicate key set so
/// a word present in two files is only added once.
pub fn sync_folder(store: &dyn WordStore, dir: &Path) -> Result<FolderSyncSummary> {
    if !dir.is_dir() {
        return Err(ExchangeError::NotADirectory(dir.to_path_buf()));
    }

    let pattern = dir.join("*.csv");
    let pattern = pattern.to_string_lossy();

    let mut keys = existing_keys(store)?;
    let mut summary = FolderSyncSummary::default();
    let mut to_add = Vec::new();

    let mut paths: Vec<_> = glob(&pattern)?.filter_map(|p| p.ok()).collect();
    paths.sort();

    for path in paths {
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Failed to read {:?}: {}", path, e);
                summary.files_failed += 1;
                continue;
            }
        };

        let parsed = parse_csv(&content, &mut keys);
        summary.files_processed += 1;
        summary.totals.absorb(parsed.summary);
        to_add.extend(parsed.entries.into_iter().map(VocabEntry::new));
    }

    store.append(to_add)?;

    log::info!(
        "Folder sync of {:?}: {} files, {} added, {} duplicates",
        dir,
        summary.files_processed,
        summary.totals.added,
        summary.totals.duplicates
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::MemoryWordStore;
    use tempfile::TempDir;

    const FULL_HEADER: &str = "source,subtopic1,subtopic2,swedish,swedishexample,en_word,en_example,es_word,es_example,fa_word,fa_example,el_word,el_example,uk_word,uk_example,ru_word,ru_example,hi_word,hi_example,bn_word,bn_example,sq_word,sq_example,tr_word,tr_example,ms_word,ms_example,fil_word,fil_example";

    fn valid_row(home: &str) -> String {
        format!("src,sub1,sub2,{},ex,{}-en,en example,,,,,,,,,,,,,,,,,,,,,", home, home)
    }

    #[test]
    fn test_parse_valid_row() {
        let csv_text = format!("{}\n{}", FULL_HEADER, valid_row("hus"));
        let mut keys = HashSet::new();
        let parsed = parse_csv(&csv_text, &mut keys);

        assert_eq!(parsed.summary, ImportSummary { added: 1, duplicates: 0, invalid: 0 });
        let entry = &parsed.entries[0];
        assert_eq!(entry.source, "src");
        assert_eq!(entry.home_term, "hus");
        assert_eq!(entry.home_example, "ex");
        assert_eq!(entry.translations["en"].word, "hus-en");
        assert_eq!(entry.translations["en"].example, "en example");
        assert_eq!(entry.translations.len(), 1);
        assert!(keys.contains("src|sub1|sub2|hus"));
    }

    #[test]
    fn test_invalid_header_counts_every_row() {
        let csv_text = "invalid_header,subtopic1,subtopic2,swedish,swedishexample,en_word,en_example\n\
                        a,b,c,d,e,f,g\n\
                        h,i,j,k,l,m,n";
        let parsed = parse_csv(csv_text, &mut HashSet::new());
        assert!(parsed.entries.is_empty());
        assert_eq!(parsed.summary, ImportSummary { added: 0, duplicates: 0, invalid: 2 });
    }

    #[test]
    fn test_header_is_case_and_space_insensitive_with_bom() {
        let header = FULL_HEADER
            .replace("source", "\u{feff}Source")
            .replace("swedishexample", "Swedish Example");
        let csv_text = format!("{}\n{}", header, valid_row("hus"));
        let parsed = parse_csv(&csv_text, &mut HashSet::new());
        assert_eq!(parsed.summary.added, 1);
    }

    #[test]
    fn test_skips_duplicates() {
        let csv_text = format!("{}\n{}\n{}", FULL_HEADER, valid_row("hus"), valid_row("HUS"));
        let mut keys: HashSet<String> = HashSet::new();
        let parsed = parse_csv(&csv_text, &mut keys);
        assert_eq!(parsed.summary, ImportSummary { added: 1, duplicates: 1, invalid: 0 });

        let mut keys: HashSet<String> = ["src|sub1|sub2|hus".to_string()].into_iter().collect();
        let parsed = parse_csv(&csv_text, &mut keys);
        assert_eq!(parsed.summary, ImportSummary { added: 0, duplicates: 2, invalid: 0 });
    }

    #[test]
    fn test_malformed_rows_are_invalid() {
        let csv_text = format!(
            "{}\n,,,,,\nsrc,sub1,sub2,bil,ex\n{}",
            FULL_HEADER,
            valid_row("hus")
        );
        let parsed = parse_csv(&csv_text, &mut HashSet::new());
        assert_eq!(parsed.summary, ImportSummary { added: 1, duplicates: 0, invalid: 2 });
    }

    #[test]
    fn test_quoted_fields() {
        let row = "src,sub1,sub2,hus,\"Ett \"\"stort\"\", fint hus\",house,\"a house, big\",,,,,,,,,,,,,,,,,,,,,";
        let csv_text = format!("{}\n{}", FULL_HEADER, row);
        let parsed = parse_csv(&csv_text, &mut HashSet::new());
        assert_eq!(parsed.summary.added, 1);
        assert_eq!(parsed.entries[0].home_example, "Ett \"stort\", fint hus");
        assert_eq!(parsed.entries[0].translations["en"].example, "a house, big");
    }

    #[test]
    fn test_import_into_store_respects_existing() {
        let store = MemoryWordStore::new();
        let csv_text = format!("{}\n{}\n{}", FULL_HEADER, valid_row("hus"), valid_row("bil"));

        let first = import_csv(&store, &csv_text).unwrap();
        assert_eq!(first.added, 2);

        let second = import_csv(&store, &csv_text).unwrap();
        assert_eq!(second, ImportSummary { added: 0, duplicates: 2, invalid: 0 });
        assert_eq!(store.list().unwrap().len(), 2);
        assert!(store.list().unwrap().iter().all(|w| w.active && w.back_count == 0));
    }

    #[test]
    fn test_sync_folder_dedups_across_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("a.csv"),
            format!("{}\n{}\n{}", FULL_HEADER, valid_row("hus"), valid_row("bil")),
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("b.csv"),
            format!("{}\n{}\n{}", FULL_HEADER, valid_row("bil"), valid_row("båt")),
        )
        .unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let store = MemoryWordStore::new();
        let summary = sync_folder(&store, temp_dir.path()).unwrap();

        assert_eq!(summary.files_processed, 2);
        assert_eq!(summary.totals.added, 3);
        assert_eq!(summary.totals.duplicates, 1);
        assert_eq!(store.list().unwrap().len(), 3);
    }

    #[test]
    fn test_sync_folder_rejects_file_path() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.csv");
        fs::write(&file, FULL_HEADER).unwrap();
        let store = MemoryWordStore::new();
        assert!(matches!(
            sync_folder(&store, &file),
            Err(ExchangeError::NotADirectory(_))
        ));
    }
}
