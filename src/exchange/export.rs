use std::fs;
use std::path::Path;

use super::{ExchangeError, Result, EXPORT_HEADER_FIXED};
use crate::languages::language_order;
use crate::words::{VocabEntry, WordStore};

fn header_row() -> Vec<String> {
    let mut header: Vec<String> = EXPORT_HEADER_FIXED.iter().map(|s| s.to_string()).collect();
    for lang in language_order() {
        header.push(format!("{}_Word", lang));
        header.push(format!("{}_Example", lang));
    }
    header
}

fn entry_row(entry: &VocabEntry) -> Vec<&str> {
    let mut row = vec![
        entry.source.as_str(),
        entry.subtopic1.as_str(),
        entry.subtopic2.as_str(),
        entry.home_term.as_str(),
        entry.home_example.as_str(),
    ];
    for lang in language_order() {
        match entry.translation(lang) {
            Some(t) => {
                row.push(t.word.as_str());
                row.push(t.example.as_str());
            }
            None => {
                row.push("");
                row.push("");
            }
        }
    }
    row
}

/// Render entries as CSV text with a leading byte-order mark.
///
/// Fields containing the delimiter, a quote or a line break are quoted
/// with inner quotes doubled.
pub fn export_csv(entries: &[VocabEntry]) -> Result<String> {
    if entries.is_empty() {
        return Err(ExchangeError::NothingToExport);
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(header_row())?;
    for entry in entries {
        writer.write_record(entry_row(entry))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExchangeError::Encoding(e.to_string()))?;
    let body = String::from_utf8(bytes).map_err(|e| ExchangeError::Encoding(e.to_string()))?;

    Ok(format!("\u{feff}{}", body.trim_end_matches('\n')))
}

/// Export the whole store to `path`, returning the number of rows written
pub fn export_to_file(store: &dyn WordStore, path: &Path) -> Result<usize> {
    let entries = store.list()?;
    let content = export_csv(&entries)?;
    fs::write(path, content)?;
    log::info!("Exported {} words to {:?}", entries.len(), path);
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::import::{parse_csv, ImportSummary};
    use crate::words::{NewEntry, Translation};
    use std::collections::{BTreeMap, HashSet};

    fn entry(home: &str, example: &str) -> VocabEntry {
        let mut translations = BTreeMap::new();
        translations.insert("en".to_string(), Translation::new(format!("{}-en", home), "x"));
        translations.insert("fil".to_string(), Translation::new(format!("{}-fil", home), ""));
        VocabEntry::new(NewEntry {
            source: "Book".to_string(),
            subtopic1: "One".to_string(),
            subtopic2: "Two".to_string(),
            home_term: home.to_string(),
            home_example: example.to_string(),
            translations,
        })
    }

    #[test]
    fn test_empty_export_is_rejected() {
        assert!(matches!(export_csv(&[]), Err(ExchangeError::NothingToExport)));
    }

    #[test]
    fn test_header_and_bom() {
        let text = export_csv(&[entry("hus", "")]).unwrap();
        assert!(text.starts_with('\u{feff}'));
        let first_line = text.trim_start_matches('\u{feff}').lines().next().unwrap();
        assert!(first_line.starts_with("Source,Subtopic1,Subtopic2,Swedish,SwedishExample,en_Word,en_Example,es_Word"));
        assert!(first_line.ends_with("fil_Word,fil_Example"));
    }

    #[test]
    fn test_quotes_special_fields() {
        let text = export_csv(&[entry("hus", "Ett \"stort\", fint hus")]).unwrap();
        assert!(text.contains("\"Ett \"\"stort\"\", fint hus\""));
    }

    #[test]
    fn test_round_trip() {
        let entries = vec![
            entry("hus", "Ett hus."),
            entry("bil", "Bilen, den röda"),
            entry("båt", "Line one\nline two"),
        ];
        let text = export_csv(&entries).unwrap();

        let parsed = parse_csv(&text, &mut HashSet::new());
        assert_eq!(
            parsed.summary,
            ImportSummary { added: entries.len(), duplicates: 0, invalid: 0 }
        );
        assert_eq!(parsed.entries[1].home_example, "Bilen, den röda");
        assert_eq!(parsed.entries[2].home_example, "Line one\nline two");
        assert_eq!(parsed.entries[0].translations["fil"].word, "hus-fil");
    }
}
