use std::collections::BTreeMap;

use anyhow::{bail, Result};

use lexideck_lib::languages::find_language;
use lexideck_lib::words::{NewEntry, Translation};

use crate::app::App;
use crate::OutputFormat;

/// Fields for a new word as given on the command line
pub struct AddArgs<'a> {
    pub home_term: &'a str,
    pub source: &'a str,
    pub subtopic1: &'a str,
    pub subtopic2: &'a str,
    pub example: Option<&'a str>,
    /// `lang=word` pairs
    pub translations: &'a [String],
    /// `lang=example` pairs
    pub examples: &'a [String],
}

fn parse_pair(pair: &str) -> Result<(String, String)> {
    let Some((lang, value)) = pair.split_once('=') else {
        bail!("Expected LANG=TEXT, got '{}'", pair);
    };
    let lang = lang.trim().to_lowercase();
    if find_language(&lang).is_none() {
        bail!("Unknown language code '{}'", lang);
    }
    Ok((lang, value.trim().to_string()))
}

pub fn run(app: &App, args: AddArgs<'_>, format: &OutputFormat, _use_color: bool) -> Result<()> {
    let mut translations: BTreeMap<String, Translation> = BTreeMap::new();
    for pair in args.translations {
        let (lang, word) = parse_pair(pair)?;
        translations.entry(lang).or_default().word = word;
    }
    for pair in args.examples {
        let (lang, example) = parse_pair(pair)?;
        translations.entry(lang).or_default().example = example;
    }
    translations.retain(|_, t| !t.word.is_empty());

    if [args.home_term, args.source, args.subtopic1, args.subtopic2]
        .iter()
        .any(|f| f.trim().is_empty())
    {
        bail!("Word, source and both subtopics are required");
    }
    if translations.is_empty() {
        bail!("At least one translation is required (--tr LANG=WORD)");
    }

    let entry = app.add_word(NewEntry {
        source: args.source.trim().to_string(),
        subtopic1: args.subtopic1.trim().to_string(),
        subtopic2: args.subtopic2.trim().to_string(),
        home_term: args.home_term.trim().to_string(),
        home_example: args.example.unwrap_or_default().trim().to_string(),
        translations,
    })?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        OutputFormat::Plain => {
            println!("Added \"{}\" to {}", entry.home_term, entry.topic_path());
            println!("  ID: {}", entry.id);
        }
    }

    Ok(())
}
