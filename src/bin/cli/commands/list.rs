use std::collections::BTreeMap;

use anyhow::Result;

use lexideck_lib::words::{Difficulty, VocabEntry};

use crate::app::App;
use crate::render::terminal::{render_entry, render_topic};
use crate::OutputFormat;

pub fn run(
    app: &App,
    language: Option<&str>,
    difficulty: Option<Difficulty>,
    include_inactive: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let language = language.unwrap_or(&app.settings().language).to_string();
    let words: Vec<VocabEntry> = app
        .list_words()?
        .into_iter()
        .filter(|w| include_inactive || w.active)
        .filter(|w| difficulty.map_or(true, |d| w.difficulty == d))
        .collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&words)?);
        }
        OutputFormat::Plain => {
            if words.is_empty() {
                println!("(no words)");
                return Ok(());
            }

            let mut by_topic: BTreeMap<String, Vec<&VocabEntry>> = BTreeMap::new();
            for word in &words {
                by_topic.entry(word.topic_path()).or_default().push(word);
            }
            for (topic, entries) in &by_topic {
                println!("{}", render_topic(topic, use_color));
                for entry in entries {
                    println!("{}", render_entry(entry, &language, use_color));
                }
                println!();
            }
            println!("{} words", words.len());
        }
    }

    Ok(())
}
