use anyhow::{Context, Result};

use lexideck_lib::languages::{find_language, HOME_LANGUAGE_NAME};
use lexideck_lib::services::{ExampleSuggester, GeminiSuggester};

use crate::app::App;
use crate::OutputFormat;

/// Language name for the prompt: a code from the language table, or any name as given
fn language_name(language: Option<&str>) -> String {
    match language {
        None => HOME_LANGUAGE_NAME.to_string(),
        Some(lang) => find_language(&lang.to_lowercase())
            .map(|l| l.english_name.to_string())
            .unwrap_or_else(|| lang.to_string()),
    }
}

pub fn run(app: &App, word: &str, language: Option<&str>, format: &OutputFormat, _use_color: bool) -> Result<()> {
    let language = language_name(language);
    let suggester = GeminiSuggester::from_settings(app.settings());

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let example = runtime.block_on(suggester.suggest(word, &language));

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "word": word,
                "language": language,
                "example": example,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => println!("{}", example),
    }

    Ok(())
}
