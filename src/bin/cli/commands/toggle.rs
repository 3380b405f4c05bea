use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run_word(app: &App, query: &str, format: &OutputFormat, _use_color: bool) -> Result<()> {
    let (word, active) = app.toggle_word(query)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": word.id.to_string(),
                "homeTerm": word.home_term,
                "active": active,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            let state = if active { "active" } else { "inactive" };
            println!("\"{}\" is now {}", word.home_term, state);
        }
    }

    Ok(())
}

pub fn run_topic(
    app: &App,
    source: &str,
    subtopic1: Option<&str>,
    subtopic2: Option<&str>,
    active: bool,
    format: &OutputFormat,
    _use_color: bool,
) -> Result<()> {
    let changed = app.set_topic_active(source, subtopic1, subtopic2, active)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "changed": changed, "active": active });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            let state = if active { "activated" } else { "deactivated" };
            println!("{} {} words", state, changed);
        }
    }

    Ok(())
}
