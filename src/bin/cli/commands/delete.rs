use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, queries: &[String], format: &OutputFormat, _use_color: bool) -> Result<()> {
    let deleted = app.delete_words(queries)?;

    match format {
        OutputFormat::Json => {
            let ids: Vec<String> = deleted.iter().map(|w| w.id.to_string()).collect();
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "deleted": ids }))?);
        }
        OutputFormat::Plain => {
            for word in &deleted {
                println!("Deleted \"{}\" ({})", word.home_term, word.topic_path());
            }
        }
    }

    Ok(())
}
