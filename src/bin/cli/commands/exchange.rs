use std::path::Path;

use anyhow::Result;

use crate::app::App;
use crate::render::terminal::render_summary;
use crate::OutputFormat;

pub fn run_import(app: &App, path: &Path, format: &OutputFormat, use_color: bool) -> Result<()> {
    let summary = app.import(path)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Plain => {
            println!("Imported {}: {}", path.display(), render_summary(&summary, use_color));
        }
    }

    Ok(())
}

pub fn run_export(app: &App, path: &Path, format: &OutputFormat, _use_color: bool) -> Result<()> {
    let count = app.export(path)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "exported": count, "path": path.to_string_lossy() });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => println!("Exported {} words to {}", count, path.display()),
    }

    Ok(())
}

pub fn run_sync(app: &App, dir: &Path, format: &OutputFormat, use_color: bool) -> Result<()> {
    let summary = app.sync(dir)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Plain => {
            println!(
                "Synced {} files from {}: {}",
                summary.files_processed,
                dir.display(),
                render_summary(&summary.totals, use_color)
            );
            if summary.files_failed > 0 {
                println!("  {} files could not be read", summary.files_failed);
            }
        }
    }

    Ok(())
}
