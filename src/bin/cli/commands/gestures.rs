use anyhow::{anyhow, Context, Result};

use lexideck_lib::flashcards::{Direction, GestureAction, GestureActionMap};

use crate::app::App;
use crate::OutputFormat;

fn print_map(map: &GestureActionMap, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(map)?),
        OutputFormat::Plain => {
            for direction in Direction::ALL {
                let action = map.action_for(direction);
                println!("  {:<6} {:<20} ({})", direction.as_str(), action.label(), action);
            }
        }
    }
    Ok(())
}

pub fn run_show(app: &App, format: &OutputFormat, _use_color: bool) -> Result<()> {
    print_map(&app.settings().gestures, format)
}

pub fn run_actions(format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let names: Vec<String> = GestureAction::ALL.iter().map(|a| a.to_string()).collect();
            println!("{}", serde_json::to_string_pretty(&names)?);
        }
        OutputFormat::Plain => {
            for action in GestureAction::ALL {
                let timing = if action.is_deferred() { "after reveal" } else { "immediate" };
                println!("  {:<20} {:<22} {}", action.to_string(), action.label(), timing);
            }
        }
    }
    Ok(())
}

pub fn run_set(app: &mut App, direction: &str, action: &str, format: &OutputFormat, _use_color: bool) -> Result<()> {
    let direction: Direction = direction.parse().map_err(|e: String| anyhow!(e))?;
    let action: GestureAction = action.parse().map_err(|e: String| anyhow!(e))?;

    let settings = app
        .settings
        .update(|s| s.gestures.set(direction, action))
        .context("Failed to save settings")?;
    print_map(&settings.gestures, format)
}
