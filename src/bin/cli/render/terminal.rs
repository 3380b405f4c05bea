use lexideck_lib::exchange::ImportSummary;
use lexideck_lib::words::{Difficulty, VocabEntry};

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub fn difficulty_badge(difficulty: Difficulty, use_color: bool) -> String {
    match difficulty {
        Difficulty::Unmarked => String::new(),
        Difficulty::Easy => paint("[easy]", Color::GREEN, use_color),
        Difficulty::Medium => paint("[medium]", Color::YELLOW, use_color),
        Difficulty::Hard => paint("[hard]", Color::RED, use_color),
    }
}

/// One line per word: home term, translation, badges
pub fn render_entry(entry: &VocabEntry, language: &str, use_color: bool) -> String {
    let term = paint(&entry.home_term, Color::BOLD, use_color);
    let translation = entry
        .translation(language)
        .filter(|t| !t.word.is_empty())
        .map(|t| t.word.as_str())
        .unwrap_or("-");

    let mut line = format!("  {} = {}", term, translation);
    let badge = difficulty_badge(entry.difficulty, use_color);
    if !badge.is_empty() {
        line.push(' ');
        line.push_str(&badge);
    }
    if !entry.active {
        line.push(' ');
        line.push_str(&paint("(inactive)", Color::GRAY, use_color));
    }
    if entry.back_count > 0 {
        line.push_str(&paint(&format!(" x{}", entry.back_count), Color::DIM, use_color));
    }
    line
}

/// Topic heading printed above a group of words
pub fn render_topic(path: &str, use_color: bool) -> String {
    paint(path, Color::CYAN, use_color)
}

pub fn render_summary(summary: &ImportSummary, use_color: bool) -> String {
    format!(
        "{} added, {} duplicates, {} invalid",
        paint(&summary.added.to_string(), Color::GREEN, use_color),
        paint(&summary.duplicates.to_string(), Color::YELLOW, use_color),
        paint(&summary.invalid.to_string(), Color::RED, use_color),
    )
}
