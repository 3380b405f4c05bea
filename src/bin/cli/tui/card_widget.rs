use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use lexideck_lib::flashcards::{CardDisplay, SessionStatus, Side};
use lexideck_lib::words::Difficulty;

use super::app_state::TuiState;
use super::ui::theme_color;

fn side_lines(side: &Side, term_style: Style) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(side.term.clone(), term_style))];
    if !side.example.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            side.example.clone(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}

fn message(lines: &[&str]) -> Vec<Line<'static>> {
    let mut out = vec![Line::from("")];
    out.extend(lines.iter().map(|l| {
        Line::from(Span::styled(l.to_string(), Style::default().fg(Color::DarkGray)))
    }));
    out
}

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState) {
    let colors = state.settings().theme().colors;
    let (primary, secondary, accent) = (
        theme_color(colors[0]),
        theme_color(colors[1]),
        theme_color(colors[2]),
    );
    let session = &state.session;
    let engine = session.engine();

    let title = match session.current() {
        Some(card) => format!(
            " {} / {}  {} ",
            engine.current_index() + 1,
            engine.deck_len(),
            card.entry.topic_path()
        ),
        None => " Flashcards ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if session.is_locked() {
            Style::default().fg(accent)
        } else {
            Style::default().fg(primary)
        });

    let lines: Vec<Line> = match session.status() {
        SessionStatus::NoMatches => message(&[
            "  No words match the current language and filters.",
            "  Toggle filters with f0-f3, press l for another language,",
            "  or add words with `lexideck add` / `lexideck import`.",
        ]),
        SessionStatus::Completed => message(&[
            "  Session complete: every card has been hidden.",
            "  Press u to bring back the last one or R to start over.",
        ]),
        SessionStatus::Active => {
            let (Some(card), Some(sides), Some(display)) =
                (session.current(), session.current_sides(), session.display())
            else {
                return;
            };
            let term_style = Style::default().fg(secondary).add_modifier(Modifier::BOLD);

            let mut lines = vec![Line::from("")];
            match display {
                CardDisplay::Blurred => {
                    let width = sides.front.term.chars().count().max(6);
                    lines.push(Line::from(Span::styled(
                        "░".repeat(width),
                        Style::default().fg(Color::DarkGray),
                    )));
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        "(blurred: flip to reveal)",
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                CardDisplay::Front => lines.extend(side_lines(&sides.front, term_style)),
                CardDisplay::Back => {
                    lines.extend(side_lines(&sides.front, Style::default().fg(Color::DarkGray)));
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled("─".repeat(24), Style::default().fg(primary))));
                    lines.push(Line::from(""));
                    lines.extend(side_lines(&sides.back, term_style));
                }
            }

            let mut footer = Vec::new();
            if card.entry.difficulty != Difficulty::Unmarked {
                footer.push(format!("[{}]", card.entry.difficulty));
            }
            if card.entry.back_count > 0 {
                footer.push(format!("sent back {}x", card.entry.back_count));
            }
            if !footer.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    footer.join("  "),
                    Style::default().fg(accent),
                )));
            }
            lines
        }
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
