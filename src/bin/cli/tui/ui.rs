use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use lexideck_lib::flashcards::Direction as Swipe;
use lexideck_lib::languages::language_or_default;
use lexideck_lib::words::Difficulty;

use super::app_state::{Mode, TuiState};
use super::{card_widget, status_bar};

/// Parse a `#rrggbb` theme color
pub fn theme_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    let channel = |i: usize| hex.get(i..i + 2).and_then(|s| u8::from_str_radix(s, 16).ok());
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Reset,
    }
}

pub fn draw(f: &mut Frame, state: &mut TuiState) {
    let size = f.area();

    // Main layout: header + card + status bar
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(size);

    draw_header(f, outer[0], state);

    let card_area = outer[1];
    state.card_area = Some(card_area);
    card_widget::draw(f, card_area, state);

    if state.mode == Mode::Gestures {
        draw_gestures(f, card_area, state);
    } else if state.show_help {
        draw_help(f, card_area);
    }

    status_bar::draw(f, outer[2], state);
}

fn draw_header(f: &mut Frame, area: Rect, state: &TuiState) {
    let colors = state.settings().theme().colors;
    let engine = state.session.engine();
    let language = language_or_default(state.session.language());

    let filters: String = Difficulty::ALL
        .iter()
        .map(|d| {
            let initial = d.as_str()[..1].to_uppercase();
            if state.session.filter().contains(*d) {
                initial
            } else {
                "·".to_string()
            }
        })
        .collect();

    let text = format!(
        " Swedish ↔ {}  |  deck {}  pool {}  removed {}  active {}  |  filters [{}]",
        language.english_name,
        engine.deck_len(),
        engine.pool_len(),
        engine.removed_len(),
        engine.total_active_count(),
        filters,
    );
    let header = Paragraph::new(text).style(
        Style::default()
            .bg(theme_color(colors[0]))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(header, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_gestures(f: &mut Frame, area: Rect, state: &TuiState) {
    let popup = centered(area, 46, 8);
    f.render_widget(Clear, popup);

    let accent = theme_color(state.settings().theme().colors[2]);
    let gestures = &state.settings().gestures;
    let lines: Vec<Line> = Swipe::ALL
        .iter()
        .map(|direction| {
            let action = gestures.action_for(*direction);
            let text = format!(" {:<6} {}", direction.as_str(), action.label());
            if *direction == state.gesture_cursor {
                Line::from(Span::styled(
                    format!(">{}", text),
                    Style::default().fg(accent).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(format!(" {}", text))
            }
        })
        .collect();

    let block = Block::default()
        .title(" Gestures ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));
    f.render_widget(Paragraph::new(lines).block(block), popup);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let popup = centered(area, 52, 18);
    f.render_widget(Clear, popup);

    let help = [
        "Arrows     gesture (up/down/left/right)",
        "Mouse drag swipe on the card",
        "Space      flip",
        "r          read aloud",
        "a/Enter    type an answer (.. = send back)",
        "h / u      hide card / undo hide",
        "0-3        mark unmarked/easy/medium/hard",
        "f0-f3      toggle difficulty filter",
        "+ / - / s  grow / shrink / set deck size",
        "v          switch face on all cards",
        "b / B      blur / unblur all cards",
        "l          next language",
        "w          edit gestures",
        "R          restart session",
        "q          quit",
    ];
    let lines: Vec<Line> = help.iter().map(|l| Line::from(format!(" {}", l))).collect();
    let block = Block::default().title(" Help ").borders(Borders::ALL);
    f.render_widget(Paragraph::new(lines).block(block), popup);
}
