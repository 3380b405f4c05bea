use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::app_state::{Mode, TuiState};

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState) {
    // Show flash message if present
    if let Some(ref msg) = state.flash_message {
        let flash = Paragraph::new(format!(" {}", msg))
            .style(Style::default().bg(Color::Green).fg(Color::Black));
        f.render_widget(flash, area);
        return;
    }

    match state.mode {
        Mode::Answer => {
            let text = format!(" Answer: {}█", state.input_text);
            let prompt = Paragraph::new(text)
                .style(Style::default().bg(Color::Blue).fg(Color::White));
            f.render_widget(prompt, area);
        }
        Mode::Resize => {
            let text = format!(" Deck size: {}█", state.input_text);
            let prompt = Paragraph::new(text)
                .style(Style::default().bg(Color::Magenta).fg(Color::White));
            f.render_widget(prompt, area);
        }
        Mode::Gestures => {
            let status = Paragraph::new(" Arrows: pick direction  Enter: next action  Esc: done ")
                .style(Style::default().bg(Color::DarkGray).fg(Color::White));
            f.render_widget(status, area);
        }
        Mode::Study => {
            let hints = if state.session.is_locked() {
                " Showing the answer... "
            } else {
                " Arrows: gestures  Space: flip  a: answer  h: hide  ?: help  q: quit "
            };
            let status = Paragraph::new(hints)
                .style(Style::default().bg(Color::DarkGray).fg(Color::White));
            f.render_widget(status, area);
        }
    }
}
