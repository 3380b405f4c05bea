use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use lexideck_lib::flashcards::{Direction, GestureAction};
use lexideck_lib::words::Difficulty;

use super::app_state::{Mode, TuiState};

pub fn handle_key(state: &mut TuiState, key: KeyEvent) {
    // Clear flash message on any keypress
    state.flash_message = None;

    match state.mode {
        Mode::Study => handle_study_key(state, key),
        Mode::Answer => handle_input_key(state, key, true),
        Mode::Resize => handle_input_key(state, key, false),
        Mode::Gestures => handle_gestures_key(state, key),
    }
}

fn difficulty_for_digit(c: char) -> Option<Difficulty> {
    match c {
        '0' => Some(Difficulty::Unmarked),
        '1' => Some(Difficulty::Easy),
        '2' => Some(Difficulty::Medium),
        '3' => Some(Difficulty::Hard),
        _ => None,
    }
}

fn handle_study_key(state: &mut TuiState, key: KeyEvent) {
    // Handle pending 'f' key: f0..f3 toggle a difficulty filter
    if state.pending_key == Some('f') {
        state.pending_key = None;
        if let KeyCode::Char(c) = key.code {
            if let Some(difficulty) = difficulty_for_digit(c) {
                state.toggle_filter(difficulty);
                return;
            }
        }
        // Not a filter digit, handle normally
    }

    match key.code {
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Up => state.dispatch(Direction::Up),
        KeyCode::Down => state.dispatch(Direction::Down),
        KeyCode::Left => state.dispatch(Direction::Left),
        KeyCode::Right => state.dispatch(Direction::Right),
        KeyCode::Char(' ') => state.perform(GestureAction::Flip),
        KeyCode::Char('r') => state.perform(GestureAction::ReadAloud),
        KeyCode::Char('h') => state.perform(GestureAction::Hide),
        KeyCode::Char('u') => state.undo_hide(),
        KeyCode::Char(c @ '0'..='3') => {
            if let Some(difficulty) = difficulty_for_digit(c) {
                state.perform(GestureAction::Mark(difficulty));
            }
        }
        KeyCode::Char('f') => {
            state.pending_key = Some('f');
        }
        KeyCode::Char('a') | KeyCode::Enter => {
            state.mode = Mode::Answer;
            state.input_text.clear();
        }
        KeyCode::Char('s') => {
            state.mode = Mode::Resize;
            state.input_text.clear();
        }
        KeyCode::Char('+') => state.resize_by(1),
        KeyCode::Char('-') => state.resize_by(-1),
        KeyCode::Char('v') => state.flip_all_faces(),
        KeyCode::Char('b') => state.set_blur_all(true),
        KeyCode::Char('B') => state.set_blur_all(false),
        KeyCode::Char('l') => state.cycle_language(),
        KeyCode::Char('R') => state.restart(),
        KeyCode::Char('w') => {
            state.mode = Mode::Gestures;
        }
        KeyCode::Char('?') => {
            state.show_help = !state.show_help;
        }
        _ => {}
    }
}

fn handle_input_key(state: &mut TuiState, key: KeyEvent, is_answer: bool) {
    match key.code {
        KeyCode::Esc => {
            state.input_text.clear();
            state.mode = Mode::Study;
        }
        KeyCode::Enter => {
            if is_answer {
                state.submit_answer();
            } else {
                state.submit_resize();
            }
        }
        KeyCode::Backspace => {
            state.input_text.pop();
        }
        KeyCode::Char(c) => {
            if is_answer || c.is_ascii_digit() {
                state.input_text.push(c);
            }
        }
        _ => {}
    }
}

fn handle_gestures_key(state: &mut TuiState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('w') => state.mode = Mode::Study,
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Up => state.gesture_cursor = Direction::Up,
        KeyCode::Down => state.gesture_cursor = Direction::Down,
        KeyCode::Left => state.gesture_cursor = Direction::Left,
        KeyCode::Right => state.gesture_cursor = Direction::Right,
        KeyCode::Enter | KeyCode::Char(' ') => state.cycle_gesture(),
        _ => {}
    }
}

pub fn handle_mouse(state: &mut TuiState, mouse: MouseEvent) {
    if state.mode != Mode::Study {
        return;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            // Only drags that start on the card count
            if let Some(ref area) = state.card_area {
                let (col, row) = (mouse.column, mouse.row);
                if col >= area.x && col < area.x + area.width
                    && row >= area.y && row < area.y + area.height
                {
                    state.touch_start(col, row);
                }
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            state.touch_end(mouse.column, mouse.row);
        }
        _ => {}
    }
}
