//! Input handling.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use super::app::App;

/// Handle a crossterm event.
/// Returns true if the event was handled.
pub fn handle_input(app: &mut App, event: Event) -> bool {
    match event {
        Event::Key(key) => handle_key(app, key),
        _ => false,
    }
}

/// Handle a key event.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    // Control chords first; plain characters go to the query.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => {
                app.cancel();
                true
            }
            KeyCode::Char('u') => {
                app.clear_query();
                true
            }
            KeyCode::Char('y') => {
                app.copy_selected_path();
                true
            }
            KeyCode::Char('n') => {
                app.select_next();
                true
            }
            KeyCode::Char('p') => {
                app.select_prev();
                true
            }
            KeyCode::Char('g') => {
                app.select_first();
                true
            }
            _ => false,
        };
    }

    match key.code {
        KeyCode::Esc => {
            app.cancel();
            true
        }
        KeyCode::Enter => {
            app.accept_selected();
            true
        }
        KeyCode::Down => {
            app.select_next();
            true
        }
        KeyCode::Up => {
            app.select_prev();
            true
        }
        KeyCode::Backspace => {
            app.backspace_query();
            true
        }
        KeyCode::Char(c) => {
            app.push_query_char(c);
            true
        }
        _ => false,
    }
}
