//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Keys mean different things
//! in the two input modes: while searching, printable characters edit the
//! search term; otherwise they are commands.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_browse_key`] that calls it.
//! 3. Update the help text in [`crate::ui`]'s status bar.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, InputMode};
use crate::view::SortKey;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit = true;
        return;
    }

    match app.mode {
        InputMode::Search => handle_search_key(app, key),
        InputMode::Browse => handle_browse_key(app, key),
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.end_search(),
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => app.clear_search(),
        KeyCode::Char(c)
            if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            app.push_search_char(c)
        }
        _ => {}
    }
}

fn handle_browse_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('s') => app.cycle_sort_key(),
        KeyCode::Char('1') => app.set_sort_key(SortKey::Points),
        KeyCode::Char('2') => app.set_sort_key(SortKey::Date),
        KeyCode::Char('3') => app.set_sort_key(SortKey::Title),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => app.next_page(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => app.previous_page(),
        KeyCode::Home | KeyCode::Char('g') => app.first_page(),
        KeyCode::End | KeyCode::Char('G') => app.last_page(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Char('r') => app.request_retry(),
        _ => {}
    }
}
