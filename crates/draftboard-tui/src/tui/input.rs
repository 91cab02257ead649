// Keyboard and mouse input handling.
//
// Host-level keys (tabs, search, sort, notes, quit) are handled here. Every
// other key is translated to the board core's `KeyInput` and routed through
// the `KeyDispatcher`, which decides between the listening board and the
// text input.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use draftboard_core::board::filter::PositionFilter;
use draftboard_core::board::intents::IntentSink;
use draftboard_core::board::keys::{Dispatch, InputEdit, Key, KeyInput, KeyKind};
use draftboard_core::board::sort::SortState;
use draftboard_core::players::POSITION_CYCLE;

use tracing::warn;

use super::{InputMode, NotesTarget, ViewState};
use crate::protocol::{TabId, UserCommand};

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: isize = 3;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand::Quit)` when the app should exit. Board
/// intents are emitted through `sink` rather than returned.
pub fn handle_key(
    key_event: KeyEvent,
    state: &mut ViewState,
    sink: &mut dyn IntentSink,
) -> Option<UserCommand> {
    // Release/repeat events would double-apply a single keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if state.confirm_quit {
        return handle_confirm_quit(key_event, state);
    }

    if state.input_mode == InputMode::Normal && handle_host_key(key_event.code, state) {
        return None;
    }

    let input = to_key_input(&key_event)?;
    match state.dispatcher.dispatch(input, state.focus()) {
        Dispatch::Board(id, action) => state.apply_board_action(id, action, sink),
        Dispatch::Input(edit) => apply_input_edit(state, edit, sink),
        Dispatch::Ignored => {}
    }
    None
}

/// Translate a crossterm key event into the board core's key type.
pub fn to_key_input(key_event: &KeyEvent) -> Option<KeyInput> {
    let key = match key_event.code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Char(c) => Key::Char(c),
        _ => return None,
    };
    let kind = match key_event.kind {
        KeyEventKind::Press => KeyKind::Press,
        KeyEventKind::Repeat => KeyKind::Repeat,
        KeyEventKind::Release => KeyKind::Release,
    };
    Some(KeyInput {
        key,
        kind,
        ctrl: key_event.modifiers.contains(KeyModifiers::CONTROL),
    })
}

/// Keys that belong to the application rather than a board. Returns true
/// when the key was consumed.
fn handle_host_key(code: KeyCode, state: &mut ViewState) -> bool {
    match code {
        KeyCode::Char('1') => state.switch_tab(TabId::Players),
        KeyCode::Char('2') => state.switch_tab(TabId::Watchlist),
        KeyCode::Char('/') => {
            state.input_text = state.active_board().criteria().search.clone();
            state.input_mode = InputMode::Search;
        }
        KeyCode::Char('p') => cycle_position_filter(state),
        KeyCode::Char('s') => {
            let board = state.active_board_mut();
            let next = board.sort().field.next();
            board.set_sort(SortState::new(next));
        }
        KeyCode::Char('S') => {
            let board = state.active_board_mut();
            let field = board.sort().field;
            board.toggle_sort(field);
        }
        KeyCode::Char('n') => {
            let Some(target) = state.active_board().selected_player().map(|p| NotesTarget {
                id: p.id().to_string(),
                name: p.player.name.clone(),
            }) else {
                return true;
            };
            state.input_text = state.notes_for(&target.id).unwrap_or_default().to_string();
            state.notes_target = Some(target);
            state.input_mode = InputMode::Notes;
        }
        KeyCode::Char('q') => state.confirm_quit = true,
        _ => return false,
    }
    true
}

/// Handle key events while in quit confirmation mode.
///
/// `y` or `q` confirms, `n` or `Esc` cancels, everything else is blocked.
fn handle_confirm_quit(key_event: KeyEvent, state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

fn apply_input_edit(state: &mut ViewState, edit: InputEdit, sink: &mut dyn IntentSink) {
    match (state.input_mode, edit) {
        (InputMode::Normal, _) => {}
        (_, InputEdit::Insert(c)) => {
            state.input_text.push(c);
            sync_search(state);
        }
        (_, InputEdit::Backspace) => {
            state.input_text.pop();
            sync_search(state);
        }
        (InputMode::Search, InputEdit::Commit) => {
            state.input_mode = InputMode::Normal;
            state.input_text.clear();
        }
        (InputMode::Search, InputEdit::Cancel) => {
            state.input_mode = InputMode::Normal;
            state.input_text.clear();
            state.active_board_mut().set_search("");
        }
        (InputMode::Notes, InputEdit::Commit) => {
            if let Some(target) = state.notes_target.take() {
                if !state
                    .active_board()
                    .commit_notes(&target.id, &state.input_text, sink)
                {
                    warn!(id = %target.id, "notes target left the board; edit dropped");
                }
            }
            state.input_mode = InputMode::Normal;
            state.input_text.clear();
        }
        (InputMode::Notes, InputEdit::Cancel) => {
            state.input_mode = InputMode::Normal;
            state.input_text.clear();
            state.notes_target = None;
        }
    }
}

/// Search filters live as the user types.
fn sync_search(state: &mut ViewState) {
    if state.input_mode == InputMode::Search {
        let text = state.input_text.clone();
        state.active_board_mut().set_search(text);
    }
}

/// ALL -> QB -> RB -> WR -> TE -> K -> DEF -> ALL
fn cycle_position_filter(state: &mut ViewState) {
    let board = state.active_board_mut();
    let next = match &board.criteria().position {
        PositionFilter::All => PositionFilter::Only(POSITION_CYCLE[0].clone()),
        PositionFilter::Only(current) => {
            match POSITION_CYCLE.iter().position(|p| p == current) {
                Some(i) if i + 1 < POSITION_CYCLE.len() => {
                    PositionFilter::Only(POSITION_CYCLE[i + 1].clone())
                }
                _ => PositionFilter::All,
            }
        }
    };
    board.set_position(next);
}

/// Handle a mouse event: left click toggles the row under the pointer,
/// the wheel scrolls the board.
pub fn handle_mouse(mouse_event: MouseEvent, state: &mut ViewState) {
    if state.confirm_quit {
        return;
    }
    match mouse_event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(layout) = state.layout else {
                return;
            };
            let first = layout.first_list_row();
            let inside_x = mouse_event.column > layout.board.x
                && mouse_event.column < layout.board.x + layout.board.width.saturating_sub(1);
            if !inside_x || mouse_event.row < first || mouse_event.row >= first + layout.list_height() {
                return;
            }
            let line = usize::from(mouse_event.row - first);
            state.active_board_mut().click_line(line);
        }
        MouseEventKind::ScrollDown => state.active_board_mut().scroll_by(WHEEL_LINES),
        MouseEventKind::ScrollUp => state.active_board_mut().scroll_by(-WHEEL_LINES),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
