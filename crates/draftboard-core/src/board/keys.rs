// Keyboard dispatch for boards.
//
// A board receives keys only while it holds a `Subscription` from the
// dispatcher; dropping the subscription deregisters it. At most one
// subscription exists per board, and the most recently attached board is
// the one keys are routed to.
//
// While focus is in a text input, letters belong to the input and Escape
// cancels the input instead of reaching the board.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::debug;

use super::selection::BoardAction;

/// Framework-independent key codes the board understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Esc,
    Backspace,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Press,
    Repeat,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub kind: KeyKind,
    /// Control held. Chorded keys are never board shortcuts.
    pub ctrl: bool,
}

impl KeyInput {
    pub fn press(key: Key) -> Self {
        KeyInput {
            key,
            kind: KeyKind::Press,
            ctrl: false,
        }
    }
}

/// Where keyboard focus currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Board,
    TextInput,
}

/// Edits routed to the focused text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEdit {
    Insert(char),
    Backspace,
    Commit,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardId(pub &'static str);

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Result of routing one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Board(BoardId, BoardAction),
    Input(InputEdit),
    Ignored,
}

impl Dispatch {
    /// Whether the key was consumed; the caller must not apply any default
    /// handling to a consumed key.
    pub fn handled(&self) -> bool {
        !matches!(self, Dispatch::Ignored)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("board `{0}` already has an active key listener")]
    AlreadyAttached(BoardId),
}

type Registry = Mutex<Vec<BoardId>>;

fn lock(registry: &Registry) -> MutexGuard<'_, Vec<BoardId>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
pub struct KeyDispatcher {
    listeners: Arc<Registry>,
}

/// Registration of a board's key listener. Deregisters on drop.
#[derive(Debug)]
pub struct Subscription {
    board: BoardId,
    listeners: Weak<Registry>,
}

impl Subscription {
    pub fn board(&self) -> BoardId {
        self.board
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            lock(&listeners).retain(|b| *b != self.board);
            debug!("key listener for board {} released", self.board);
        }
    }
}

impl KeyDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, board: BoardId) -> Result<Subscription, DispatchError> {
        let mut listeners = lock(&self.listeners);
        if listeners.contains(&board) {
            return Err(DispatchError::AlreadyAttached(board));
        }
        listeners.push(board);
        debug!("key listener for board {} attached", board);
        Ok(Subscription {
            board,
            listeners: Arc::downgrade(&self.listeners),
        })
    }

    pub fn active_board(&self) -> Option<BoardId> {
        lock(&self.listeners).last().copied()
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }

    pub fn dispatch(&self, input: KeyInput, focus: Focus) -> Dispatch {
        // Release/repeat events would double-apply a single keypress.
        if input.kind != KeyKind::Press || input.ctrl {
            return Dispatch::Ignored;
        }

        if focus == Focus::TextInput {
            match input.key {
                Key::Char(c) => return Dispatch::Input(InputEdit::Insert(c)),
                Key::Backspace => return Dispatch::Input(InputEdit::Backspace),
                Key::Enter => return Dispatch::Input(InputEdit::Commit),
                Key::Esc => return Dispatch::Input(InputEdit::Cancel),
                _ => {}
            }
        }

        let Some(board) = self.active_board() else {
            return Dispatch::Ignored;
        };
        match board_action(input.key) {
            Some(action) => Dispatch::Board(board, action),
            None => Dispatch::Ignored,
        }
    }
}

fn board_action(key: Key) -> Option<BoardAction> {
    let action = match key {
        Key::Down | Key::Char('j') => BoardAction::MoveDown,
        Key::Up | Key::Char('k') => BoardAction::MoveUp,
        Key::PageDown => BoardAction::PageDown,
        Key::PageUp => BoardAction::PageUp,
        Key::Home | Key::Char('g') => BoardAction::First,
        Key::End | Key::Char('G') => BoardAction::Last,
        Key::Enter => BoardAction::Select,
        Key::Char('a') | Key::Char('A') => BoardAction::AddToWatchlist,
        Key::Char('r') | Key::Char('R') => BoardAction::RemoveFromWatchlist,
        Key::Esc => BoardAction::Escape,
        Key::Char(' ') | Key::Char('x') => BoardAction::ToggleExpand,
        _ => return None,
    };
    Some(action)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
