// Selection & expansion state machine.
//
// Tracks the single selected index and the single expanded row id against
// the current ordered list. Navigation clamps to `[0, len - 1]`; an empty
// list makes every action a no-op.

use std::collections::HashSet;

use super::derive::DerivedPlayer;
use super::intents::IntentSink;

/// Discrete inputs the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    MoveDown,
    MoveUp,
    PageDown,
    PageUp,
    First,
    Last,
    Select,
    AddToWatchlist,
    RemoveFromWatchlist,
    Escape,
    ToggleExpand,
}

/// What Escape does on a board. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeAction {
    #[default]
    ClearSelection,
    Collapse,
}

/// Request to scroll row `index` to the middle of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transition {
    /// Whether selection or expansion state changed.
    pub changed: bool,
    pub scroll: Option<ScrollRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionController {
    selected: Option<usize>,
    expanded_id: Option<String>,
    escape: EscapeAction,
    page_size: usize,
}

impl SelectionController {
    pub fn new(len: usize, escape: EscapeAction, page_size: usize) -> Self {
        SelectionController {
            selected: initial_selection(len),
            expanded_id: None,
            escape,
            page_size: page_size.max(1),
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn expanded_id(&self) -> Option<&str> {
        self.expanded_id.as_deref()
    }

    pub fn selected_player<'a>(&self, list: &'a [DerivedPlayer]) -> Option<&'a DerivedPlayer> {
        self.selected.and_then(|i| list.get(i))
    }

    /// Back to the initial state for a list of `len` rows. Expansion is
    /// keyed by id and survives.
    pub fn reset(&mut self, len: usize) {
        self.selected = initial_selection(len);
    }

    pub fn apply(
        &mut self,
        action: BoardAction,
        list: &[DerivedPlayer],
        watchlist: &HashSet<String>,
        sink: &mut dyn IntentSink,
    ) -> Transition {
        match action {
            BoardAction::MoveDown => self.navigate(list.len(), |cur, last| match cur {
                Some(i) => (i + 1).min(last),
                None => 0,
            }),
            BoardAction::MoveUp => {
                self.navigate(list.len(), |cur, _| cur.map_or(0, |i| i.saturating_sub(1)))
            }
            BoardAction::PageDown => {
                let page = self.page_size;
                self.navigate(list.len(), |cur, last| cur.map_or(0, |i| (i + page).min(last)))
            }
            BoardAction::PageUp => {
                let page = self.page_size;
                self.navigate(list.len(), |cur, _| cur.map_or(0, |i| i.saturating_sub(page)))
            }
            BoardAction::First => self.navigate(list.len(), |_, _| 0),
            BoardAction::Last => self.navigate(list.len(), |_, last| last),
            BoardAction::Select => {
                if let Some(p) = self.selected_player(list) {
                    sink.on_player_select(&p.player);
                }
                Transition::default()
            }
            BoardAction::AddToWatchlist => {
                if let Some(p) = self.selected_player(list) {
                    if !watchlist.contains(p.id()) {
                        sink.on_add_to_watchlist(&p.player);
                    }
                }
                Transition::default()
            }
            BoardAction::RemoveFromWatchlist => {
                if let Some(p) = self.selected_player(list) {
                    if watchlist.contains(p.id()) {
                        sink.on_remove_from_watchlist(p.id());
                    }
                }
                Transition::default()
            }
            BoardAction::Escape => {
                let changed = match self.escape {
                    EscapeAction::ClearSelection => self.selected.take().is_some(),
                    EscapeAction::Collapse => self.expanded_id.take().is_some(),
                };
                Transition {
                    changed,
                    scroll: None,
                }
            }
            BoardAction::ToggleExpand => match self.selected_player(list) {
                Some(p) => {
                    let id = p.id().to_string();
                    self.toggle_expanded(&id);
                    Transition {
                        changed: true,
                        scroll: self.selected.map(|index| ScrollRequest { index }),
                    }
                }
                None => Transition::default(),
            },
        }
    }

    /// Pointer click on row `index`: toggle its expansion.
    pub fn click_row(&mut self, index: usize, list: &[DerivedPlayer]) -> bool {
        match list.get(index) {
            Some(p) => {
                let id = p.id().to_string();
                self.toggle_expanded(&id);
                true
            }
            None => false,
        }
    }

    /// Expand `id`, or collapse it if it is already the expanded row.
    /// Expanding a row displaces any other expanded row.
    pub fn toggle_expanded(&mut self, id: &str) {
        if self.expanded_id.as_deref() == Some(id) {
            self.expanded_id = None;
        } else {
            self.expanded_id = Some(id.to_string());
        }
    }

    /// Report edited notes for player `id`, which the editor captured when
    /// it opened. Returns false when that player is no longer on the list.
    pub fn commit_notes(
        &self,
        list: &[DerivedPlayer],
        id: &str,
        text: &str,
        sink: &mut dyn IntentSink,
    ) -> bool {
        match list.iter().find(|p| p.id() == id) {
            Some(p) => {
                sink.on_notes_change(p.id(), text);
                true
            }
            None => false,
        }
    }

    fn navigate(
        &mut self,
        len: usize,
        step: impl FnOnce(Option<usize>, usize) -> usize,
    ) -> Transition {
        if len == 0 {
            return Transition::default();
        }
        let last = len - 1;
        // A stale index from a longer list is treated as the last row.
        let current = self.selected.map(|i| i.min(last));
        let next = step(current, last).min(last);
        let changed = self.selected != Some(next);
        self.selected = Some(next);
        Transition {
            changed,
            scroll: Some(ScrollRequest { index: next }),
        }
    }
}

fn initial_selection(len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
