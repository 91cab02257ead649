// TUI: board views, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding one `Board` per tab plus mirrors of the
// orchestrator's watchlist and notes. The orchestrator pushes `UiUpdate`
// messages over an mpsc channel; board intents flow back as `UserCommand`s
// through a `ChannelSink`. Frames are redrawn at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{info, warn};

use draftboard_core::board::intents::{ChannelSink, IntentSink};
use draftboard_core::board::keys::{BoardId, Focus, KeyDispatcher, Subscription};
use draftboard_core::board::selection::BoardAction;
use draftboard_core::board::{Board, BoardSettings};
use draftboard_core::players::{ImportedRanks, Player};

use crate::protocol::{TabId, UiUpdate, UserCommand, WatchlistEntry};

use layout::{build_layout, AppLayout};

pub const PLAYERS_BOARD: BoardId = BoardId("players");
pub const WATCHLIST_BOARD: BoardId = BoardId("watchlist");

/// What the keyboard is currently typing into, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Notes,
}

/// Player whose notes are open in the editor, captured when it opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesTarget {
    pub id: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

pub struct ViewState {
    pub active_tab: TabId,
    pub players_board: Board,
    pub watchlist_board: Board,
    /// Full player list; the watchlist board shows a subset of it.
    all_players: Arc<Vec<Player>>,
    pub watchlist: Vec<WatchlistEntry>,
    pub watchlist_ids: HashSet<String>,
    pub notes: BTreeMap<String, String>,
    /// Last player chosen with Enter, as confirmed by the orchestrator.
    pub focused: Option<Player>,
    pub input_mode: InputMode,
    /// Text being typed in search or notes mode.
    pub input_text: String,
    pub notes_target: Option<NotesTarget>,
    pub confirm_quit: bool,
    /// Layout of the last drawn frame, for mouse hit testing.
    pub layout: Option<AppLayout>,
    dispatcher: KeyDispatcher,
    subscription: Option<Subscription>,
}

impl ViewState {
    pub fn new(players: Arc<Vec<Player>>, ranks: Arc<ImportedRanks>, settings: BoardSettings) -> Self {
        let mut players_board = Board::new(PLAYERS_BOARD, settings);
        players_board.set_players(Arc::clone(&players));
        players_board.set_ranks(Arc::clone(&ranks));

        let mut watchlist_board = Board::new(WATCHLIST_BOARD, settings);
        watchlist_board.set_ranks(ranks);

        let mut state = ViewState {
            active_tab: TabId::Players,
            players_board,
            watchlist_board,
            all_players: players,
            watchlist: Vec::new(),
            watchlist_ids: HashSet::new(),
            notes: BTreeMap::new(),
            focused: None,
            input_mode: InputMode::Normal,
            input_text: String::new(),
            notes_target: None,
            confirm_quit: false,
            layout: None,
            dispatcher: KeyDispatcher::new(),
            subscription: None,
        };
        state.attach(PLAYERS_BOARD);
        state
    }

    pub fn board_id(tab: TabId) -> BoardId {
        match tab {
            TabId::Players => PLAYERS_BOARD,
            TabId::Watchlist => WATCHLIST_BOARD,
        }
    }

    pub fn active_board(&self) -> &Board {
        match self.active_tab {
            TabId::Players => &self.players_board,
            TabId::Watchlist => &self.watchlist_board,
        }
    }

    pub fn active_board_mut(&mut self) -> &mut Board {
        match self.active_tab {
            TabId::Players => &mut self.players_board,
            TabId::Watchlist => &mut self.watchlist_board,
        }
    }

    pub fn focus(&self) -> Focus {
        match self.input_mode {
            InputMode::Normal => Focus::Board,
            InputMode::Search | InputMode::Notes => Focus::TextInput,
        }
    }

    /// Board currently receiving keys, if any.
    pub fn listening_board(&self) -> Option<BoardId> {
        self.dispatcher.active_board()
    }

    /// Show `tab`, moving the key listener to its board.
    pub fn switch_tab(&mut self, tab: TabId) {
        if tab == self.active_tab {
            return;
        }
        // Release before acquiring so only one board ever listens.
        self.subscription = None;
        self.active_tab = tab;
        self.input_mode = InputMode::Normal;
        self.input_text.clear();
        self.notes_target = None;
        self.attach(Self::board_id(tab));
    }

    fn attach(&mut self, board: BoardId) {
        match self.dispatcher.attach(board) {
            Ok(sub) => self.subscription = Some(sub),
            Err(e) => warn!("could not attach key listener: {}", e),
        }
    }

    /// Route a dispatched action to the board it was addressed to.
    pub fn apply_board_action(&mut self, id: BoardId, action: BoardAction, sink: &mut dyn IntentSink) {
        let board = if id == WATCHLIST_BOARD {
            &mut self.watchlist_board
        } else {
            &mut self.players_board
        };
        board.handle(action, &self.watchlist_ids, sink);
    }

    pub fn set_watchlist(&mut self, entries: Vec<WatchlistEntry>) {
        self.watchlist_ids = entries.iter().map(|e| e.id.clone()).collect();
        self.watchlist = entries;
        let watched: Vec<Player> = self
            .all_players
            .iter()
            .filter(|p| self.watchlist_ids.contains(&p.id))
            .cloned()
            .collect();
        self.watchlist_board.set_players(Arc::new(watched));
    }

    pub fn notes_for(&self, id: &str) -> Option<&str> {
        self.notes.get(id).map(String::as_str)
    }

    /// Size both boards to the list area of `layout`.
    fn fit_to(&mut self, layout: AppLayout) {
        let lines = usize::from(layout.list_height());
        for board in [&mut self.players_board, &mut self.watchlist_board] {
            let base = board.settings().geometry.base_row_height.max(1);
            board.set_viewport_rows(lines / base);
        }
        self.layout = Some(layout);
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Watchlist(entries) => state.set_watchlist(entries),
        UiUpdate::Notes(notes) => state.notes = notes,
        UiUpdate::Focused(player) => state.focused = Some(*player),
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

pub fn render_frame(frame: &mut Frame, state: &mut ViewState) {
    let layout = build_layout(frame.area());
    state.fit_to(layout);

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::board_table::render(frame, layout.board, state);
    widgets::help_bar::render(frame, layout.help_bar, state);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop until the user quits or the orchestrator goes
/// away.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    mut view_state: ViewState,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();
    crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut sink = ChannelSink::new(cmd_tx.clone());
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    info!("TUI started");

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state, &mut sink) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(Event::Mouse(mouse_event))) => {
                        input::handle_mouse(mouse_event, &mut view_state);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("terminal input error: {}", e);
                        break;
                    }
                    None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &mut view_state))?;
            }
        }
    }

    crossterm::execute!(std::io::stdout(), DisableMouseCapture)?;
    ratatui::restore();
    info!("TUI stopped");

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use draftboard_core::players::Position;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn roster() -> Arc<Vec<Player>> {
        Arc::new(
            (0..30)
                .map(|i| {
                    let mut p = Player::new(i.to_string(), format!("Player {i}"), Position::WideReceiver);
                    p.projected_points = Some(300.0 - i as f64);
                    p
                })
                .collect(),
        )
    }

    fn state() -> ViewState {
        ViewState::new(roster(), Arc::new(ImportedRanks::new()), BoardSettings::default())
    }

    fn entry(id: &str) -> WatchlistEntry {
        WatchlistEntry {
            id: id.into(),
            name: format!("Player {id}"),
            added_at: Utc::now(),
        }
    }

    #[test]
    fn starts_on_players_with_listener_attached() {
        let s = state();
        assert_eq!(s.active_tab, TabId::Players);
        assert_eq!(s.listening_board(), Some(PLAYERS_BOARD));
        assert_eq!(s.players_board.ordered().len(), 30);
        assert!(s.watchlist_board.ordered().is_empty());
    }

    #[test]
    fn switching_tabs_moves_listener() {
        let mut s = state();
        s.switch_tab(TabId::Watchlist);
        assert_eq!(s.listening_board(), Some(WATCHLIST_BOARD));
        assert_eq!(s.dispatcher.listener_count(), 1);
        s.switch_tab(TabId::Players);
        s.switch_tab(TabId::Players);
        assert_eq!(s.listening_board(), Some(PLAYERS_BOARD));
        assert_eq!(s.dispatcher.listener_count(), 1);
    }

    #[test]
    fn watchlist_update_rebuilds_watchlist_board() {
        let mut s = state();
        apply_ui_update(&mut s, UiUpdate::Watchlist(vec![entry("3"), entry("7")]));
        assert!(s.watchlist_ids.contains("3"));
        let ids: Vec<&str> = s.watchlist_board.ordered().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["3", "7"]);

        apply_ui_update(&mut s, UiUpdate::Watchlist(vec![entry("7")]));
        assert_eq!(s.watchlist_board.ordered().len(), 1);
        assert_eq!(s.watchlist_board.selected(), Some(0));
    }

    #[test]
    fn notes_and_focus_updates() {
        let mut s = state();
        let mut notes = BTreeMap::new();
        notes.insert("2".to_string(), "boom/bust".to_string());
        apply_ui_update(&mut s, UiUpdate::Notes(notes));
        assert_eq!(s.notes_for("2"), Some("boom/bust"));

        let p = s.all_players[4].clone();
        apply_ui_update(&mut s, UiUpdate::Focused(Box::new(p.clone())));
        assert_eq!(s.focused, Some(p));
    }

    #[test]
    fn render_sizes_boards_to_terminal() {
        let mut s = state();
        let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
        terminal.draw(|frame| render_frame(frame, &mut s)).unwrap();
        let layout = s.layout.unwrap();
        assert_eq!(layout.list_height(), 15);
        assert_eq!(s.players_board.window().len(), 15);
    }

    #[test]
    fn render_with_quit_dialog_does_not_panic() {
        let mut s = state();
        s.confirm_quit = true;
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render_frame(frame, &mut s)).unwrap();
    }
}
