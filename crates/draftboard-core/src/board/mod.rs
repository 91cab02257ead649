// Player-board interaction core.
//
// A `Board` ties the pipeline together for one surface: it owns the filter
// and sort state, recomputes the ordered view when any input changes, and
// drives the selection controller and rendering window against it.

pub mod derive;
pub mod filter;
pub mod intents;
pub mod keys;
pub mod selection;
pub mod sort;
pub mod view;
pub mod window;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::players::{ImportedRanks, Player};

use derive::DerivedPlayer;
use filter::{FilterCriteria, PositionFilter};
use intents::IntentSink;
use keys::BoardId;
use selection::{BoardAction, EscapeAction, SelectionController, Transition};
use sort::{SortField, SortState};
use view::ViewCache;
use window::{OffsetMode, RowGeometry, Window};

/// Per-board behavior knobs, normally built from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSettings {
    pub geometry: RowGeometry,
    pub offset_mode: OffsetMode,
    pub escape: EscapeAction,
    pub page_size: usize,
    pub default_sort: SortState,
}

impl Default for BoardSettings {
    fn default() -> Self {
        BoardSettings {
            geometry: RowGeometry::default(),
            offset_mode: OffsetMode::Uniform,
            escape: EscapeAction::ClearSelection,
            page_size: 20,
            default_sort: SortState::default(),
        }
    }
}

/// What the rendering layer should draw.
#[derive(Debug)]
pub enum BoardView<'a> {
    /// Nothing to show. `filtered` is true when players exist but none pass
    /// the current criteria.
    Empty { filtered: bool },
    Rows {
        window: Window,
        rows: &'a [DerivedPlayer],
    },
}

pub struct Board {
    id: BoardId,
    settings: BoardSettings,
    players: Arc<Vec<Player>>,
    ranks: Arc<ImportedRanks>,
    criteria: FilterCriteria,
    sort: SortState,
    cache: ViewCache,
    ordered: Arc<Vec<DerivedPlayer>>,
    selection: SelectionController,
    scroll_offset: usize,
    viewport_rows: usize,
}

impl Board {
    pub fn new(id: BoardId, settings: BoardSettings) -> Self {
        Board {
            id,
            settings,
            players: Arc::new(Vec::new()),
            ranks: Arc::new(ImportedRanks::new()),
            criteria: FilterCriteria::default(),
            sort: settings.default_sort,
            cache: ViewCache::new(),
            ordered: Arc::new(Vec::new()),
            selection: SelectionController::new(0, settings.escape, settings.page_size),
            scroll_offset: 0,
            viewport_rows: settings.page_size,
        }
    }

    // -- inputs --

    pub fn set_players(&mut self, players: Arc<Vec<Player>>) {
        self.players = players;
        self.refresh();
    }

    pub fn set_ranks(&mut self, ranks: Arc<ImportedRanks>) {
        self.ranks = ranks;
        self.refresh();
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refresh();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.criteria.search = search.into();
        self.refresh();
    }

    pub fn set_position(&mut self, position: PositionFilter) {
        self.criteria.position = position;
        self.refresh();
    }

    /// Header click on `field`.
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
        self.refresh();
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
        self.refresh();
    }

    /// Tell the board how many base-height rows fit on screen.
    pub fn set_viewport_rows(&mut self, rows: usize) {
        self.viewport_rows = rows;
        self.scroll_offset = self.scroll_offset.min(self.max_scroll_offset());
    }

    // -- accessors --

    pub fn id(&self) -> BoardId {
        self.id
    }

    pub fn ordered(&self) -> &[DerivedPlayer] {
        &self.ordered
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn selected(&self) -> Option<usize> {
        self.selection.selected()
    }

    pub fn selected_player(&self) -> Option<&DerivedPlayer> {
        self.selection.selected_player(&self.ordered)
    }

    pub fn expanded_id(&self) -> Option<&str> {
        self.selection.expanded_id()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn total_players(&self) -> usize {
        self.players.len()
    }

    pub fn settings(&self) -> &BoardSettings {
        &self.settings
    }

    // -- interaction --

    pub fn handle(
        &mut self,
        action: BoardAction,
        watchlist: &HashSet<String>,
        sink: &mut dyn IntentSink,
    ) -> Transition {
        let transition = self.selection.apply(action, &self.ordered, watchlist, sink);
        if let Some(request) = transition.scroll {
            self.scroll_offset = window::center_offset(
                &self.ordered,
                self.selection.expanded_id(),
                request.index,
                self.viewport_rows,
                self.settings.geometry,
                self.settings.offset_mode,
            );
        } else if transition.changed {
            self.scroll_offset = self.scroll_offset.min(self.max_scroll_offset());
        }
        transition
    }

    /// Pointer click on the row drawn `line` lines below the top of the list.
    pub fn click_line(&mut self, line: usize) -> bool {
        match self.window().index_at(line) {
            Some(index) => self.click_row(index),
            None => false,
        }
    }

    pub fn click_row(&mut self, index: usize) -> bool {
        let toggled = self.selection.click_row(index, &self.ordered);
        if toggled {
            self.scroll_offset = self.scroll_offset.min(self.max_scroll_offset());
        }
        toggled
    }

    /// Wheel scrolling, in lines.
    pub fn scroll_by(&mut self, delta: isize) {
        let next = self.scroll_offset.saturating_add_signed(delta);
        self.scroll_offset = next.min(self.max_scroll_offset());
    }

    pub fn commit_notes(&self, id: &str, text: &str, sink: &mut dyn IntentSink) -> bool {
        self.selection.commit_notes(&self.ordered, id, text, sink)
    }

    // -- rendering --

    pub fn window(&self) -> Window {
        window::compute_window(
            &self.ordered,
            self.selection.expanded_id(),
            self.scroll_offset,
            self.viewport_rows,
            self.settings.geometry,
            self.settings.offset_mode,
        )
    }

    pub fn view(&self) -> BoardView<'_> {
        if self.ordered.is_empty() {
            return BoardView::Empty {
                filtered: !self.players.is_empty(),
            };
        }
        BoardView::Rows {
            window: self.window(),
            rows: &self.ordered,
        }
    }

    fn max_scroll_offset(&self) -> usize {
        window::max_scroll_offset(
            &self.ordered,
            self.selection.expanded_id(),
            self.viewport_rows,
            self.settings.geometry,
            self.settings.offset_mode,
        )
    }

    fn refresh(&mut self) {
        let next = self
            .cache
            .ordered(&self.players, &self.ranks, &self.criteria, self.sort);
        if Arc::ptr_eq(&next, &self.ordered) {
            return;
        }
        if next.len() != self.ordered.len() {
            debug!(
                "board {}: ordered list length {} -> {}, resetting navigation",
                self.id,
                self.ordered.len(),
                next.len()
            );
            self.selection.reset(next.len());
            self.scroll_offset = 0;
        }
        self.ordered = next;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::intents::{Intent, RecordingSink};
    use crate::players::Position;

    fn roster(n: usize) -> Arc<Vec<Player>> {
        Arc::new(
            (0..n)
                .map(|i| {
                    let pos = if i % 2 == 0 {
                        Position::Quarterback
                    } else {
                        Position::RunningBack
                    };
                    let mut p = Player::new(format!("p{i}"), format!("Player {i}"), pos);
                    p.projected_points = Some((n - i) as f64);
                    p
                })
                .collect(),
        )
    }

    fn board(n: usize) -> Board {
        let mut b = Board::new(BoardId("players"), BoardSettings::default());
        b.set_players(roster(n));
        b.set_viewport_rows(10);
        b
    }

    #[test]
    fn loading_players_selects_first_row() {
        let b = board(5);
        assert_eq!(b.selected(), Some(0));
        assert_eq!(b.ordered().len(), 5);
    }

    #[test]
    fn empty_board_reports_sentinel() {
        let b = Board::new(BoardId("players"), BoardSettings::default());
        assert!(matches!(b.view(), BoardView::Empty { filtered: false }));
        assert_eq!(b.selected(), None);
    }

    #[test]
    fn no_matches_reports_filtered_sentinel() {
        let mut b = board(5);
        b.set_search("nobody by this name");
        assert!(matches!(b.view(), BoardView::Empty { filtered: true }));
        assert_eq!(b.selected(), None);
    }

    #[test]
    fn filter_change_resets_navigation_when_length_changes() {
        let mut b = board(40);
        let mut sink = RecordingSink::default();
        for _ in 0..15 {
            b.handle(BoardAction::MoveDown, &HashSet::new(), &mut sink);
        }
        assert_eq!(b.selected(), Some(15));
        assert!(b.scroll_offset() > 0);

        b.set_position(PositionFilter::Only(Position::Quarterback));
        assert_eq!(b.ordered().len(), 20);
        assert_eq!(b.selected(), Some(0));
        assert_eq!(b.scroll_offset(), 0);
    }

    #[test]
    fn sort_change_keeps_index_when_length_is_unchanged() {
        let mut b = board(5);
        let mut sink = RecordingSink::default();
        b.handle(BoardAction::MoveDown, &HashSet::new(), &mut sink);
        b.toggle_sort(SortField::ProjectedPoints);
        assert_eq!(b.selected(), Some(1));
        assert_eq!(b.ordered()[0].id(), "p4");
    }

    #[test]
    fn navigation_centers_selected_row() {
        let mut b = board(100);
        let mut sink = RecordingSink::default();
        for _ in 0..50 {
            b.handle(BoardAction::MoveDown, &HashSet::new(), &mut sink);
        }
        let window = b.window();
        assert!(window.range().contains(&50));
        assert_eq!(b.scroll_offset(), 50 - 4);
    }

    #[test]
    fn enter_emits_selected_player() {
        let mut b = board(3);
        let mut sink = RecordingSink::default();
        b.handle(BoardAction::Select, &HashSet::new(), &mut sink);
        assert_eq!(sink.intents.len(), 1);
        assert!(matches!(&sink.intents[0], Intent::Select(p) if p.id == "p0"));
    }

    #[test]
    fn click_line_expands_row_under_pointer() {
        let mut b = board(10);
        assert!(b.click_line(3));
        assert_eq!(b.expanded_id(), Some("p3"));
        // Row 3 now spans lines 3..8; line 9 is row 5.
        assert!(b.click_line(9));
        assert_eq!(b.expanded_id(), Some("p5"));
        assert!(!b.click_line(500));
    }

    #[test]
    fn scroll_by_is_clamped() {
        let mut b = board(30);
        b.scroll_by(-5);
        assert_eq!(b.scroll_offset(), 0);
        b.scroll_by(1_000);
        assert_eq!(b.scroll_offset(), 20);
        let w = b.window();
        assert_eq!(w.range(), 20..30);
    }

    #[test]
    fn rank_import_changes_derived_view() {
        let mut b = board(2);
        let mut players = (*roster(2)).clone();
        players[0].adp = Some(10.0);
        b.set_players(Arc::new(players));
        let ranks: ImportedRanks = [("Player 0".to_string(), 15.0)].into_iter().collect();
        b.set_ranks(Arc::new(ranks));
        let p0 = b.ordered().iter().find(|p| p.id() == "p0").unwrap();
        assert!(p0.value_vs_adp.as_ref().unwrap().is_value);
        assert_eq!(p0.effective_adp, Some(15.0));
    }
}
