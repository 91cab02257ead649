// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Board (fill)                                      |
// |                                                   |
// +--------------------------------------------------+
// | Input / Help Bar (1 row)                          |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Layout, Rect};

/// Lines the board block spends on its borders and header row.
pub const BOARD_CHROME_ROWS: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    /// Tabs, sort state, focused player.
    pub status_bar: Rect,
    /// The active board's table.
    pub board: Rect,
    /// Text input while typing, key hints otherwise.
    pub help_bar: Rect,
}

impl AppLayout {
    /// Terminal row of the first list line inside the board block.
    pub fn first_list_row(&self) -> u16 {
        self.board.y + 2
    }

    /// Number of list lines the board can show.
    pub fn list_height(&self) -> u16 {
        self.board.height.saturating_sub(BOARD_CHROME_ROWS)
    }
}

pub fn build_layout(area: Rect) -> AppLayout {
    let [status_bar, board, help_bar] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(BOARD_CHROME_ROWS + 1),
        Constraint::Length(1),
    ])
    .areas(area);

    AppLayout {
        status_bar,
        board,
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
