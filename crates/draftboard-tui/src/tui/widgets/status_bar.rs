// Status bar widget: tab indicator, sort state, position filter, focus.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use draftboard_core::board::sort::SortState;
use draftboard_core::players::Player;

use crate::protocol::TabId;
use crate::tui::ViewState;

/// Layout: [tabs] | [sort] | [position] | [focused player]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let board = state.active_board();
    let separator = || Span::styled(" | ", Style::default().fg(Color::Gray));

    let mut spans = vec![Span::raw(" ")];
    spans.extend(tab_spans(state.active_tab, state.watchlist.len()));
    spans.push(separator());
    spans.push(Span::styled(sort_label(board.sort()), Style::default().fg(Color::White)));
    spans.push(separator());
    spans.push(Span::styled(
        format!("Pos: {}", board.criteria().position.display_str()),
        Style::default().fg(Color::White),
    ));
    if let Some(player) = &state.focused {
        spans.push(separator());
        spans.push(Span::styled(
            focus_label(player),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// "[1:Players] [2:Watchlist (3)]" with the active tab highlighted.
pub fn tab_spans(active: TabId, watch_count: usize) -> Vec<Span<'static>> {
    let tabs = [
        (TabId::Players, "1:Players".to_string()),
        (TabId::Watchlist, format!("2:Watchlist ({})", watch_count)),
    ];

    let mut spans = Vec::new();
    for (tab_id, label) in tabs {
        let style = if tab_id == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}]", label), style));
        spans.push(Span::raw(" "));
    }
    spans.pop();
    spans
}

pub fn sort_label(sort: SortState) -> String {
    format!("Sort: {} {}", sort.field.label(), sort.direction.arrow())
}

fn focus_label(player: &Player) -> String {
    format!(
        "Focus: {} ({}, {})",
        player.name,
        player.position.display_str(),
        player.team_display()
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
