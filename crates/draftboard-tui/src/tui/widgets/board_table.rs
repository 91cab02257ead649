// Player board widget: header, windowed rows, and expanded row details.
//
// Only the rows in the board's current window are built. Each row takes
// exactly the number of lines the window assigned it, so mouse hit testing
// via `Window::index_at` lines up with what is on screen.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use draftboard_core::board::derive::DerivedPlayer;
use draftboard_core::board::filter::PositionFilter;
use draftboard_core::board::sort::{SortField, SortState};
use draftboard_core::board::BoardView;

use crate::protocol::TabId;
use crate::tui::ViewState;

/// Board columns in display order, with their widths.
const COLUMNS: &[(SortField, usize)] = &[
    (SortField::Name, 24),
    (SortField::Team, 5),
    (SortField::Position, 5),
    (SortField::ProjectedPoints, 7),
    (SortField::ReferencePoints, 7),
    (SortField::PointDelta, 7),
    (SortField::Vorp, 7),
    (SortField::Tier, 5),
    (SortField::Adp, 7),
    (SortField::EffectiveAdp, 7),
    (SortField::ValueVsAdp, 9),
    (SortField::NewsCount, 6),
    (SortField::ByeWeek, 5),
];

const WATCH_MARKER: &str = "★ ";
const NO_MARKER: &str = "  ";
const MISSING: &str = "--";

/// Render the active board into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let board = state.active_board();
    let mut lines = vec![header_line(board.sort())];

    match board.view() {
        BoardView::Empty { filtered } => {
            lines.push(Line::styled(
                empty_message(state.active_tab, filtered),
                Style::default().fg(Color::DarkGray),
            ));
        }
        BoardView::Rows { window, rows } => {
            let selected = board.selected();
            let expanded = board.expanded_id();
            for (k, index) in window.range().enumerate() {
                let Some(player) = rows.get(index) else {
                    break;
                };
                let height = window.row_heights.get(k).copied().unwrap_or(1);
                let row = RowContext {
                    selected: selected == Some(index),
                    expanded: expanded == Some(player.id()),
                    watched: state.watchlist_ids.contains(player.id()),
                    notes: state.notes_for(player.id()),
                };
                lines.extend(row_lines(player, height, &row));
            }
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(build_title(state));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

struct RowContext<'a> {
    selected: bool,
    expanded: bool,
    watched: bool,
    notes: Option<&'a str>,
}

/// Column header with the sort arrow on the active column.
pub fn header_line(sort: SortState) -> Line<'static> {
    let mut spans = vec![Span::raw(NO_MARKER)];
    for &(field, width) in COLUMNS {
        let label = if field == sort.field {
            format!("{}{}", field.label(), sort.direction.arrow())
        } else {
            field.label().to_string()
        };
        let style = if field == sort.field {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        spans.push(Span::styled(pad(field, &label, width), style));
    }
    Line::from(spans)
}

/// Lines for one row, exactly `height` of them.
fn row_lines(player: &DerivedPlayer, height: usize, row: &RowContext<'_>) -> Vec<Line<'static>> {
    let mut lines = vec![summary_line(player, row.watched)];
    if row.expanded {
        lines.extend(detail_lines(player, row.notes));
    }
    lines.resize(height, Line::default());

    if row.selected {
        let style = Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD);
        for line in &mut lines {
            line.style = style;
        }
    }
    lines
}

fn summary_line(player: &DerivedPlayer, watched: bool) -> Line<'static> {
    let marker = if watched {
        Span::styled(WATCH_MARKER, Style::default().fg(Color::Yellow))
    } else {
        Span::raw(NO_MARKER)
    };
    let mut spans = vec![marker];
    for &(field, width) in COLUMNS {
        let text = pad(field, &cell_text(player, field, width), width);
        let span = if field == SortField::ValueVsAdp {
            Span::styled(text, Style::default().fg(value_color(player)))
        } else {
            Span::raw(text)
        };
        spans.push(span);
    }
    Line::from(spans)
}

/// The extra lines shown under an expanded row.
pub fn detail_lines(player: &DerivedPlayer, notes: Option<&str>) -> Vec<Line<'static>> {
    let p = &player.player;
    let label = Style::default().fg(Color::DarkGray);
    let detail = |name: &str, value: String| {
        vec![
            Span::styled(format!("{name} "), label),
            Span::raw(value),
            Span::raw("  "),
        ]
    };

    let mut team = vec![Span::raw("    ")];
    team.extend(detail("Team", p.team_display().to_string()));
    team.extend(detail("Bye", opt(p.bye_week)));
    team.extend(detail("Tier", opt(p.tier)));
    team.extend(detail("News", opt(p.news_count)));

    let mut points = vec![Span::raw("    ")];
    points.extend(detail("Projected", opt_f64(p.projected_points, 1)));
    points.extend(detail("Reference", opt_f64(p.reference_points, 1)));
    points.extend(detail("Delta", signed(p.point_delta)));
    points.extend(detail("VORP", opt_f64(p.vorp, 1)));

    let mut market = vec![Span::raw("    ")];
    market.extend(detail("ADP", opt_f64(p.adp, 1)));
    market.extend(detail("eADP", opt_f64(player.effective_adp, 1)));
    market.push(Span::styled("Value ", label));
    market.push(Span::styled(
        value_text(player),
        Style::default().fg(value_color(player)),
    ));

    let notes_line = Line::from(vec![
        Span::raw("    "),
        Span::styled("Notes ", label),
        Span::styled(
            notes.unwrap_or(MISSING).to_string(),
            Style::default().fg(Color::Cyan),
        ),
    ]);

    vec![
        Line::from(team),
        Line::from(points),
        Line::from(market),
        notes_line,
    ]
}

/// Text for one column of the summary line.
pub fn cell_text(player: &DerivedPlayer, field: SortField, width: usize) -> String {
    let p = &player.player;
    match field {
        SortField::Name => truncate(&p.name, width.saturating_sub(1)),
        SortField::Team => p.team_display().to_string(),
        SortField::Position => p.position.display_str().to_string(),
        SortField::ProjectedPoints => opt_f64(p.projected_points, 1),
        SortField::ReferencePoints => opt_f64(p.reference_points, 1),
        SortField::PointDelta => signed(p.point_delta),
        SortField::Vorp => opt_f64(p.vorp, 1),
        SortField::Tier => opt(p.tier),
        SortField::Adp => opt_f64(p.adp, 1),
        SortField::EffectiveAdp => opt_f64(player.effective_adp, 1),
        SortField::ValueVsAdp => value_text(player),
        SortField::NewsCount => opt(p.news_count),
        SortField::ByeWeek => opt(p.bye_week),
    }
}

/// "+12.5%" for values, "-3.0%" otherwise, "--" without a comparison.
pub fn value_text(player: &DerivedPlayer) -> String {
    match &player.value_vs_adp {
        Some(v) if v.is_value => format!("+{}%", v.percentage),
        Some(v) => format!("{}%", v.percentage),
        None => MISSING.to_string(),
    }
}

pub fn value_color(player: &DerivedPlayer) -> Color {
    match &player.value_vs_adp {
        Some(v) if v.is_value => Color::Green,
        Some(v) if v.value < 0.0 => Color::Red,
        _ => Color::Reset,
    }
}

fn build_title(state: &ViewState) -> Line<'static> {
    let board = state.active_board();
    let mut title = format!(" {}", tab_title(state.active_tab));
    if let PositionFilter::Only(pos) = &board.criteria().position {
        title.push_str(&format!(" [{}]", pos.display_str()));
    }
    if !board.criteria().search.is_empty() {
        title.push_str(&format!(" \"{}\"", board.criteria().search));
    }
    title.push_str(&format!(
        " ({}/{}) ",
        board.ordered().len(),
        board.total_players()
    ));
    Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD)))
}

fn tab_title(tab: TabId) -> &'static str {
    match tab {
        TabId::Players => "Players",
        TabId::Watchlist => "Watchlist",
    }
}

pub fn empty_message(tab: TabId, filtered: bool) -> &'static str {
    match (tab, filtered) {
        (_, true) => "  No players match the current filters.",
        (TabId::Players, false) => "  No players loaded.",
        (TabId::Watchlist, false) => "  Watchlist is empty. Press 'a' on a player to add them.",
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Names are left aligned, numbers right aligned with a trailing gap.
fn pad(field: SortField, text: &str, width: usize) -> String {
    match field {
        SortField::Name | SortField::Team | SortField::Position => {
            format!("{:<width$}", text, width = width)
        }
        _ => format!("{:>width$} ", text, width = width.saturating_sub(1)),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

fn opt_f64(v: Option<f64>, precision: usize) -> String {
    v.map_or_else(|| MISSING.to_string(), |v| format!("{:.*}", precision, v))
}

fn signed(v: Option<f64>) -> String {
    v.map_or_else(|| MISSING.to_string(), |v| format!("{:+.1}", v))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use draftboard_core::board::derive::derive;
    use draftboard_core::board::intents::RecordingSink;
    use draftboard_core::board::selection::BoardAction;
    use draftboard_core::board::sort::SortDirection;
    use draftboard_core::board::BoardSettings;
    use draftboard_core::players::{ImportedRanks, Player, Position};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Arc;

    fn mahomes() -> Player {
        let mut p = Player::new("1", "Patrick Mahomes", Position::Quarterback);
        p.team = Some("KC".into());
        p.projected_points = Some(380.4);
        p.point_delta = Some(-4.5);
        p.adp = Some(40.0);
        p.bye_week = Some(6);
        p
    }

    fn ranks() -> ImportedRanks {
        let mut r = ImportedRanks::new();
        r.insert("Patrick Mahomes".into(), 50.0);
        r
    }

    fn state_with(players: Vec<Player>) -> ViewState {
        ViewState::new(Arc::new(players), Arc::new(ranks()), BoardSettings::default())
    }

    fn draw(state: &mut ViewState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        let buf = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn cells_use_placeholders_for_missing_stats() {
        let d = derive(&Player::new("9", "Nobody", Position::Kicker), &ImportedRanks::new());
        assert_eq!(cell_text(&d, SortField::Team, 5), "FA");
        assert_eq!(cell_text(&d, SortField::Vorp, 7), "--");
        assert_eq!(cell_text(&d, SortField::ValueVsAdp, 9), "--");
        assert_eq!(value_color(&d), Color::Reset);
    }

    #[test]
    fn value_column_shows_signed_percentage() {
        let d = derive(&mahomes(), &ranks());
        assert_eq!(value_text(&d), "+25.0%");
        assert_eq!(value_color(&d), Color::Green);
        assert_eq!(cell_text(&d, SortField::PointDelta, 7), "-4.5");

        let mut r = ImportedRanks::new();
        r.insert("Patrick Mahomes".into(), 30.0);
        let d = derive(&mahomes(), &r);
        assert_eq!(value_text(&d), "-25.0%");
        assert_eq!(value_color(&d), Color::Red);
    }

    #[test]
    fn long_names_are_truncated() {
        let d = derive(
            &Player::new("1", "Amon-Ra St. Brown Senior The Third", Position::WideReceiver),
            &ImportedRanks::new(),
        );
        let text = cell_text(&d, SortField::Name, 24);
        assert_eq!(text.chars().count(), 23);
        assert!(text.ends_with('…'));
    }

    #[test]
    fn header_marks_active_sort_column() {
        let sort = SortState {
            field: SortField::Adp,
            direction: SortDirection::Ascending,
        };
        let text: String = header_line(sort)
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert!(text.contains("ADP▲"));
        assert!(!text.contains("Proj▼"));
    }

    #[test]
    fn renders_title_header_and_rows() {
        let mut s = state_with(vec![mahomes(), Player::new("2", "Josh Allen", Position::Quarterback)]);
        s.watchlist_ids.insert("1".into());
        let out = draw(&mut s, 120, 10);
        assert!(out.contains("Players (2/2)"));
        assert!(out.contains("Proj▼"));
        assert!(out.contains("★ Patrick Mahomes"));
        assert!(out.contains("Josh Allen"));
        assert!(out.contains("+25.0%"));
    }

    #[test]
    fn expanded_row_shows_details_and_notes() {
        let mut s = state_with(vec![mahomes()]);
        s.notes.insert("1".into(), "rushing upside".into());
        let mut sink = RecordingSink::default();
        let ids = s.watchlist_ids.clone();
        s.players_board.handle(BoardAction::ToggleExpand, &ids, &mut sink);
        let out = draw(&mut s, 120, 12);
        assert!(out.contains("Bye 6"));
        assert!(out.contains("Delta -4.5"));
        assert!(out.contains("eADP 50.0"));
        assert!(out.contains("rushing upside"));
    }

    #[test]
    fn collapsed_rows_hide_details() {
        let mut s = state_with(vec![mahomes()]);
        let out = draw(&mut s, 120, 12);
        assert!(!out.contains("Notes"));
    }

    #[test]
    fn only_window_rows_are_drawn() {
        let players = (0..40)
            .map(|i| {
                let mut p = Player::new(i.to_string(), format!("Runner {i:02}"), Position::RunningBack);
                p.projected_points = Some(400.0 - i as f64);
                p
            })
            .collect();
        let mut s = state_with(players);
        s.players_board.set_viewport_rows(5);
        let out = draw(&mut s, 120, 30);
        assert!(out.contains("Runner 04"));
        assert!(!out.contains("Runner 05"));
    }

    #[test]
    fn filtered_title_and_empty_message() {
        let mut s = state_with(vec![mahomes()]);
        s.players_board.set_position(PositionFilter::Only(Position::TightEnd));
        let out = draw(&mut s, 120, 8);
        assert!(out.contains("Players [TE] (0/1)"));
        assert!(out.contains("No players match the current filters."));
    }

    #[test]
    fn empty_watchlist_message() {
        let mut s = state_with(vec![mahomes()]);
        s.switch_tab(TabId::Watchlist);
        let out = draw(&mut s, 120, 8);
        assert!(out.contains("Watchlist (0/0)"));
        assert!(out.contains("Watchlist is empty."));
    }
}
