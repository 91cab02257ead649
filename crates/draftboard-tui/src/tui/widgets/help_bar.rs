// Bottom bar: the active text input while typing, key hints otherwise.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::{InputMode, ViewState};

const HINTS: &[(&str, &str)] = &[
    ("↑↓", "move"),
    ("Enter", "select"),
    ("a/r", "watch"),
    ("Space", "expand"),
    ("/", "search"),
    ("p", "pos"),
    ("s/S", "sort"),
    ("n", "notes"),
    ("1/2", "tabs"),
    ("q", "quit"),
];

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = match state.input_mode {
        InputMode::Normal => hint_line(),
        InputMode::Search => input_line("Search: ", &state.input_text),
        InputMode::Notes => {
            let name = state.notes_target.as_ref().map_or("", |t| t.name.as_str());
            input_line(&format!("Notes for {}: ", name), &state.input_text)
        }
    };
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(Color::Black)),
        area,
    );
}

fn hint_line() -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (key, action) in HINTS {
        spans.push(Span::styled(
            *key,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}  ", action),
            Style::default().fg(Color::Gray),
        ));
    }
    Line::from(spans)
}

fn input_line(prompt: &str, text: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {}", prompt),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(text.to_string()),
        Span::styled("█", Style::default().fg(Color::White)),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
