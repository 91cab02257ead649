// Player records as handed to the board by the data layer.

use std::collections::HashMap;
use std::fmt;

/// Imported rank keyed by player name (e.g. a user's own cheat sheet).
pub type ImportedRanks = HashMap<String, f64>;

/// The positions the board knows how to cycle through, in display order.
pub const POSITION_CYCLE: &[Position] = &[
    Position::Quarterback,
    Position::RunningBack,
    Position::WideReceiver,
    Position::TightEnd,
    Position::Kicker,
    Position::Defense,
];

/// Football roster positions.
///
/// Unknown abbreviations are preserved verbatim in `Other` so filtering and
/// searching still see what the data source supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Kicker,
    Defense,
    Other(String),
}

impl Position {
    /// Parse a position abbreviation. "DST" and "D/ST" map to `Defense`.
    pub fn from_str_pos(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_uppercase().as_str() {
            "QB" => Position::Quarterback,
            "RB" => Position::RunningBack,
            "WR" => Position::WideReceiver,
            "TE" => Position::TightEnd,
            "K" | "PK" => Position::Kicker,
            "DEF" | "DST" | "D/ST" => Position::Defense,
            _ => Position::Other(trimmed.to_string()),
        }
    }

    pub fn display_str(&self) -> &str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DEF",
            Position::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A draftable player. Read-only to the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub position: Position,
    /// `None` for free agents.
    pub team: Option<String>,
    pub projected_points: Option<f64>,
    /// Points projected by the reference site the delta is measured against.
    pub reference_points: Option<f64>,
    pub point_delta: Option<f64>,
    pub vorp: Option<f64>,
    pub tier: Option<u32>,
    pub adp: Option<f64>,
    pub news_count: Option<u32>,
    pub bye_week: Option<u8>,
}

impl Player {
    /// Create a player with no team and no stats.
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: Position) -> Self {
        Player {
            id: id.into(),
            name: name.into(),
            position,
            team: None,
            projected_points: None,
            reference_points: None,
            point_delta: None,
            vorp: None,
            tier: None,
            adp: None,
            news_count: None,
            bye_week: None,
        }
    }

    /// Team abbreviation, or "FA" for free agents.
    pub fn team_display(&self) -> &str {
        self.team.as_deref().unwrap_or("FA")
    }
}
