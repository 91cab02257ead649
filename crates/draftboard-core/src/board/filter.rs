// Position + free-text filtering.

use crate::players::{Player, Position};

use super::derive::DerivedPlayer;

/// Position part of the filter: everything, or one exact position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PositionFilter {
    #[default]
    All,
    Only(Position),
}

impl PositionFilter {
    pub fn display_str(&self) -> &str {
        match self {
            PositionFilter::All => "ALL",
            PositionFilter::Only(pos) => pos.display_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub position: PositionFilter,
    /// Free-text search; empty means no search.
    pub search: String,
}

impl FilterCriteria {
    pub fn is_active(&self) -> bool {
        self.position != PositionFilter::All || !self.search.is_empty()
    }
}

/// Whether a player passes both the position check and the search check.
pub fn passes(player: &DerivedPlayer, criteria: &FilterCriteria) -> bool {
    position_matches(&player.player, &criteria.position)
        && (criteria.search.is_empty()
            || search_matches(&player.player, &criteria.search.to_lowercase()))
}

/// Keep the players passing `criteria`, in their input order.
pub fn filter<'a>(players: &'a [DerivedPlayer], criteria: &FilterCriteria) -> Vec<&'a DerivedPlayer> {
    let needle = criteria.search.to_lowercase();
    players
        .iter()
        .filter(|p| {
            position_matches(&p.player, &criteria.position)
                && (needle.is_empty() || search_matches(&p.player, &needle))
        })
        .collect()
}

fn position_matches(player: &Player, filter: &PositionFilter) -> bool {
    match filter {
        PositionFilter::All => true,
        PositionFilter::Only(pos) => player.position == *pos,
    }
}

/// `needle` must already be lowercase.
fn search_matches(player: &Player, needle: &str) -> bool {
    player.name.to_lowercase().contains(needle)
        || player
            .team
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains(needle))
        || player.position.display_str().to_lowercase().contains(needle)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
