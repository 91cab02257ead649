// Messages exchanged between the TUI task and the app orchestrator.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use draftboard_core::board::intents::Intent;
use draftboard_core::players::Player;

/// Which board the main panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabId {
    Players,
    Watchlist,
}

/// One watchlisted player as persisted and displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub id: String,
    pub name: String,
    pub added_at: DateTime<Utc>,
}

/// Orchestrator -> TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// Full watchlist, oldest first.
    Watchlist(Vec<WatchlistEntry>),
    /// Every non-empty note, keyed by player id.
    Notes(BTreeMap<String, String>),
    /// The player most recently chosen with Enter.
    Focused(Box<Player>),
}

/// TUI -> orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    Intent(Intent),
    Quit,
}

impl From<Intent> for UserCommand {
    fn from(intent: Intent) -> Self {
        UserCommand::Intent(intent)
    }
}
