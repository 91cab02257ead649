// Application state and orchestration logic.
//
// Owns the watchlist, player notes, and the focused player. Board intents
// arrive from the TUI as `UserCommand`s; the orchestrator applies them,
// persists the result, and pushes fresh snapshots back as `UiUpdate`s.

use std::collections::BTreeMap;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use draftboard_core::board::intents::Intent;
use draftboard_core::players::Player;

use crate::protocol::{UiUpdate, UserCommand, WatchlistEntry};
use crate::store::{Store, StoreData};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub watchlist: Vec<WatchlistEntry>,
    pub notes: BTreeMap<String, String>,
    pub focused: Option<Player>,
    /// `None` runs without persistence.
    store: Option<Store>,
}

impl AppState {
    pub fn new(store: Option<Store>, data: StoreData) -> Self {
        AppState {
            watchlist: data.watchlist,
            notes: data.notes,
            focused: None,
            store,
        }
    }

    pub fn is_watched(&self, id: &str) -> bool {
        self.watchlist.iter().any(|e| e.id == id)
    }

    /// Apply one intent and return the updates the TUI needs.
    ///
    /// Adding a player that is already watched, removing one that is not,
    /// or writing identical notes changes nothing and yields no updates.
    pub fn handle_intent(&mut self, intent: Intent) -> Vec<UiUpdate> {
        match intent {
            Intent::Select(player) => {
                info!("focused player: {} ({})", player.name, player.id);
                self.focused = Some(player.clone());
                vec![UiUpdate::Focused(Box::new(player))]
            }
            Intent::AddToWatchlist(player) => {
                if self.is_watched(&player.id) {
                    debug!("{} already on watchlist", player.id);
                    return Vec::new();
                }
                info!("watchlist add: {} ({})", player.name, player.id);
                self.watchlist.push(WatchlistEntry {
                    id: player.id,
                    name: player.name,
                    added_at: Utc::now(),
                });
                self.persist();
                vec![self.watchlist_update()]
            }
            Intent::RemoveFromWatchlist(id) => {
                let before = self.watchlist.len();
                self.watchlist.retain(|e| e.id != id);
                if self.watchlist.len() == before {
                    debug!("{} not on watchlist", id);
                    return Vec::new();
                }
                info!("watchlist remove: {}", id);
                self.persist();
                vec![self.watchlist_update()]
            }
            Intent::NotesChange { id, text } => {
                let text = text.trim().to_string();
                let changed = if text.is_empty() {
                    self.notes.remove(&id).is_some()
                } else {
                    self.notes.insert(id.clone(), text.clone()).as_ref() != Some(&text)
                };
                if !changed {
                    return Vec::new();
                }
                info!("notes updated for {}", id);
                self.persist();
                vec![self.notes_update()]
            }
        }
    }

    /// Snapshots sent once when the TUI starts listening.
    pub fn initial_updates(&self) -> Vec<UiUpdate> {
        vec![self.watchlist_update(), self.notes_update()]
    }

    fn watchlist_update(&self) -> UiUpdate {
        UiUpdate::Watchlist(self.watchlist.clone())
    }

    fn notes_update(&self) -> UiUpdate {
        UiUpdate::Notes(self.notes.clone())
    }

    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        let data = StoreData {
            watchlist: self.watchlist.clone(),
            notes: self.notes.clone(),
        };
        if let Err(e) = store.save(&data) {
            warn!("failed to persist watchlist/notes: {}", e);
        }
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    for update in state.initial_updates() {
        let _ = ui_tx.send(update).await;
    }

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            UserCommand::Quit => {
                info!("Quit requested");
                break;
            }
            UserCommand::Intent(intent) => {
                for update in state.handle_intent(intent) {
                    if ui_tx.send(update).await.is_err() {
                        debug!("UI channel closed");
                        return Ok(());
                    }
                }
            }
        }
    }

    info!("Application event loop finished");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use draftboard_core::players::Position;

    fn player(id: &str, name: &str) -> Player {
        Player::new(id, name, Position::RunningBack)
    }

    fn empty_state() -> AppState {
        AppState::new(None, StoreData::default())
    }

    #[test]
    fn add_then_duplicate_add() {
        let mut state = empty_state();
        let updates = state.handle_intent(Intent::AddToWatchlist(player("2", "Bijan Robinson")));
        assert_eq!(updates.len(), 1);
        assert!(state.is_watched("2"));
        assert_eq!(state.watchlist[0].name, "Bijan Robinson");

        let updates = state.handle_intent(Intent::AddToWatchlist(player("2", "Bijan Robinson")));
        assert!(updates.is_empty());
        assert_eq!(state.watchlist.len(), 1);
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut state = empty_state();
        assert!(state
            .handle_intent(Intent::RemoveFromWatchlist("9".into()))
            .is_empty());
    }

    #[test]
    fn remove_sends_new_snapshot() {
        let mut state = empty_state();
        state.handle_intent(Intent::AddToWatchlist(player("1", "A")));
        state.handle_intent(Intent::AddToWatchlist(player("2", "B")));
        let updates = state.handle_intent(Intent::RemoveFromWatchlist("1".into()));
        match &updates[..] {
            [UiUpdate::Watchlist(entries)] => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].id, "2");
            }
            other => panic!("unexpected updates: {other:?}"),
        }
    }

    #[test]
    fn notes_are_trimmed_and_blank_clears() {
        let mut state = empty_state();
        state.handle_intent(Intent::NotesChange {
            id: "1".into(),
            text: "  late-round QB  ".into(),
        });
        assert_eq!(state.notes.get("1").map(String::as_str), Some("late-round QB"));

        let same = state.handle_intent(Intent::NotesChange {
            id: "1".into(),
            text: "late-round QB".into(),
        });
        assert!(same.is_empty());

        let cleared = state.handle_intent(Intent::NotesChange {
            id: "1".into(),
            text: "   ".into(),
        });
        assert_eq!(cleared, vec![UiUpdate::Notes(BTreeMap::new())]);
    }

    #[test]
    fn select_sets_focus() {
        let mut state = empty_state();
        let p = player("3", "CeeDee Lamb");
        let updates = state.handle_intent(Intent::Select(p.clone()));
        assert_eq!(state.focused.as_ref(), Some(&p));
        assert_eq!(updates, vec![UiUpdate::Focused(Box::new(p))]);
    }

    #[test]
    fn changes_are_persisted() {
        let dir = std::env::temp_dir().join("draftboard_app_test_persist");
        let _ = std::fs::remove_dir_all(&dir);
        let store = Store::new(dir.join("store.json"));

        let mut state = AppState::new(Some(store.clone()), StoreData::default());
        state.handle_intent(Intent::AddToWatchlist(player("1", "A")));
        state.handle_intent(Intent::NotesChange {
            id: "1".into(),
            text: "bell cow".into(),
        });

        let data = store.load().unwrap();
        assert_eq!(data.watchlist.len(), 1);
        assert_eq!(data.notes.get("1").map(String::as_str), Some("bell cow"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn run_sends_initial_snapshots_and_applies_intents() {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (ui_tx, mut ui_rx) = mpsc::channel(8);
        let handle = tokio::spawn(run(cmd_rx, ui_tx, empty_state()));

        assert_eq!(ui_rx.recv().await, Some(UiUpdate::Watchlist(Vec::new())));
        assert_eq!(ui_rx.recv().await, Some(UiUpdate::Notes(BTreeMap::new())));

        cmd_tx
            .send(UserCommand::from(Intent::AddToWatchlist(player("5", "E"))))
            .await
            .unwrap();
        match ui_rx.recv().await {
            Some(UiUpdate::Watchlist(entries)) => assert_eq!(entries[0].id, "5"),
            other => panic!("expected watchlist update, got {other:?}"),
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn run_ends_when_commands_close() {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (ui_tx, _ui_rx) = mpsc::channel(8);
        drop(cmd_tx);
        run(cmd_rx, ui_tx, empty_state()).await.unwrap();
    }
}
