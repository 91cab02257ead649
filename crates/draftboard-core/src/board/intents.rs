// Outbound intents: the board never mutates the watchlist or notes itself.
// It reports what the user asked for to whoever owns that state.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::players::Player;

/// A mutation or selection request addressed to the state owner.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Select(Player),
    AddToWatchlist(Player),
    RemoveFromWatchlist(String),
    NotesChange { id: String, text: String },
}

/// Receiver of board intents. Calls are notifications: the board does not
/// wait for, retry, or observe the outcome.
pub trait IntentSink {
    fn on_player_select(&mut self, player: &Player);
    fn on_add_to_watchlist(&mut self, player: &Player);
    fn on_remove_from_watchlist(&mut self, id: &str);
    fn on_notes_change(&mut self, id: &str, text: &str);
}

/// Forwards intents over a bounded tokio channel without awaiting.
///
/// `T` is the receiver's message type; anything that can be built from an
/// `Intent` works, so a host can multiplex intents with its own commands.
pub struct ChannelSink<T> {
    tx: mpsc::Sender<T>,
}

impl<T: From<Intent>> ChannelSink<T> {
    pub fn new(tx: mpsc::Sender<T>) -> Self {
        ChannelSink { tx }
    }

    fn send(&self, intent: Intent) {
        debug!("emitting intent: {:?}", intent);
        match self.tx.try_send(T::from(intent)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("intent channel full, dropping intent");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("intent channel closed, dropping intent");
            }
        }
    }
}

impl<T: From<Intent>> IntentSink for ChannelSink<T> {
    fn on_player_select(&mut self, player: &Player) {
        self.send(Intent::Select(player.clone()));
    }

    fn on_add_to_watchlist(&mut self, player: &Player) {
        self.send(Intent::AddToWatchlist(player.clone()));
    }

    fn on_remove_from_watchlist(&mut self, id: &str) {
        self.send(Intent::RemoveFromWatchlist(id.to_string()));
    }

    fn on_notes_change(&mut self, id: &str, text: &str) {
        self.send(Intent::NotesChange {
            id: id.to_string(),
            text: text.to_string(),
        });
    }
}

/// Collects intents in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub intents: Vec<Intent>,
}

impl IntentSink for RecordingSink {
    fn on_player_select(&mut self, player: &Player) {
        self.intents.push(Intent::Select(player.clone()));
    }

    fn on_add_to_watchlist(&mut self, player: &Player) {
        self.intents.push(Intent::AddToWatchlist(player.clone()));
    }

    fn on_remove_from_watchlist(&mut self, id: &str) {
        self.intents.push(Intent::RemoveFromWatchlist(id.to_string()));
    }

    fn on_notes_change(&mut self, id: &str, text: &str) {
        self.intents.push(Intent::NotesChange {
            id: id.to_string(),
            text: text.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::Position;

    #[tokio::test]
    async fn channel_sink_forwards_in_order() {
        let (tx, mut rx) = mpsc::channel::<Intent>(8);
        let mut sink = ChannelSink::new(tx);
        let p = Player::new("p1", "Puka Nacua", Position::WideReceiver);

        sink.on_player_select(&p);
        sink.on_add_to_watchlist(&p);
        sink.on_remove_from_watchlist("p1");
        sink.on_notes_change("p1", "target in round 2");

        assert_eq!(rx.recv().await, Some(Intent::Select(p.clone())));
        assert_eq!(rx.recv().await, Some(Intent::AddToWatchlist(p)));
        assert_eq!(rx.recv().await, Some(Intent::RemoveFromWatchlist("p1".into())));
        assert_eq!(
            rx.recv().await,
            Some(Intent::NotesChange {
                id: "p1".into(),
                text: "target in round 2".into()
            })
        );
    }

    #[test]
    fn channel_sink_drops_when_full_instead_of_blocking() {
        let (tx, mut rx) = mpsc::channel::<Intent>(1);
        let mut sink = ChannelSink::new(tx);
        sink.on_remove_from_watchlist("a");
        sink.on_remove_from_watchlist("b");
        assert_eq!(rx.try_recv().ok(), Some(Intent::RemoveFromWatchlist("a".into())));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn channel_sink_ignores_closed_receiver() {
        let (tx, rx) = mpsc::channel::<Intent>(1);
        drop(rx);
        let mut sink = ChannelSink::new(tx);
        sink.on_remove_from_watchlist("a");
    }
}
