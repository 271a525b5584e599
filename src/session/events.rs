// State change notifications for consumers of a session synchronizer

use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};

use super::state::ChatState;

pub const EVENT_STATE_CHANGED: &str = "session:state_changed";
pub const EVENT_SESSION_RESET: &str = "session:reset";

/// Event emitted by a synchronizer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload")]
pub enum SyncEvent {
    /// Full snapshot after a transition that changed state
    #[serde(rename = "session:state_changed")]
    StateChanged(ChatState),
    /// The conversation was reset; a `StateChanged` with the cleared state follows
    #[serde(rename = "session:reset")]
    Reset,
}

impl SyncEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SyncEvent::StateChanged(_) => EVENT_STATE_CHANGED,
            SyncEvent::Reset => EVENT_SESSION_RESET,
        }
    }
}

/// Fans synchronizer events out to every subscriber
#[derive(Debug)]
pub struct SyncBroadcaster {
    tx: broadcast::Sender<SyncEvent>,
}

impl SyncBroadcaster {
    /// Create a broadcaster with a channel capacity of 256 events
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self { tx }
    }

    pub fn broadcast(&self, event: SyncEvent) {
        log::trace!("Broadcasting {}", event.name());
        // Ignore send errors (no receivers)
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.tx.subscribe()
    }
}

impl Default for SyncBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Feed every received event to `handle` until the channel closes.
///
/// A slow consumer that falls behind skips the missed events and keeps going.
pub async fn for_each_event<F>(mut rx: broadcast::Receiver<SyncEvent>, mut handle: F)
where
    F: FnMut(SyncEvent),
{
    loop {
        match rx.recv().await {
            Ok(event) => handle(event),
            Err(RecvError::Lagged(skipped)) => {
                log::debug!("Subscriber lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let broadcaster = SyncBroadcaster::new();
        let mut rx = broadcaster.subscribe();

        broadcaster.broadcast(SyncEvent::Reset);
        assert_eq!(rx.recv().await.unwrap(), SyncEvent::Reset);
    }

    #[test]
    fn test_broadcast_without_receivers_is_fine() {
        SyncBroadcaster::new().broadcast(SyncEvent::Reset);
    }

    #[tokio::test]
    async fn test_for_each_event_survives_lag() {
        let (tx, rx) = broadcast::channel(1);
        tx.send(SyncEvent::Reset).unwrap();
        tx.send(SyncEvent::StateChanged(ChatState::default())).unwrap();
        drop(tx);

        let mut seen = Vec::new();
        for_each_event(rx, |event| seen.push(event.name())).await;

        // The first event was overwritten; the one after the lag still arrives
        assert_eq!(seen, vec![EVENT_STATE_CHANGED]);
    }

    #[test]
    fn test_event_serializes_with_name() {
        let json = serde_json::to_value(SyncEvent::Reset).unwrap();
        assert_eq!(json["event"], EVENT_SESSION_RESET);
    }
}
