//! Typed publish/subscribe channel for manager lifecycle events

use crate::emote::ProviderKind;
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Events published by the manager. Failure visibility is opt-in: load
/// operations never return errors to callers, they emit `Error` here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmoteEvent {
    /// Emitted once, after `initialize()` completes
    Ready,

    /// A provider's emote list was fetched (not served from cache)
    EmotesFetched {
        provider: ProviderKind,
        is_global: bool,
        channel_id: Option<String>,
    },

    /// A global-scope fetch failed for one provider
    Error {
        provider: ProviderKind,
        message: String,
    },
}

/// Broadcast bus: emit once, notify every live subscriber.
///
/// Slow subscribers that fall more than the channel capacity behind lose
/// the oldest events (`RecvError::Lagged`), they never block the manager.
pub struct EventBus {
    tx: broadcast::Sender<EmoteEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<EmoteEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to every subscriber. A send with no subscribers is
    /// not an error.
    pub fn emit(&self, event: EmoteEvent) {
        let receivers = self.tx.receiver_count();
        if self.tx.send(event.clone()).is_err() {
            tracing::trace!(?event, "Event emitted with no subscribers");
        } else {
            tracing::trace!(?event, receivers, "Event emitted");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
