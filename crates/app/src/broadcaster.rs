//! In-process state broadcaster backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use entryguard_domain::state::SystemState;

use crate::ports::StatePublisher;

/// Fans full [`SystemState`] snapshots out to every subscribed observer.
///
/// Each observer owns a receiver with a bounded buffer of `capacity`
/// snapshots. An observer that falls behind loses the oldest snapshots
/// (its next `recv` reports `Lagged`) instead of growing a queue. Publishing
/// succeeds even when nobody is listening.
pub struct StateBroadcaster {
    sender: broadcast::Sender<SystemState>,
}

impl StateBroadcaster {
    /// Create a broadcaster with the given per-observer buffer size.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new observer.
    ///
    /// The receiver only sees snapshots published *after* this call; the
    /// caller is responsible for sending the current snapshot on connect.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SystemState> {
        self.sender.subscribe()
    }

    /// Number of currently connected observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl StatePublisher for StateBroadcaster {
    fn publish(&self, snapshot: SystemState) {
        // send only fails when there are no receivers
        if self.sender.send(snapshot).is_err() {
            tracing::trace!("state broadcast with no observers connected");
        }
    }
}
