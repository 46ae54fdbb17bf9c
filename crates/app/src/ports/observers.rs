//! Observer port: fan-out of full state snapshots.

use std::sync::Arc;

use entryguard_domain::state::SystemState;

/// Pushes a snapshot to every connected observer.
///
/// Must not wait on observers: a slow observer loses snapshots instead of
/// holding up the caller.
pub trait StatePublisher {
    fn publish(&self, snapshot: SystemState);
}

impl<T: StatePublisher + ?Sized> StatePublisher for Arc<T> {
    fn publish(&self, snapshot: SystemState) {
        (**self).publish(snapshot);
    }
}
