//! Message bus ports: outbound commands and inbound sensor messages.

use std::future::Future;
use std::sync::Arc;

use entryguard_domain::command::Command;
use entryguard_domain::error::EntryGuardError;

/// Writes actuator commands onto the bus.
///
/// Called while the controller holds its critical section, so
/// implementations must hand the message off without waiting on the network.
pub trait CommandPublisher {
    /// Publish `command.payload()` on `command.topic()`.
    fn publish(&self, command: &Command) -> impl Future<Output = Result<(), EntryGuardError>> + Send;
}

impl<T: CommandPublisher + Send + Sync> CommandPublisher for Arc<T> {
    fn publish(&self, command: &Command) -> impl Future<Output = Result<(), EntryGuardError>> + Send {
        (**self).publish(command)
    }
}

/// Receives raw inbound bus messages.
///
/// Bus adapters call this once per message, in delivery order, and never
/// concurrently with themselves.
pub trait BusMessageHandler: Send + Sync {
    fn on_bus_message(&self, topic: &str, payload: &[u8]) -> impl Future<Output = ()> + Send;
}
