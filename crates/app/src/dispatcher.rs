//! Command dispatcher: turns [`Command`]s into mirror updates, `MQTT_OUT`
//! audit entries, bus publishes and observer broadcasts.

use entryguard_domain::audit::{LogEntry, LogType};
use entryguard_domain::command::Command;
use entryguard_domain::state::SystemState;

use crate::audit_trail::AuditTrail;
use crate::ports::{AuditLog, CommandPublisher, StatePublisher};

/// Applies commands to the mirrored state and their surroundings.
///
/// The bus is optional: without one (simulation mode) commands are mirrored,
/// audited and broadcast but never published.
pub struct CommandDispatcher<A, P, S> {
    audit: AuditTrail<A>,
    bus: Option<P>,
    observers: S,
}

impl<A, P, S> CommandDispatcher<A, P, S>
where
    A: AuditLog,
    P: CommandPublisher,
    S: StatePublisher,
{
    pub fn new(audit: AuditTrail<A>, bus: Option<P>, observers: S) -> Self {
        Self {
            audit,
            bus,
            observers,
        }
    }

    /// Audit trail shared with the rest of the controller.
    pub fn audit(&self) -> &AuditTrail<A> {
        &self.audit
    }

    /// Dispatch one command and broadcast the resulting state.
    pub async fn dispatch(&self, state: &mut SystemState, command: Command) {
        self.apply(state, &command).await;
        self.broadcast(state);
    }

    /// Dispatch several commands in order, broadcasting once at the end.
    pub async fn dispatch_all(&self, state: &mut SystemState, commands: &[Command]) {
        for command in commands {
            self.apply(state, command).await;
        }
        self.broadcast(state);
    }

    /// Push the current snapshot to every observer.
    pub fn broadcast(&self, state: &SystemState) {
        self.observers.publish(*state);
    }

    async fn apply(&self, state: &mut SystemState, command: &Command) {
        state.mirror(command);

        self.audit
            .record(LogEntry::new(
                LogType::MqttOut,
                format!("Command Sent: {} = {}", command.topic(), command.payload()),
                command.source().label(),
            ))
            .await;

        match &self.bus {
            Some(bus) => {
                if let Err(err) = bus.publish(command).await {
                    tracing::warn!(
                        %err,
                        topic = command.topic(),
                        payload = command.payload(),
                        "failed to publish command"
                    );
                }
            }
            None => {
                tracing::debug!(
                    topic = command.topic(),
                    payload = command.payload(),
                    "bus disabled, command not published"
                );
            }
        }
    }
}
