//! MQTT adapter error types.

use entryguard_domain::error::EntryGuardError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The outgoing request queue is full or the event loop has stopped.
    #[error("MQTT client error")]
    Client(#[from] rumqttc::ClientError),
}

impl From<MqttError> for EntryGuardError {
    fn from(err: MqttError) -> Self {
        Self::Bus(Box::new(err))
    }
}
