//! [`CommandPublisher`] backed by a rumqttc client.

use rumqttc::{AsyncClient, QoS};

use entryguard_app::ports::CommandPublisher;
use entryguard_domain::command::Command;
use entryguard_domain::error::EntryGuardError;

use crate::error::MqttError;

/// Publishes actuator commands without waiting on the network.
///
/// Messages are queued on the client's request channel and flushed by the
/// event loop task; a full queue surfaces as [`MqttError::Client`].
#[derive(Clone)]
pub struct MqttCommandPublisher {
    client: AsyncClient,
}

impl MqttCommandPublisher {
    pub(crate) fn new(client: AsyncClient) -> Self {
        Self { client }
    }
}

impl CommandPublisher for MqttCommandPublisher {
    async fn publish(&self, command: &Command) -> Result<(), EntryGuardError> {
        self.client
            .try_publish(command.topic(), QoS::AtLeastOnce, false, command.payload())
            .map_err(MqttError::from)?;
        tracing::debug!(
            topic = command.topic(),
            payload = command.payload(),
            "command queued for broker"
        );
        Ok(())
    }
}
