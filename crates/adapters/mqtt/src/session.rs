//! Broker session: client construction and the inbound event loop.

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::task::JoinHandle;

use entryguard_app::ports::BusMessageHandler;
use entryguard_domain::sensor::SensorTopic;

use crate::backoff::Backoff;
use crate::config::MqttConfig;
use crate::publisher::MqttCommandPublisher;

/// Inbound half of a broker connection, not yet running.
///
/// Split from the publisher so the controller can be built with the
/// publisher before it is handed to [`MqttSession::spawn`] as the handler.
pub struct MqttSession {
    client: AsyncClient,
    eventloop: EventLoop,
    backoff: Backoff,
    broker: String,
}

/// Create a client for `config`. Nothing touches the network until the
/// session is spawned.
#[must_use]
pub fn connect(config: &MqttConfig) -> (MqttCommandPublisher, MqttSession) {
    let mut options = MqttOptions::new(
        config.client_id.clone(),
        config.broker_host.clone(),
        config.broker_port,
    );
    options.set_keep_alive(config.keep_alive());

    let (client, eventloop) = AsyncClient::new(options, config.request_capacity);
    let session = MqttSession {
        client: client.clone(),
        eventloop,
        backoff: Backoff::new(config.reconnect_initial(), config.reconnect_max()),
        broker: format!("{}:{}", config.broker_host, config.broker_port),
    };
    (MqttCommandPublisher::new(client), session)
}

impl MqttSession {
    /// Drive the connection on a background task, forwarding every inbound
    /// publish to `handler` in delivery order.
    pub fn spawn<H>(self, handler: H) -> JoinHandle<()>
    where
        H: BusMessageHandler + 'static,
    {
        tokio::spawn(self.run(handler))
    }

    async fn run<H: BusMessageHandler>(mut self, handler: H) {
        tracing::info!(broker = %self.broker, "connecting to MQTT broker");
        loop {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                    tracing::info!(broker = %self.broker, code = ?ack.code, "connected to MQTT broker");
                    self.backoff.reset();
                    self.subscribe_sensors();
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    handler
                        .on_bus_message(&publish.topic, &publish.payload)
                        .await;
                }
                Ok(_) => {}
                Err(err) => {
                    let delay = self.backoff.next_delay();
                    tracing::warn!(
                        %err,
                        broker = %self.broker,
                        retry_in_ms = delay.as_millis(),
                        "MQTT connection error"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    fn subscribe_sensors(&self) {
        for topic in SensorTopic::ALL {
            match self.client.try_subscribe(topic.as_topic(), QoS::AtLeastOnce) {
                Ok(()) => tracing::info!(topic = topic.as_topic(), "subscribed"),
                Err(err) => {
                    tracing::error!(%err, topic = topic.as_topic(), "failed to subscribe");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_build_publisher_without_touching_network() {
        let config = MqttConfig {
            broker_host: "broker.invalid".to_string(),
            ..MqttConfig::default()
        };

        let (_publisher, session) = connect(&config);

        assert_eq!(session.broker, "broker.invalid:1883");
    }
}
