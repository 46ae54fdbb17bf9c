//! MQTT integration configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the MQTT bus connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// When `false` the controller runs in simulation mode: commands are
    /// mirrored and audited but never published.
    pub enabled: bool,
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Capacity of the outgoing request queue between client and event loop.
    pub request_capacity: usize,
    /// First reconnect delay after a connection error, in milliseconds.
    pub reconnect_initial_ms: u64,
    /// Upper bound for the reconnect delay, in seconds.
    pub reconnect_max_secs: u64,
}

impl MqttConfig {
    #[must_use]
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(u64::from(self.keep_alive_secs))
    }

    #[must_use]
    pub fn reconnect_initial(&self) -> Duration {
        Duration::from_millis(self.reconnect_initial_ms)
    }

    #[must_use]
    pub fn reconnect_max(&self) -> Duration {
        Duration::from_secs(self.reconnect_max_secs)
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "entryguard".to_string(),
            keep_alive_secs: 30,
            request_capacity: 64,
            reconnect_initial_ms: 500,
            reconnect_max_secs: 30,
        }
    }
}
