//! # entryguard-adapter-mqtt
//!
//! MQTT adapter: connects the controller to the home message bus through
//! [rumqttc](https://docs.rs/rumqttc).
//!
//! ## Responsibilities
//! - Publish actuator commands (`home/<room>/<device>/set`) for the
//!   `CommandPublisher` port
//! - Subscribe to the three sensor topics on every (re)connect
//! - Forward inbound publishes to a `BusMessageHandler`
//! - Reconnect with exponential backoff when the broker goes away
//!
//! ## Dependency rule
//! Same as other adapters: depends on `entryguard-app` and `entryguard-domain`.

mod backoff;
pub mod config;
pub mod error;
mod publisher;
mod session;

pub use config::MqttConfig;
pub use error::MqttError;
pub use publisher::MqttCommandPublisher;
pub use session::{MqttSession, connect};
