//! Event router: decodes raw bus messages into [`SensorEvent`]s.
//!
//! Unknown topics, non-UTF-8 payloads and motion payloads other than
//! `ON`/`OFF` stop here; they are logged at debug level only and never reach
//! the automaton or the audit log.

use entryguard_domain::device::MotionState;
use entryguard_domain::sensor::{SensorEvent, SensorTopic};
use entryguard_domain::time::Timestamp;

/// Decode one inbound bus message.
#[must_use]
pub fn decode(topic: &str, payload: &[u8], received_at: Timestamp) -> Option<SensorEvent> {
    let Some(sensor) = SensorTopic::from_topic(topic) else {
        tracing::debug!(topic, "ignoring message on unknown topic");
        return None;
    };
    let Ok(payload) = std::str::from_utf8(payload) else {
        tracing::debug!(topic, "ignoring non-UTF-8 payload");
        return None;
    };
    if sensor == SensorTopic::Motion && payload.parse::<MotionState>().is_err() {
        tracing::debug!(topic, payload, "ignoring malformed motion payload");
        return None;
    }
    Some(SensorEvent::from_bus(sensor, payload, received_at))
}
