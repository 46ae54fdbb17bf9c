//! Sensor topics and the events decoded from them.

use serde::{Deserialize, Serialize};

use crate::command::CommandSource;
use crate::time::Timestamp;

/// Payload sent by both buttons when pressed.
pub const PRESSED: &str = "PRESSED";

/// Inbound bus topic carrying sensor readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorTopic {
    Motion,
    ButtonArm,
    ButtonDisarm,
}

impl SensorTopic {
    /// Every sensor topic the controller subscribes to.
    pub const ALL: [Self; 3] = [Self::Motion, Self::ButtonArm, Self::ButtonDisarm];

    /// Exact, case-sensitive bus topic string.
    #[must_use]
    pub fn as_topic(self) -> &'static str {
        match self {
            Self::Motion => "home/entryway/motion",
            Self::ButtonArm => "home/entryway/button_arm",
            Self::ButtonDisarm => "home/livingroom/button_disarm",
        }
    }

    /// Match a bus topic string; `None` for anything the controller ignores.
    #[must_use]
    pub fn from_topic(topic: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|known| known.as_topic() == topic)
    }
}

/// A decoded sensor message, consumed once by the automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorEvent {
    pub topic: SensorTopic,
    pub payload: String,
    pub received_at: Timestamp,
    /// `Sensor` for bus traffic, `WebDashboard` for simulated input.
    pub source: CommandSource,
}

impl SensorEvent {
    /// Event received from the bus.
    #[must_use]
    pub fn from_bus(topic: SensorTopic, payload: impl Into<String>, received_at: Timestamp) -> Self {
        Self {
            topic,
            payload: payload.into(),
            received_at,
            source: CommandSource::Sensor,
        }
    }

    /// Event synthesized by a simulation entry point.
    #[must_use]
    pub fn simulated(topic: SensorTopic, payload: impl Into<String>, received_at: Timestamp) -> Self {
        Self {
            topic,
            payload: payload.into(),
            received_at,
            source: CommandSource::WebDashboard,
        }
    }

    /// Audit label for a state change caused by pressing a button.
    #[must_use]
    pub fn button_actor(&self) -> CommandSource {
        match self.source {
            CommandSource::Sensor => CommandSource::PhysicalButton,
            other => other,
        }
    }

    #[must_use]
    pub fn is(&self, topic: SensorTopic, payload: &str) -> bool {
        self.topic == topic && self.payload == payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    #[test]
    fn should_match_known_topics_exactly() {
        assert_eq!(
            SensorTopic::from_topic("home/entryway/motion"),
            Some(SensorTopic::Motion)
        );
        assert_eq!(
            SensorTopic::from_topic("home/livingroom/button_disarm"),
            Some(SensorTopic::ButtonDisarm)
        );
        assert_eq!(SensorTopic::from_topic("home/Entryway/motion"), None);
        assert_eq!(SensorTopic::from_topic("home/garage/motion"), None);
    }

    #[test]
    fn should_attribute_bus_button_presses_to_physical_button() {
        let event = SensorEvent::from_bus(SensorTopic::ButtonArm, PRESSED, now());
        assert_eq!(event.button_actor(), CommandSource::PhysicalButton);
    }

    #[test]
    fn should_attribute_simulated_presses_to_dashboard() {
        let event = SensorEvent::simulated(SensorTopic::ButtonArm, PRESSED, now());
        assert_eq!(event.button_actor(), CommandSource::WebDashboard);
    }
}
