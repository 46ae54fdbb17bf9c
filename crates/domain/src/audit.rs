//! Audit log records.
//!
//! One [`LogEntry`] per line in the persisted store, serialized as
//! `{"timestamp", "user", "type", "details"}`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::{Timestamp, now};

/// Category of an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogType {
    HttpRequest,
    Auth,
    AuthFail,
    Security,
    Sensor,
    Alarm,
    MqttOut,
    Simulation,
}

impl LogType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HttpRequest => "HTTP_REQUEST",
            Self::Auth => "AUTH",
            Self::AuthFail => "AUTH_FAIL",
            Self::Security => "SECURITY",
            Self::Sensor => "SENSOR",
            Self::Alarm => "ALARM",
            Self::MqttOut => "MQTT_OUT",
            Self::Simulation => "SIMULATION",
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: Timestamp,
    pub user: String,
    #[serde(rename = "type")]
    pub log_type: LogType,
    pub details: String,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    #[must_use]
    pub fn new(log_type: LogType, details: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            timestamp: now(),
            user: user.into(),
            log_type,
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_with_type_key() {
        let entry = LogEntry::new(LogType::MqttOut, "Command Sent: a = b", "System");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "MQTT_OUT");
        assert_eq!(json["user"], "System");
        assert_eq!(json["details"], "Command Sent: a = b");
        assert!(json["timestamp"].is_string());
        assert_eq!(json.as_object().unwrap().len(), 4);
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let entry = LogEntry::new(LogType::AuthFail, "Token denied", "Unknown User");
        let line = serde_json::to_string(&entry).unwrap();
        let parsed: LogEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn should_display_wire_name() {
        assert_eq!(LogType::HttpRequest.to_string(), "HTTP_REQUEST");
        assert_eq!(LogType::Simulation.to_string(), "SIMULATION");
    }
}
