//! Timestamps for sensor events and audit records.

use chrono::{DateTime, Utc};

/// UTC timestamp; serialized as RFC 3339 in audit records.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_be_monotonic_across_two_calls() {
        let first = now();
        let second = now();
        assert!(second >= first);
    }

    #[test]
    fn should_serialize_as_rfc3339_string() {
        let ts: Timestamp = "2026-01-02T03:04:05Z".parse().unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2026-01-02T03:04:05Z\"");
    }
}
