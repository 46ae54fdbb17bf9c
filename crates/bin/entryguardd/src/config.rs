//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `entryguard.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use entryguard_adapter_mqtt::MqttConfig;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Audit log settings.
    pub audit: AuditConfig,
    /// Security automaton timings.
    pub security: SecurityConfig,
    /// Message bus connection.
    pub mqtt: MqttConfig,
    /// HTTP caller check.
    pub api: ApiConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Audit log configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// JSON Lines file receiving every audit entry.
    pub path: PathBuf,
    /// Upper bound for a single append, in milliseconds.
    pub write_timeout_ms: u64,
}

/// Security automaton configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Grace period between motion while armed and the alarm, in seconds.
    pub entry_delay_secs: u64,
    /// How long a simulated motion stays `ON`, in seconds.
    pub motion_reset_secs: u64,
    /// Snapshots buffered per observer before the oldest are dropped.
    pub broadcast_capacity: usize,
}

/// HTTP caller check.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Token expected in the `Authorization` header of control routes.
    /// Control routes are open when unset.
    pub token: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `entryguard.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("entryguard.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("ENTRYGUARD_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("ENTRYGUARD_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("ENTRYGUARD_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("ENTRYGUARD_AUDIT_PATH") {
            self.audit.path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("ENTRYGUARD_BROKER_HOST") {
            self.mqtt.broker_host = val;
        }
        if let Ok(val) = std::env::var("ENTRYGUARD_MQTT_ENABLED") {
            if let Some(enabled) = parse_flag(&val) {
                self.mqtt.enabled = enabled;
            }
        }
        if let Ok(val) = std::env::var("ENTRYGUARD_API_TOKEN") {
            self.api.token = Some(val).filter(|token| !token.is_empty());
        }
        if let Ok(val) = std::env::var("ENTRYGUARD_ENTRY_DELAY_SECS") {
            if let Ok(secs) = val.parse() {
                self.security.entry_delay_secs = secs;
            }
        }
        if let Ok(val) = std::env::var("ENTRYGUARD_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.security.entry_delay_secs == 0 {
            return Err(ConfigError::Validation(
                "entry delay must be non-zero".to_string(),
            ));
        }
        if self.audit.write_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "audit write timeout must be non-zero".to_string(),
            ));
        }
        if self.security.broadcast_capacity == 0 {
            return Err(ConfigError::Validation(
                "broadcast capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[must_use]
    pub fn entry_delay(&self) -> Duration {
        Duration::from_secs(self.security.entry_delay_secs)
    }

    #[must_use]
    pub fn motion_reset(&self) -> Duration {
        Duration::from_secs(self.security.motion_reset_secs)
    }

    #[must_use]
    pub fn audit_write_timeout(&self) -> Duration {
        Duration::from_millis(self.audit.write_timeout_ms)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("system_logs.jsonl"),
            write_timeout_ms: 2000,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            entry_delay_secs: 10,
            motion_reset_secs: 3,
            broadcast_capacity: 64,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "entryguardd=info,entryguard=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:3001");
        assert_eq!(config.audit.path, PathBuf::from("system_logs.jsonl"));
        assert_eq!(config.audit_write_timeout(), Duration::from_secs(2));
        assert_eq!(config.entry_delay(), Duration::from_secs(10));
        assert_eq!(config.motion_reset(), Duration::from_secs(3));
        assert_eq!(config.security.broadcast_capacity, 64);
        assert!(config.mqtt.enabled);
        assert!(config.api.token.is_none());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [audit]
            path = '/var/lib/entryguard/audit.jsonl'
            write_timeout_ms = 500

            [security]
            entry_delay_secs = 30
            motion_reset_secs = 1
            broadcast_capacity = 8

            [mqtt]
            enabled = false
            broker_host = 'broker.lan'

            [api]
            token = 'hunter2'

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
        assert_eq!(
            config.audit.path,
            PathBuf::from("/var/lib/entryguard/audit.jsonl")
        );
        assert_eq!(config.audit_write_timeout(), Duration::from_millis(500));
        assert_eq!(config.entry_delay(), Duration::from_secs(30));
        assert_eq!(config.motion_reset(), Duration::from_secs(1));
        assert_eq!(config.security.broadcast_capacity, 8);
        assert!(!config.mqtt.enabled);
        assert_eq!(config.mqtt.broker_host, "broker.lan");
        assert_eq!(config.mqtt.broker_port, 1883);
        assert_eq!(config.api.token.as_deref(), Some("hunter2"));
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_entry_delay() {
        let mut config = Config::default();
        config.security.entry_delay_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_audit_write_timeout() {
        let mut config = Config::default();
        config.audit.write_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_broadcast_capacity() {
        let mut config = Config::default();
        config.security.broadcast_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_parse_boolean_flags() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" OFF "), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
