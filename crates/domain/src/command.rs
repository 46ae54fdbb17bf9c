//! Command: an actuator instruction waiting to be dispatched.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::device::{Device, DeviceCode};
use crate::error::ValidationError;

/// Who asked for a command (or caused a state change).
///
/// The [`Display`](fmt::Display) form is the `user` label written to the
/// audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandSource {
    System,
    AutomaticLogic,
    WebDashboard,
    PhysicalButton,
    Sensor,
}

impl CommandSource {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::System => "System",
            Self::AutomaticLogic => "Automatic Logic",
            Self::WebDashboard => "Web Dashboard",
            Self::PhysicalButton => "Physical Button",
            Self::Sensor => "Sensor-1",
        }
    }
}

impl fmt::Display for CommandSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated, immutable actuator instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    device: Device,
    code: DeviceCode,
    source: CommandSource,
}

impl Command {
    /// Build a command, rejecting codes the device does not understand.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnsupportedCode`] when `code` is outside
    /// the device vocabulary.
    pub fn new(
        device: Device,
        code: DeviceCode,
        source: CommandSource,
    ) -> Result<Self, ValidationError> {
        if !device.accepts(code) {
            return Err(ValidationError::UnsupportedCode { device, code });
        }
        Ok(Self {
            device,
            code,
            source,
        })
    }

    /// Parse a raw code string coming from an outer surface.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownCode`] or
    /// [`ValidationError::UnsupportedCode`].
    pub fn parse(device: Device, code: &str, source: CommandSource) -> Result<Self, ValidationError> {
        Self::new(device, code.parse()?, source)
    }

    /// Commands issued by the automaton. Only vocabulary-valid pairs are
    /// used by the transition table.
    pub(crate) const fn automatic(device: Device, code: DeviceCode) -> Self {
        Self {
            device,
            code,
            source: CommandSource::AutomaticLogic,
        }
    }

    #[must_use]
    pub fn device(&self) -> Device {
        self.device
    }

    #[must_use]
    pub fn code(&self) -> DeviceCode {
        self.code
    }

    #[must_use]
    pub fn source(&self) -> CommandSource {
        self.source
    }

    /// Topic the command is published on.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        self.device.command_topic()
    }

    /// Literal bus payload.
    #[must_use]
    pub fn payload(&self) -> &'static str {
        self.code.as_str()
    }
}
