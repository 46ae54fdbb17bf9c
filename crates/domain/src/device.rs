//! Actuators driven by the controller and the codes they understand.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An actuator reachable through an outbound command topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Fan,
    Led,
    Buzzer,
}

impl Device {
    /// Every device, in a stable order.
    pub const ALL: [Self; 3] = [Self::Fan, Self::Led, Self::Buzzer];

    /// Outbound bus topic carrying commands for this device.
    #[must_use]
    pub fn command_topic(self) -> &'static str {
        match self {
            Self::Fan => "home/livingroom/fan/set",
            Self::Led => "home/livingroom/led/set",
            Self::Buzzer => "home/livingroom/buzzer/set",
        }
    }

    /// Codes this device accepts.
    #[must_use]
    pub fn vocabulary(self) -> &'static [DeviceCode] {
        match self {
            Self::Fan => &[DeviceCode::Off, DeviceCode::On],
            Self::Led => &[DeviceCode::Off, DeviceCode::On, DeviceCode::FastStrobe],
            Self::Buzzer => &[
                DeviceCode::Off,
                DeviceCode::ArmChirp,
                DeviceCode::DisarmChirp,
                DeviceCode::EntryBeep,
                DeviceCode::Alarm,
            ],
        }
    }

    /// Whether `code` is part of this device's vocabulary.
    #[must_use]
    pub fn accepts(self, code: DeviceCode) -> bool {
        self.vocabulary().contains(&code)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fan => "fan",
            Self::Led => "led",
            Self::Buzzer => "buzzer",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Device {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|device| device.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownDevice(s.to_string()))
    }
}

/// A raw device code as it travels on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceCode {
    #[default]
    Off,
    On,
    FastStrobe,
    ArmChirp,
    DisarmChirp,
    EntryBeep,
    Alarm,
}

impl DeviceCode {
    const ALL: [Self; 7] = [
        Self::Off,
        Self::On,
        Self::FastStrobe,
        Self::ArmChirp,
        Self::DisarmChirp,
        Self::EntryBeep,
        Self::Alarm,
    ];

    /// Wire representation, also used as the bus payload.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
            Self::FastStrobe => "FAST_STROBE",
            Self::ArmChirp => "ARM_CHIRP",
            Self::DisarmChirp => "DISARM_CHIRP",
            Self::EntryBeep => "ENTRY_BEEP",
            Self::Alarm => "ALARM",
        }
    }

    /// Momentary codes: the buzzer plays them once and falls silent.
    ///
    /// This is a policy assumption about the hardware, not something read
    /// back from it.
    #[must_use]
    pub fn is_chirp(self) -> bool {
        self.as_str().contains("CHIRP")
    }
}

impl fmt::Display for DeviceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownCode(s.to_string()))
    }
}

/// Reading of the entryway motion sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MotionState {
    On,
    #[default]
    Off,
}

impl FromStr for MotionState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ON" => Ok(Self::On),
            "OFF" => Ok(Self::Off),
            other => Err(ValidationError::UnknownCode(other.to_string())),
        }
    }
}
