//! Mirrored system state: the controller's cached view of every device.
//!
//! The mirror can diverge from literal bus payloads: chirps are momentary,
//! so the buzzer mirror returns to `OFF` right away.

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::device::{Device, DeviceCode, MotionState};
use crate::security::{SecurityState, Transition};

/// Five-field snapshot pushed to observers and served to the HTTP shim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SystemState {
    security: SecurityState,
    motion: MotionState,
    fan: DeviceCode,
    led: DeviceCode,
    buzzer: DeviceCode,
}

impl SystemState {
    #[must_use]
    pub fn security(&self) -> SecurityState {
        self.security
    }

    #[must_use]
    pub fn motion(&self) -> MotionState {
        self.motion
    }

    #[must_use]
    pub fn fan(&self) -> DeviceCode {
        self.fan
    }

    #[must_use]
    pub fn led(&self) -> DeviceCode {
        self.led
    }

    #[must_use]
    pub fn buzzer(&self) -> DeviceCode {
        self.buzzer
    }

    /// Mirrored value for `device`.
    #[must_use]
    pub fn device(&self, device: Device) -> DeviceCode {
        match device {
            Device::Fan => self.fan,
            Device::Led => self.led,
            Device::Buzzer => self.buzzer,
        }
    }

    /// Move the security state along a transition from the table.
    ///
    /// This is the only way to change `security`.
    pub fn apply(&mut self, transition: &Transition) {
        debug_assert_eq!(self.security, transition.from());
        self.security = transition.to();
    }

    /// Record the latest motion reading.
    pub fn set_motion(&mut self, motion: MotionState) {
        self.motion = motion;
    }

    /// Mirror the effect of a dispatched command.
    pub fn mirror(&mut self, command: &Command) {
        let code = command.code();
        match command.device() {
            Device::Fan => self.fan = code,
            Device::Led => self.led = code,
            Device::Buzzer => {
                self.buzzer = if code.is_chirp() { DeviceCode::Off } else { code };
            }
        }
    }
}
