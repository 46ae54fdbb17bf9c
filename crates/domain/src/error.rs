//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`EntryGuardError`] via `#[from]` or an explicit `From` impl.

use crate::device::{Device, DeviceCode};

/// Top-level error crossing port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum EntryGuardError {
    /// Malformed input rejected at a boundary.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The state machine reached a state it must never reach.
    #[error("invariant violated")]
    Invariant(#[from] InvariantViolation),

    /// The audit store failed to read or write.
    #[error("audit log error")]
    Audit(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The message bus rejected or could not carry a message.
    #[error("bus error")]
    Bus(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Input that does not describe anything the controller knows about.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The device name is not one of `fan`, `led`, `buzzer`.
    #[error("unknown device {0:?}")]
    UnknownDevice(String),

    /// The code string is not part of any device vocabulary.
    #[error("unknown device code {0:?}")]
    UnknownCode(String),

    /// The code exists but the targeted device does not accept it.
    #[error("device {device} does not accept code {code}")]
    UnsupportedCode {
        /// Targeted device.
        device: Device,
        /// Rejected code.
        code: DeviceCode,
    },
}

/// Programming errors that indicate the automaton itself is corrupt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    /// An entry-delay timer was started while another one was still live.
    #[error("entry-delay timer started while another one is armed")]
    TimerAlreadyArmed,
}
