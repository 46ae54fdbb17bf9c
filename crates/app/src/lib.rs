//! # entryguard-app
//!
//! Application layer: the controller core and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `AuditLog`: durable append-only audit trail
//!   - `CommandPublisher`: outbound actuator commands on the message bus
//!   - `BusMessageHandler`: inbound sensor messages from the bus
//!   - `StatePublisher`: fan-out of state snapshots to observers
//! - Run the **security automaton** and its entry-delay timer
//! - Serialize every state change through the `SecurityController`
//!
//! ## Dependency rule
//! Depends on `entryguard-domain` only (plus `tokio` for locks, timers and
//! channels). Never imports adapter crates. Adapters depend on *this* crate,
//! not the reverse.

pub mod audit_trail;
pub mod automaton;
pub mod broadcaster;
pub mod controller;
pub mod dispatcher;
pub mod ports;
pub mod router;
pub mod timer;
