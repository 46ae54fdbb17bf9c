//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the controller core and the outside world.
//! They are defined here (in `app`) so that both the core and the adapter
//! layer can depend on them without creating circular dependencies.

pub mod audit_log;
pub mod bus;
pub mod observers;

pub use audit_log::AuditLog;
pub use bus::{BusMessageHandler, CommandPublisher};
pub use observers::StatePublisher;
