//! # entryguard-adapter-audit-jsonl
//!
//! Durable audit trail stored as [JSON Lines](https://jsonlines.org): one
//! `{"timestamp","user","type","details"}` object per line, in append order.
//!
//! ## Responsibilities
//! - Implement the `AuditLog` port defined in `entryguard-app::ports`
//! - Serialize appends so concurrent writers never interleave a line
//! - Tolerate a missing file and a torn trailing line on read
//!
//! ## Dependency rule
//! Depends on `entryguard-app` (for port traits) and `entryguard-domain` (for
//! domain types). The `app` and `domain` crates must never reference this
//! adapter.

mod error;
mod log;

pub use error::AuditJsonlError;
pub use log::JsonlAuditLog;
