//! Audit log port: durable, append-only storage of [`LogEntry`] records.

use std::future::Future;
use std::sync::Arc;

use entryguard_domain::audit::LogEntry;
use entryguard_domain::error::EntryGuardError;

/// Append-only store of audit records.
///
/// Implementations must never truncate or rewrite a prior entry, and
/// [`read_all`](Self::read_all) must return entries in append order.
pub trait AuditLog {
    /// Durably append one entry after every previously appended one.
    fn append(&self, entry: LogEntry) -> impl Future<Output = Result<(), EntryGuardError>> + Send;

    /// Every entry, oldest first.
    ///
    /// A missing or unparsable store yields an empty list, not an error.
    fn read_all(&self) -> impl Future<Output = Result<Vec<LogEntry>, EntryGuardError>> + Send;
}

impl<T: AuditLog + Send + Sync> AuditLog for Arc<T> {
    fn append(&self, entry: LogEntry) -> impl Future<Output = Result<(), EntryGuardError>> + Send {
        (**self).append(entry)
    }

    fn read_all(&self) -> impl Future<Output = Result<Vec<LogEntry>, EntryGuardError>> + Send {
        (**self).read_all()
    }
}
