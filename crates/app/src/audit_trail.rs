//! Best-effort audit writer.
//!
//! Wraps an [`AuditLog`] so that a write can never stall or fail the state
//! change that caused it: every append is bounded by a timeout and any
//! failure is reported on the diagnostic channel (`tracing`) and dropped.

use std::time::Duration;

use entryguard_domain::audit::LogEntry;
use entryguard_domain::error::EntryGuardError;

use crate::ports::AuditLog;

/// Bounded-latency front for an [`AuditLog`].
pub struct AuditTrail<A> {
    log: A,
    write_timeout: Duration,
}

impl<A: AuditLog> AuditTrail<A> {
    /// Wrap `log`; each append may take at most `write_timeout`.
    pub fn new(log: A, write_timeout: Duration) -> Self {
        Self { log, write_timeout }
    }

    /// Append `entry`, reporting but never propagating failures.
    pub async fn record(&self, entry: LogEntry) {
        let log_type = entry.log_type;
        let user = entry.user.clone();
        let details = entry.details.clone();

        match tokio::time::timeout(self.write_timeout, self.log.append(entry)).await {
            Ok(Ok(())) => {
                tracing::info!(kind = %log_type, %user, %details, "audit entry recorded");
            }
            Ok(Err(err)) => {
                tracing::error!(%err, kind = %log_type, %details, "failed to append audit entry");
            }
            Err(_) => {
                tracing::error!(
                    timeout_ms = self.write_timeout.as_millis(),
                    kind = %log_type,
                    %details,
                    "audit append timed out"
                );
            }
        }
    }

    /// Every recorded entry, oldest first.
    ///
    /// # Errors
    ///
    /// Propagates storage errors from the underlying log.
    pub async fn read_all(&self) -> Result<Vec<LogEntry>, EntryGuardError> {
        self.log.read_all().await
    }
}
