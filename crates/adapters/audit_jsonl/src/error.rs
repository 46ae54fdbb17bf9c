//! Audit-file error type wrapping IO and JSON errors.

use entryguard_domain::error::EntryGuardError;

/// Errors originating from the JSON Lines audit file.
#[derive(Debug, thiserror::Error)]
pub enum AuditJsonlError {
    /// Opening, writing or syncing the file failed.
    #[error("audit file IO error")]
    Io(#[from] std::io::Error),

    /// An entry could not be serialized.
    #[error("audit entry serialization error")]
    Json(#[from] serde_json::Error),
}

impl From<AuditJsonlError> for EntryGuardError {
    fn from(err: AuditJsonlError) -> Self {
        Self::Audit(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_into_audit_error() {
        let err = AuditJsonlError::from(std::io::Error::other("disk full"));
        let err: EntryGuardError = err.into();
        assert!(matches!(err, EntryGuardError::Audit(_)));
    }
}
