//! Error types for draft storage
//!
//! Two-variant taxonomy: malformed requests are [`StoreError::InvalidInput`]
//! and are never retried; I/O and transport failures are
//! [`StoreError::Unavailable`] and are treated as transient by callers.

/// Errors raised by [`DraftStore`](crate::DraftStore) operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Malformed request (e.g. a non-object draft payload)
    ///
    /// Surfaced immediately to the caller; retrying cannot succeed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The backing storage could not be read or written
    ///
    /// Scoped to the single operation that raised it; the autosave loop
    /// retries on its next tick.
    #[error("draft store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Check whether retrying the failed operation can succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Build an [`StoreError::Unavailable`] from any displayable cause
    #[inline]
    pub(crate) fn unavailable(cause: impl std::fmt::Display) -> Self {
        Self::Unavailable(cause.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::unavailable(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::unavailable(err)
    }
}
