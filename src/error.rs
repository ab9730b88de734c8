//! Application-wide error types.
//!
//! Library modules return [`Error`]; the CLI wraps it in `anyhow` for
//! convenient propagation.
//!
//! # Design
//!
//! - [`Error`]: the catalog error taxonomy
//! - [`ErrorKind`]: the stable classification a transport maps to status codes
//! - [`Error::public_message`]: the text that may be shown to an external caller
//!
//! Persistence failures keep the driver error as their source for logging,
//! but never expose it through [`Error::public_message`].

use crate::musicinfo::ProviderError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Stable error classification, independent of the underlying cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    TransactionFailed,
    ProviderUnavailable,
    ProviderBadResponse,
    Internal,
}

/// Catalog error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed input: unknown filter column, verse out of range, bad field value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No song matched, or an update/delete affected zero rows
    #[error("Not found: {0}")]
    NotFound(String),

    /// The atomic create could not complete and was rolled back
    #[error("Transaction failed: {0}")]
    TransactionFailed(#[source] sqlx::Error),

    /// Metadata provider call failed
    #[error("Enrichment error: {0}")]
    Enrichment(#[from] ProviderError),

    /// Unexpected persistence failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invariant violated at runtime (e.g. more than one row affected)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Error with added context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::TransactionFailed(_) => ErrorKind::TransactionFailed,
            Self::Enrichment(ProviderError::Unavailable(_)) => ErrorKind::ProviderUnavailable,
            Self::Enrichment(ProviderError::BadResponse(_)) => ErrorKind::ProviderBadResponse,
            Self::Database(_) | Self::Internal(_) => ErrorKind::Internal,
            Self::WithContext { source, .. } => source.kind(),
        }
    }

    /// Message that is safe to hand to an external caller.
    ///
    /// Validation and lookup messages are built from caller input and pass
    /// through. Everything else collapses to a fixed string.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidArgument(msg) | Self::NotFound(msg) => msg.clone(),
            Self::WithContext { source, .. } => source.public_message(),
            Self::TransactionFailed(_) => "failed to create song".to_string(),
            Self::Enrichment(_) => "song metadata provider is unavailable".to_string(),
            Self::Database(_) | Self::Internal(_) => "internal error".to_string(),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Database(e).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("song 42 not found");
        assert!(err.to_string().contains("song 42"));
    }

    #[test]
    fn test_kind_survives_context() {
        let err = Error::not_found("song 7 not found").context("while deleting");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("while deleting"));
    }

    #[test]
    fn test_provider_kinds() {
        let err = Error::from(ProviderError::Unavailable("timed out".into()));
        assert_eq!(err.kind(), ErrorKind::ProviderUnavailable);

        let err = Error::from(ProviderError::BadResponse("HTTP 502".into()));
        assert_eq!(err.kind(), ErrorKind::ProviderBadResponse);
    }

    #[test]
    fn test_public_message_hides_database_detail() {
        let err = Error::Database(sqlx::Error::Protocol("no such column: secret".into()));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(!err.public_message().contains("secret"));

        let err = Error::TransactionFailed(sqlx::Error::PoolTimedOut);
        assert_eq!(err.public_message(), "failed to create song");
    }

    #[test]
    fn test_public_message_keeps_validation_text() {
        let err = Error::invalid_argument("unknown filter column: password");
        assert_eq!(err.public_message(), "unknown filter column: password");
    }

    #[test]
    fn test_result_ext() {
        let result: Result<()> = Err(Error::internal("test"));
        let with_ctx = result.with_context("additional context");
        assert!(
            with_ctx
                .unwrap_err()
                .to_string()
                .contains("additional context")
        );
    }
}
