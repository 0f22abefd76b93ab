//! Error types for the record source abstraction layer.

use std::fmt;

/// Errors that can occur while reading from a record source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The requested entity was not found.
    #[error("Not found: {entity}/{id}")]
    NotFound {
        /// The kind of entity that was not found (record, medium, file).
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// A record or medium had an unexpected shape.
    #[error("Invalid record: {message}")]
    InvalidRecord {
        /// Description of why the record is invalid.
        message: String,
    },

    /// The backing store failed.
    #[error("Backend error: {message}")]
    Backend {
        /// Description of the backend failure.
        message: String,
    },

    /// An internal source error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl SourceError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a new `InvalidRecord` error.
    #[must_use]
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }

    /// Creates a new `Backend` error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidRecord { .. } => ErrorCategory::Validation,
            Self::Backend { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of source errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Entity not found.
    NotFound,
    /// Validation error.
    Validation,
    /// Infrastructure/backend error.
    Infrastructure,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Validation => write!(f, "validation"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SourceError::not_found("record", "42");
        assert_eq!(err.to_string(), "Not found: record/42");

        let err = SourceError::invalid_record("missing catalog number");
        assert_eq!(err.to_string(), "Invalid record: missing catalog number");
    }

    #[test]
    fn test_error_predicates() {
        let err = SourceError::not_found("file", "f1");
        assert!(err.is_not_found());

        let err = SourceError::backend("connection refused");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            SourceError::not_found("record", "1").category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            SourceError::invalid_record("bad shape").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            SourceError::backend("down").category(),
            ErrorCategory::Infrastructure
        );
        assert_eq!(ErrorCategory::Infrastructure.to_string(), "infrastructure");
    }
}
