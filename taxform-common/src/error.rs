//! Common error types for the tax-form service

use thiserror::Error;

/// Common result type for tax-form operations
pub type Result<T> = std::result::Result<T, Error>;

/// One structural defect found while validating a request body
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValidationIssue {
    /// Human-readable description of the defect
    pub message: String,
    /// JSON path of the offending field ("/employeeId", "" for the root)
    pub path: String,
}

/// Error taxonomy across the tax-form service
///
/// Validation, duplicate and storage-constraint failures are client-class;
/// everything else is internal. Handlers map variants to HTTP status codes,
/// nothing here is thrown across the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Structural (schema) validation failure; carries every defect found
    #[error("Request body failed schema validation ({} issue(s))", .0.len())]
    Validation(Vec<ValidationIssue>),

    /// Semantic (domain-model) validation failure; carries every message
    #[error("Tax form failed model validation: {}", .0.join(", "))]
    Model(Vec<String>),

    /// A record already exists for this (employee, year)
    #[error("Employee has already registered for the current year.")]
    Duplicate,

    /// Typed failure from the storage layer (e.g. constraint violation)
    #[error("Storage constraint violated [{code}]: {message}")]
    StorageConstraint { code: String, message: String },

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for failures caused by the client's input, false for server faults
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::Model(_) | Error::Duplicate | Error::StorageConstraint { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(Error::Duplicate.is_client_error());
        assert!(Error::Validation(vec![]).is_client_error());
        assert!(Error::Model(vec!["x".into()]).is_client_error());
        assert!(Error::StorageConstraint {
            code: "2067".into(),
            message: "UNIQUE constraint failed".into()
        }
        .is_client_error());
        assert!(!Error::Internal("boom".into()).is_client_error());
        assert!(!Error::Config("bad".into()).is_client_error());
    }

    #[test]
    fn test_duplicate_message_is_verbatim() {
        assert_eq!(
            Error::Duplicate.to_string(),
            "Employee has already registered for the current year."
        );
    }
}
