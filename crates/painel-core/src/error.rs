//! Error types for painel-core
//!
//! Every failure in the core is recoverable at the caller boundary. Local
//! validation and scope errors are reported for display and never retried;
//! persistence errors leave local state untouched so a retry is safe.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad or missing field, caught before any collaborator call
    ValidationError,
    /// Aggregated year does not contain the reference date
    ScopeMismatch,
    /// The persistence collaborator failed
    PersistenceError,
    /// Empty export request
    NothingToExport,
    /// Record not found
    NotFound,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::ScopeMismatch => write!(f, "SCOPE_MISMATCH"),
            ErrorCode::PersistenceError => write!(f, "PERSISTENCE_ERROR"),
            ErrorCode::NothingToExport => write!(f, "NOTHING_TO_EXPORT"),
            ErrorCode::NotFound => write!(f, "NOT_FOUND"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation rejected, user can fix the input
    Warning,
    /// Error - operation failed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for painel-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid value for field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Series covers year {actual} but the reference date is in {expected}")]
    ScopeMismatch { expected: i32, actual: i32 },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Nothing to export")]
    NothingToExport,

    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },
}

impl CoreError {
    /// Shorthand for a validation failure on `field`
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        CoreError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Shorthand for a collaborator failure
    pub fn persistence(message: impl Into<String>) -> Self {
        CoreError::Persistence {
            message: message.into(),
        }
    }

    /// Name of the offending field, for validation errors
    pub fn field(&self) -> Option<&str> {
        match self {
            CoreError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Validation { .. } => ErrorCode::ValidationError,
            CoreError::ScopeMismatch { .. } => ErrorCode::ScopeMismatch,
            CoreError::Persistence { .. } => ErrorCode::PersistenceError,
            CoreError::NothingToExport => ErrorCode::NothingToExport,
            CoreError::NotFound { .. } => ErrorCode::NotFound,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::Validation { .. } => ErrorSeverity::Warning,
            CoreError::ScopeMismatch { .. } => ErrorSeverity::Error,
            CoreError::Persistence { .. } => ErrorSeverity::Error,
            CoreError::NothingToExport => ErrorSeverity::Info,
            CoreError::NotFound { .. } => ErrorSeverity::Info,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::Validation { field, message } => {
                details = details
                    .with_detail(serde_json::json!({ "field": field, "reason": message }))
                    .with_suggestion(format!("Correct the '{}' field and submit again.", field));
            }
            CoreError::ScopeMismatch { expected, .. } => {
                details = details.with_suggestion(format!(
                    "Aggregate the year {} before summarizing it.",
                    expected
                ));
            }
            CoreError::Persistence { .. } => {
                details = details.with_suggestion(
                    "The form was kept as typed; try submitting again.".to_string(),
                );
            }
            CoreError::NothingToExport => {
                details = details.with_suggestion(
                    "Add records or widen the filter before exporting.".to_string(),
                );
            }
            CoreError::NotFound { resource, .. } => {
                details = details.with_suggestion(format!(
                    "Reload the {} list; the record may have been deleted.",
                    resource
                ));
            }
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

// Writing to an in-memory buffer only fails on records the writer cannot shape.
impl From<csv::Error> for CoreError {
    fn from(error: csv::Error) -> Self {
        CoreError::validation("records", format!("could not write delimited text: {}", error))
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }
}

/// Error logger trait
pub trait ErrorLogger {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Error => log::error!(
                target: "painel::error",
                "[{}] {} - Operation: {}",
                error.code(),
                error,
                context.operation
            ),
            ErrorSeverity::Warning => log::warn!(
                target: "painel::error",
                "[{}] {} - Operation: {}",
                error.code(),
                error,
                context.operation
            ),
            ErrorSeverity::Info => log::debug!(
                target: "painel::error",
                "[{}] {} - Operation: {}",
                error.code(),
                error,
                context.operation
            ),
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::ValidationError.to_string(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::ScopeMismatch.to_string(), "SCOPE_MISMATCH");
        assert_eq!(ErrorCode::NothingToExport.to_string(), "NOTHING_TO_EXPORT");
    }

    #[test]
    fn test_core_error_code_and_severity() {
        let error = CoreError::validation("amount", "not a number");
        assert_eq!(error.code(), ErrorCode::ValidationError);
        assert_eq!(error.severity(), ErrorSeverity::Warning);
        assert_eq!(error.field(), Some("amount"));

        let error = CoreError::persistence("connection refused");
        assert_eq!(error.code(), ErrorCode::PersistenceError);
        assert_eq!(error.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_validation_details() {
        let details = CoreError::validation("amount", "not a number").to_details();
        assert_eq!(details.code, ErrorCode::ValidationError);
        assert_eq!(details.details.unwrap()["field"], "amount");
        assert_eq!(details.suggestions.len(), 1);
    }

    #[test]
    fn test_details_serialize_code() {
        let details = CoreError::NothingToExport.to_details();
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["code"], "NOTHING_TO_EXPORT");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_scope_mismatch_message() {
        let error = CoreError::ScopeMismatch {
            expected: 2025,
            actual: 2024,
        };
        assert!(error.to_string().contains("2024"));
        assert!(error.to_details().suggestions[0].contains("2025"));
    }
}
