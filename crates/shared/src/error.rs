//! Application-wide error types.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// A rejected input, described precisely enough for the caller to fix it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Machine-readable reason (e.g. `DUPLICATE_DATE`).
    pub code: String,
    /// The offending request field, when one can be named.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Human-readable explanation.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    #[must_use]
    pub fn new(code: impl Into<String>, field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            field: field.map(str::to_string),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Access denied.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Access denied for a reason the caller can act on.
    #[error("Access denied: {0}")]
    Denied(FieldError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Well-formed request rejected by a business rule.
    #[error("Rejected: {0}")]
    Rejected(FieldError),

    /// Conflict (e.g., duplicate entry surfaced by a constraint).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a business-rule rejection.
    #[must_use]
    pub fn rejected(code: impl Into<String>, field: Option<&str>, message: impl Into<String>) -> Self {
        Self::Rejected(FieldError::new(code, field, message))
    }

    /// Shorthand for a coded access denial.
    #[must_use]
    pub fn denied(code: impl Into<String>, field: Option<&str>, message: impl Into<String>) -> Self {
        Self::Denied(FieldError::new(code, field, message))
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) | Self::Denied(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Rejected(_) => 422,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Denied(e) => &e.code,
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Rejected(e) => &e.code,
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Converts the error into the `{ errors: [...] }` entries returned to clients.
    ///
    /// Storage and internal failures never leak their details.
    #[must_use]
    pub fn to_field_errors(&self) -> Vec<FieldError> {
        let message = match self {
            Self::Rejected(e) | Self::Denied(e) => return vec![e.clone()],
            Self::Database(_) | Self::Internal(_) => "An error occurred".to_string(),
            Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::Validation(m)
            | Self::Conflict(m) => m.clone(),
        };
        vec![FieldError::new(self.error_code(), None, message)]
    }
}
