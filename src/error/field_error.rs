//! Public, serializable validation output.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Summary message of an [`ApiError`] built from validation failures.
pub const VALIDATION_FAILED: &str = "Validation failed.";

/// One validation failure addressed by its public field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldError {
    /// Dot-separated public path, root excluded. Never empty.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A structured API error body.
///
/// ```rust
/// use tagpath::{ApiError, FieldError};
///
/// let body = ApiError::validation(vec![FieldError::new("server.port", "This field is required.")]);
/// let json = serde_json::to_value(&body).unwrap();
///
/// assert_eq!(json["message"], "Validation failed.");
/// assert_eq!(json["details"][0]["field"], "server.port");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    pub details: Vec<FieldError>,
}

impl ApiError {
    /// Creates an error body with the given summary and details.
    pub fn new(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self {
            message: message.into(),
            details,
        }
    }

    /// Creates the standard body for validation failures.
    pub fn validation(details: Vec<FieldError>) -> Self {
        Self::new(VALIDATION_FAILED, details)
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for detail in &self.details {
            write!(f, "\n  - {}", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}
