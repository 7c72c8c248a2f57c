//! Shared Error Types
//!
//! Errors that can occur on either side of the canvas protocol.
//!
//! - `ValidationError` - malformed coordinates, color or request body
//!
//! # Usage
//!
//! ```rust
//! use canvas_sync::shared::error::SharedError;
//!
//! let error = SharedError::validation("color", "not a hex color");
//! assert!(error.to_string().contains("color"));
//! ```
use thiserror::Error;

/// Shared error types that can occur in both client and server
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let SharedError::ValidationError { field, message } =
            SharedError::validation("x", "out of range");
        assert_eq!(field, "x");
        assert_eq!(message, "out of range");
    }

    #[test]
    fn test_error_display() {
        let error = SharedError::validation("body", "expected an object");
        let display = format!("{}", error);
        assert!(display.contains("field 'body'"));
        assert!(display.contains("expected an object"));
    }
}
