/**
 * Backend Error Types
 *
 * Errors produced while serving canvas requests. Each variant maps to an
 * HTTP status so handlers can return `Result<_, BackendError>` directly.
 *
 * # Error Categories
 *
 * - `SharedError` - malformed coordinates, color or body (400)
 * - `CooldownActive` - participant must wait (429); expected and frequent
 * - `Unauthenticated` - no participant identity (401)
 * - `Store` - the canvas store refused a write after validation (500)
 */

use thiserror::Error;
use axum::http::StatusCode;

use crate::backend::canvas::store::StoreError;
use crate::shared::SharedError;

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// Validation error from the shared module
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// The participant wrote too recently
    #[error("Please wait {retry_after_seconds} seconds before placing another pixel")]
    CooldownActive {
        retry_after_seconds: u64,
    },

    /// No usable participant identity on the request
    #[error("Unauthenticated: {message}")]
    Unauthenticated {
        message: String,
    },

    /// Store failure after validation
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl BackendError {
    /// Create a new unauthenticated error
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `SharedError` - 400 Bad Request
    /// - `CooldownActive` - 429 Too Many Requests
    /// - `Unauthenticated` - 401 Unauthorized
    /// - `Store` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
            Self::CooldownActive { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Seconds until the participant may retry, for cooldown rejections
    pub fn retry_after_seconds(&self) -> Option<u64> {
        match self {
            Self::CooldownActive { retry_after_seconds } => Some(*retry_after_seconds),
            _ => None,
        }
    }
}
