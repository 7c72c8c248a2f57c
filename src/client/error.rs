//! Client Error Types
//!
//! Errors surfaced by a participant session. Only `Transient` and `Decode`
//! involve the network; the rest are decided locally before any request is
//! sent.

use thiserror::Error;

use crate::shared::{ConfigError, SharedError};

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// No participant identity; nothing was sent
    #[error("You must be signed in to place a pixel")]
    Unauthenticated,

    /// No snapshot has been fetched yet
    #[error("Canvas has not been loaded yet")]
    CanvasNotLoaded,

    /// Local validation failed; nothing was sent
    #[error(transparent)]
    Validation(#[from] SharedError),

    /// The local countdown is still running; nothing was sent
    #[error("Please wait {remaining_seconds} seconds before placing another pixel")]
    CooldownActive { remaining_seconds: u64 },

    /// Network failure, timeout or unexpected status
    #[error("Request failed: {message}")]
    Transient {
        status: Option<u16>,
        message: String,
    },

    /// The server answered with a body we could not use
    #[error("Invalid response: {0}")]
    Decode(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    pub fn transient(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transient {
            status,
            message: message.into(),
        }
    }

    /// Whether trying again later might succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. } | Self::Decode(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        if err.is_timeout() {
            Self::transient(status, format!("timed out: {}", err))
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::transient(status, err.to_string())
        }
    }
}
