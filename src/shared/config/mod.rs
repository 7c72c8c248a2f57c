//! Configuration helpers
//!
//! Error type and environment lookup shared by the server and client
//! configuration builders.

use std::str::FromStr;

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
    #[error("failed to read config file {path}: {message}")]
    File { path: String, message: String },
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Read and parse an environment variable
///
/// Unset or empty variables yield `Ok(None)`; a set but unparsable variable is
/// an error rather than a silent fallback to the default.
pub fn env_var<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::invalid(key, e.to_string())),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_var_unset() {
        std::env::remove_var("CANVAS_SYNC_TEST_VALUE");
        let value: Option<u64> = env_var("CANVAS_SYNC_TEST_VALUE").unwrap();
        assert!(value.is_none());
    }

    #[test]
    #[serial]
    fn test_env_var_parsed() {
        std::env::set_var("CANVAS_SYNC_TEST_VALUE", " 42 ");
        let value: Option<u64> = env_var("CANVAS_SYNC_TEST_VALUE").unwrap();
        assert_eq!(value, Some(42));
        std::env::remove_var("CANVAS_SYNC_TEST_VALUE");
    }

    #[test]
    #[serial]
    fn test_env_var_invalid() {
        std::env::set_var("CANVAS_SYNC_TEST_VALUE", "soon");
        let result: Result<Option<u64>, _> = env_var("CANVAS_SYNC_TEST_VALUE");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        std::env::remove_var("CANVAS_SYNC_TEST_VALUE");
    }
}
