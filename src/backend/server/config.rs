/**
 * Server Configuration
 *
 * Loads the canvas server settings. Sources, lowest priority first:
 *
 * 1. Built-in defaults
 * 2. A TOML file named by `CANVAS_CONFIG` (optional)
 * 3. Environment variables (`SERVER_PORT`, `CANVAS_SIZE`,
 *    `COOLDOWN_SECONDS`, `CANVAS_DEFAULT_COLOR`,
 *    `COOLDOWN_RECORD_TTL_SECONDS`, `CLEANUP_INTERVAL_SECONDS`)
 *
 * Unlike optional services, an invalid canvas setting is a startup error:
 * the grid size and cooldown cannot change once the server is running.
 */

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::backend::canvas::cooldown::MAX_COOLDOWN_SECONDS;
use crate::shared::config::{env_var, ConfigError};
use crate::shared::validate_color;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CANVAS_SIZE: usize = 100;
pub const DEFAULT_COOLDOWN_SECONDS: u64 = 60;
pub const DEFAULT_COLOR: &str = "#FFFFFF";
pub const DEFAULT_RECORD_TTL_SECONDS: u64 = 600;
pub const DEFAULT_CLEANUP_INTERVAL_SECONDS: u64 = 300;

/// Largest canvas side the server will allocate
pub const MAX_CANVAS_SIZE: usize = 4096;

/// Canvas server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub canvas_size: usize,
    pub cooldown_seconds: u64,
    pub default_color: String,
    /// Extra idle time after a cooldown expires before its record is evicted
    pub cooldown_record_ttl_seconds: u64,
    pub cleanup_interval_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            canvas_size: DEFAULT_CANVAS_SIZE,
            cooldown_seconds: DEFAULT_COOLDOWN_SECONDS,
            default_color: DEFAULT_COLOR.to_string(),
            cooldown_record_ttl_seconds: DEFAULT_RECORD_TTL_SECONDS,
            cleanup_interval_seconds: DEFAULT_CLEANUP_INTERVAL_SECONDS,
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfigBuilder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load from `CANVAS_CONFIG` (if set) and then the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = match std::env::var("CANVAS_CONFIG") {
            Ok(path) if !path.trim().is_empty() => ServerConfigBuilder::from_toml_file(path.trim())?,
            _ => ServerConfigBuilder::default(),
        };

        if let Some(port) = env_var("SERVER_PORT")? {
            builder = builder.port(port);
        }
        if let Some(size) = env_var("CANVAS_SIZE")? {
            builder = builder.canvas_size(size);
        }
        if let Some(seconds) = env_var("COOLDOWN_SECONDS")? {
            builder = builder.cooldown_seconds(seconds);
        }
        if let Some(color) = env_var::<String>("CANVAS_DEFAULT_COLOR")? {
            builder = builder.default_color(color);
        }
        if let Some(seconds) = env_var("COOLDOWN_RECORD_TTL_SECONDS")? {
            builder = builder.cooldown_record_ttl_seconds(seconds);
        }
        if let Some(seconds) = env_var("CLEANUP_INTERVAL_SECONDS")? {
            builder = builder.cleanup_interval_seconds(seconds);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_size == 0 || self.canvas_size > MAX_CANVAS_SIZE {
            return Err(ConfigError::invalid(
                "canvas_size",
                format!("must be between 1 and {}", MAX_CANVAS_SIZE),
            ));
        }
        if self.cooldown_seconds == 0 || self.cooldown_seconds > MAX_COOLDOWN_SECONDS {
            return Err(ConfigError::invalid(
                "cooldown_seconds",
                format!("must be between 1 and {}", MAX_COOLDOWN_SECONDS),
            ));
        }
        if self.cooldown_record_ttl_seconds > MAX_COOLDOWN_SECONDS {
            return Err(ConfigError::invalid(
                "cooldown_record_ttl_seconds",
                format!("must be at most {}", MAX_COOLDOWN_SECONDS),
            ));
        }
        if self.cleanup_interval_seconds == 0 {
            return Err(ConfigError::invalid("cleanup_interval_seconds", "must be positive"));
        }
        validate_color(&self.default_color)
            .map_err(|e| ConfigError::invalid("default_color", e.to_string()))?;
        Ok(())
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_seconds)
    }

    pub fn cooldown_record_ttl(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::seconds(self.cooldown_record_ttl_seconds.min(MAX_COOLDOWN_SECONDS) as i64)
    }
}

/// Shape of the optional TOML config file; every key may be omitted
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerConfigFile {
    port: Option<u16>,
    canvas_size: Option<usize>,
    cooldown_seconds: Option<u64>,
    default_color: Option<String>,
    cooldown_record_ttl_seconds: Option<u64>,
    cleanup_interval_seconds: Option<u64>,
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    port: Option<u16>,
    canvas_size: Option<usize>,
    cooldown_seconds: Option<u64>,
    default_color: Option<String>,
    cooldown_record_ttl_seconds: Option<u64>,
    cleanup_interval_seconds: Option<u64>,
}

impl ServerConfigBuilder {
    /// Start from the values in a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::File {
            path: display.clone(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&raw).map_err(|e| match e {
            ConfigError::File { message, .. } => ConfigError::File { path: display, message },
            other => other,
        })
    }

    /// Start from the values in a TOML document
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let file: ServerConfigFile = toml::from_str(raw).map_err(|e| ConfigError::File {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            port: file.port,
            canvas_size: file.canvas_size,
            cooldown_seconds: file.cooldown_seconds,
            default_color: file.default_color,
            cooldown_record_ttl_seconds: file.cooldown_record_ttl_seconds,
            cleanup_interval_seconds: file.cleanup_interval_seconds,
        })
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn canvas_size(mut self, size: usize) -> Self {
        self.canvas_size = Some(size);
        self
    }

    pub fn cooldown_seconds(mut self, seconds: u64) -> Self {
        self.cooldown_seconds = Some(seconds);
        self
    }

    pub fn default_color(mut self, color: impl Into<String>) -> Self {
        self.default_color = Some(color.into());
        self
    }

    pub fn cooldown_record_ttl_seconds(mut self, seconds: u64) -> Self {
        self.cooldown_record_ttl_seconds = Some(seconds);
        self
    }

    pub fn cleanup_interval_seconds(mut self, seconds: u64) -> Self {
        self.cleanup_interval_seconds = Some(seconds);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let defaults = ServerConfig::default();
        let config = ServerConfig {
            port: self.port.unwrap_or(defaults.port),
            canvas_size: self.canvas_size.unwrap_or(defaults.canvas_size),
            cooldown_seconds: self.cooldown_seconds.unwrap_or(defaults.cooldown_seconds),
            default_color: self.default_color.unwrap_or(defaults.default_color),
            cooldown_record_ttl_seconds: self
                .cooldown_record_ttl_seconds
                .unwrap_or(defaults.cooldown_record_ttl_seconds),
            cleanup_interval_seconds: self
                .cleanup_interval_seconds
                .unwrap_or(defaults.cleanup_interval_seconds),
        };
        config.validate()?;
        Ok(config)
    }
}
