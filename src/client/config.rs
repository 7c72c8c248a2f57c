use std::time::Duration;

use crate::shared::config::{env_var, ConfigError};

/// Default server URL
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_COUNTDOWN_TICK: Duration = Duration::from_secs(1);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_COOLDOWN_SECONDS: u64 = 60;

/// Participant session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    server_url: String,
    poll_interval: Duration,
    countdown_tick: Duration,
    request_timeout: Duration,
    default_cooldown_seconds: u64,
    revert_on_reject: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            countdown_tick: DEFAULT_COUNTDOWN_TICK,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            default_cooldown_seconds: DEFAULT_COOLDOWN_SECONDS,
            revert_on_reject: false,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Read `CLIENT_API_URL`, `POLL_INTERVAL_SECONDS`,
    /// `REQUEST_TIMEOUT_SECONDS` and `REVERT_ON_REJECT`
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        if let Some(url) = env_var::<String>("CLIENT_API_URL")? {
            builder = builder.server_url(url);
        }
        if let Some(seconds) = env_var::<u64>("POLL_INTERVAL_SECONDS")? {
            builder = builder.poll_interval(Duration::from_secs(seconds));
        }
        if let Some(seconds) = env_var::<u64>("REQUEST_TIMEOUT_SECONDS")? {
            builder = builder.request_timeout(Duration::from_secs(seconds));
        }
        if let Some(revert) = env_var::<bool>("REVERT_ON_REJECT")? {
            builder = builder.revert_on_reject(revert);
        }
        builder.build()
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn countdown_tick(&self) -> Duration {
        self.countdown_tick
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Cooldown assumed when the server does not say how long to wait
    pub fn default_cooldown_seconds(&self) -> u64 {
        self.default_cooldown_seconds
    }

    /// Whether a rejected or failed write restores the cell it painted
    pub fn revert_on_reject(&self) -> bool {
        self.revert_on_reject
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    server_url: Option<String>,
    poll_interval: Option<Duration>,
    countdown_tick: Option<Duration>,
    request_timeout: Option<Duration>,
    default_cooldown_seconds: Option<u64>,
    revert_on_reject: Option<bool>,
}

impl ClientConfigBuilder {
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn countdown_tick(mut self, tick: Duration) -> Self {
        self.countdown_tick = Some(tick);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn default_cooldown_seconds(mut self, seconds: u64) -> Self {
        self.default_cooldown_seconds = Some(seconds);
        self
    }

    pub fn revert_on_reject(mut self, revert: bool) -> Self {
        self.revert_on_reject = Some(revert);
        self
    }

    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let defaults = ClientConfig::default();

        let server_url = self
            .server_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.server_url);
        let parsed = reqwest::Url::parse(&server_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", server_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(server_url));
        }

        let config = ClientConfig {
            server_url,
            poll_interval: self.poll_interval.unwrap_or(defaults.poll_interval),
            countdown_tick: self.countdown_tick.unwrap_or(defaults.countdown_tick),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            default_cooldown_seconds: self
                .default_cooldown_seconds
                .unwrap_or(defaults.default_cooldown_seconds),
            revert_on_reject: self.revert_on_reject.unwrap_or(defaults.revert_on_reject),
        };

        for (key, value) in [
            ("poll_interval", config.poll_interval),
            ("countdown_tick", config.countdown_tick),
            ("request_timeout", config.request_timeout),
        ] {
            if value.is_zero() {
                return Err(ConfigError::invalid(key, "must be positive"));
            }
        }
        if config.countdown_tick > Duration::from_secs(1) {
            return Err(ConfigError::invalid("countdown_tick", "must be at most one second"));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serial_test::serial;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::builder().build().unwrap();
        assert_eq!(config.server_url(), "http://127.0.0.1:3000");
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.countdown_tick(), Duration::from_secs(1));
        assert_eq!(config.default_cooldown_seconds(), 60);
        assert!(!config.revert_on_reject());
    }

    #[test]
    fn test_api_url() {
        let config = ClientConfig::builder()
            .server_url("http://localhost:8080/")
            .build()
            .unwrap();
        assert_eq!(config.api_url("/canvas"), "http://localhost:8080/canvas");
    }

    #[test]
    fn test_invalid_url() {
        assert_matches!(
            ClientConfig::builder().server_url("not a url").build(),
            Err(ConfigError::InvalidUrl(_))
        );
        assert_matches!(
            ClientConfig::builder().server_url("ftp://example.com").build(),
            Err(ConfigError::InvalidUrl(_))
        );
    }

    #[test]
    fn test_timers_must_be_bounded() {
        assert_matches!(
            ClientConfig::builder().poll_interval(Duration::ZERO).build(),
            Err(ConfigError::InvalidValue { .. })
        );
        assert_matches!(
            ClientConfig::builder().countdown_tick(Duration::from_secs(2)).build(),
            Err(ConfigError::InvalidValue { .. })
        );
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var("CLIENT_API_URL", "http://canvas.local:9000");
        std::env::set_var("POLL_INTERVAL_SECONDS", "2");
        std::env::set_var("REVERT_ON_REJECT", "true");

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.server_url(), "http://canvas.local:9000");
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert!(config.revert_on_reject());

        std::env::remove_var("CLIENT_API_URL");
        std::env::remove_var("POLL_INTERVAL_SECONDS");
        std::env::remove_var("REVERT_ON_REJECT");
    }
}
