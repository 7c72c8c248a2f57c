//! Canvas API Client
//!
//! Thin reqwest wrapper around `GET /canvas` and `POST /canvas`. Every call
//! carries the configured request timeout so a stalled server surfaces as a
//! transient error instead of hanging the session.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::{header::RETRY_AFTER, Client, StatusCode};
use tracing::{debug, warn};

use super::config::ClientConfig;
use super::error::{ClientError, ClientResult};
use crate::shared::{CanvasSnapshot, Pixel, PlacePixelRequest, PlacePixelResponse, RateLimitedBody};

static WAIT_SECONDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"wait (\d+) seconds").expect("wait pattern is valid"));

/// Server's answer to a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceResult {
    /// Applied. `pixel` is the server's echo when the body carried one.
    Accepted {
        pixel: Option<Pixel>,
        cooldown_seconds: u64,
    },
    /// Refused by the cooldown tracker
    RateLimited { retry_after_seconds: u64 },
}

#[derive(Debug, Clone)]
pub struct CanvasClient {
    config: ClientConfig,
    client: Client,
}

impl CanvasClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ClientError::transient(None, format!("failed to build client: {}", e)))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch the full grid. Incomplete grids are rejected.
    pub async fn fetch_canvas(&self) -> ClientResult<CanvasSnapshot> {
        let url = self.config.api_url("/canvas");
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::transient(
                Some(status.as_u16()),
                format!("GET /canvas returned {}: {}", status, body),
            ));
        }

        let snapshot: CanvasSnapshot = response.json().await?;
        if !snapshot.is_complete() {
            return Err(ClientError::Decode(format!(
                "canvas of size {} does not have {} cells",
                snapshot.size,
                snapshot.cell_count()
            )));
        }

        debug!("[CanvasClient] Fetched canvas of size {}", snapshot.size);
        Ok(snapshot)
    }

    /// Submit one write
    pub async fn place_pixel(&self, request: &PlacePixelRequest) -> ClientResult<PlaceResult> {
        let url = self.config.api_url("/canvas");
        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        let retry_header = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_seconds =
                retry_after_from_body(&body, retry_header, self.config.default_cooldown_seconds());
            debug!(
                "[CanvasClient] Write to ({}, {}) rate limited for {}s",
                request.x, request.y, retry_after_seconds
            );
            return Ok(PlaceResult::RateLimited {
                retry_after_seconds,
            });
        }

        if !status.is_success() {
            let message = serde_json::from_str::<RateLimitedBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(ClientError::transient(Some(status.as_u16()), message));
        }

        // An empty or foreign success body still means the write landed
        match serde_json::from_str::<PlacePixelResponse>(&body) {
            Ok(echo) => Ok(PlaceResult::Accepted {
                pixel: Some(echo.pixel),
                cooldown_seconds: echo.cooldown_seconds,
            }),
            Err(e) => {
                if !body.trim().is_empty() {
                    warn!("[CanvasClient] Unrecognized success body: {}", e);
                }
                Ok(PlaceResult::Accepted {
                    pixel: None,
                    cooldown_seconds: self.config.default_cooldown_seconds(),
                })
            }
        }
    }
}

/// Work out how long a 429 asks us to wait.
///
/// Tries `retryAfterSeconds`, then a "wait N seconds" phrase in the error
/// text, then the `Retry-After` header, then `default_seconds`.
pub fn retry_after_from_body(body: &str, header: Option<u64>, default_seconds: u64) -> u64 {
    let parsed = serde_json::from_str::<RateLimitedBody>(body).ok();

    if let Some(seconds) = parsed.as_ref().and_then(|b| b.retry_after_seconds) {
        return seconds;
    }

    let text = parsed.as_ref().map(|b| b.error.as_str()).unwrap_or(body);
    if let Some(seconds) = WAIT_SECONDS
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
    {
        return seconds;
    }

    header.unwrap_or(default_seconds)
}
