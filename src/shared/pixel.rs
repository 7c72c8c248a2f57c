/**
 * Pixel Data Structures
 *
 * This module defines the cell record stored for every canvas coordinate and
 * the JSON bodies of the canvas endpoints.
 *
 * The same `Pixel` struct is used by the authoritative store on the server
 * and by the optimistic local copy on the client, so a snapshot can be
 * deserialized straight into the client's working state.
 *
 * Timestamps are milliseconds since the Unix epoch. Only the value assigned
 * by the server's store orders writes; client-side timestamps are for
 * display.
 */
use serde::{Deserialize, Serialize};

/// One addressable canvas cell
///
/// # Fields
/// * `color` - Opaque color value (hex string, e.g. `#FF0000`)
/// * `last_updated` - Epoch ms of the last accepted write
/// * `last_updated_by` - Participant who performed that write
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pixel {
    pub color: String,
    pub last_updated: i64,
    #[serde(default)]
    pub last_updated_by: String,
}

impl Pixel {
    /// A cell nobody has written to yet
    pub fn blank(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            last_updated: 0,
            last_updated_by: String::new(),
        }
    }
}

/// Full canvas state as returned by `GET /canvas`
///
/// `pixels` is row-major: `pixels[y][x]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanvasSnapshot {
    pub size: usize,
    pub pixels: Vec<Vec<Pixel>>,
}

impl CanvasSnapshot {
    /// Build a `size × size` snapshot with every cell blank
    pub fn filled(size: usize, color: &str) -> Self {
        Self {
            size,
            pixels: vec![vec![Pixel::blank(color); size]; size],
        }
    }

    /// Get the cell at `(x, y)`
    pub fn pixel(&self, x: usize, y: usize) -> Option<&Pixel> {
        self.pixels.get(y).and_then(|row| row.get(x))
    }

    /// Get a mutable reference to the cell at `(x, y)`
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> Option<&mut Pixel> {
        self.pixels.get_mut(y).and_then(|row| row.get_mut(x))
    }

    /// Whether the grid really is `size × size`
    ///
    /// A snapshot decoded from the network is checked with this before it
    /// replaces a client's local copy.
    pub fn is_complete(&self) -> bool {
        self.pixels.len() == self.size && self.pixels.iter().all(|row| row.len() == self.size)
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.pixels.iter().map(Vec::len).sum()
    }
}

/// Body of `POST /canvas`
///
/// `username` is the participant identifier, already authenticated by the
/// identity provider in front of this service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlacePixelRequest {
    pub x: i64,
    pub y: i64,
    pub color: String,
    #[serde(default)]
    pub username: String,
}

/// Success body of `POST /canvas`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlacePixelResponse {
    pub x: usize,
    pub y: usize,
    pub pixel: Pixel,
    /// Cooldown the participant just entered
    pub cooldown_seconds: u64,
}

/// Body of a `429 Too Many Requests` reply
///
/// `error` embeds the wait in the form `wait N seconds` for older clients;
/// `retry_after_seconds` is the value new clients should read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitedBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
}

impl RateLimitedBody {
    pub fn new(retry_after_seconds: u64) -> Self {
        Self {
            error: cooldown_message(retry_after_seconds),
            retry_after_seconds: Some(retry_after_seconds),
        }
    }
}

/// Human-readable cooldown notice
pub fn cooldown_message(retry_after_seconds: u64) -> String {
    format!(
        "Please wait {} seconds before placing another pixel",
        retry_after_seconds
    )
}
