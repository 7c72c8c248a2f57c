//! Shared Module
//!
//! Types shared between the canvas server and the participant client. These
//! are the JSON shapes exchanged over `GET /canvas` and `POST /canvas`, plus
//! the validation rules both sides apply to a write before it touches any
//! state.
//!
//! # Overview
//!
//! - **`pixel`** - `Pixel`, `CanvasSnapshot` and the request/response bodies
//! - **`validation`** - color and coordinate checks
//! - **`error`** - `SharedError`
//! - **`config`** - configuration error type and env helpers

/// Pixel and canvas wire types
pub mod pixel;

/// Write validation rules
pub mod validation;

/// Shared error types
pub mod error;

/// Configuration helpers
pub mod config;

/// Re-export commonly used types for convenience
pub use pixel::{CanvasSnapshot, Pixel, PlacePixelRequest, PlacePixelResponse, RateLimitedBody};
pub use error::SharedError;
pub use config::ConfigError;
pub use validation::{validate_color, validate_coordinates};
