//! Backend Module
//!
//! The authoritative side of the shared canvas: an Axum HTTP server holding
//! the grid, the per-participant cooldowns and the write arbiter that
//! decides every write.
//!
//! This module is only compiled when the `ssr` feature is enabled (it is on
//! by default).
//!
//! # Architecture
//!
//! - **`canvas`** - cooldown tracker, canvas store, write arbiter, handlers
//! - **`server`** - configuration, application state, initialization
//! - **`routes`** - router assembly and middleware
//! - **`error`** - `BackendError` and its HTTP mapping
//!
//! # Concurrency
//!
//! Every request runs on its own task. The two points of mutual exclusion
//! are the per-participant cooldown entry and the per-row canvas lock;
//! there is no global lock on the write path.
//!
//! # Endpoints
//!
//! - `GET /canvas` - `{ size, pixels: Pixel[size][size] }`
//! - `POST /canvas` - `{ x, y, color, username }`, answered with the written
//!   cell, `429` on cooldown, `400` on malformed input, `401` without a
//!   username

/// Canvas state and write path
pub mod canvas;

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use canvas::{CanvasStore, CooldownTracker, WriteArbiter, WriteOutcome};
pub use error::BackendError;
pub use server::{create_app, AppState, ServerConfig};
