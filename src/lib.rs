//! Canvas Sync - Main Library
//!
//! A shared square pixel canvas that many participants paint at once. The
//! server holds the authoritative grid and rate-limits every participant to
//! one write per cooldown window; clients poll the grid, paint optimistically
//! and count down their own cooldown.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between client and server
//!   - `Pixel`, `CanvasSnapshot` and the request/response bodies
//!   - Color and coordinate validation
//!   - Error types and environment helpers
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Cooldown tracker, canvas store and write arbiter
//!   - Axum HTTP server exposing `GET /canvas` and `POST /canvas`
//!
//! - **`client`** - Participant session
//!   - HTTP client for the canvas API
//!   - Poll loop, optimistic writes and the local cooldown countdown
//!
//! # Feature Flags
//!
//! - **`ssr`** - Server build (enables `backend`). On by default.
//!
//! # Usage
//!
//! ## Server-Side
//!
//! ```rust,no_run
//! use canvas_sync::backend::{create_app, ServerConfig};
//!
//! # async fn example() {
//! let (app, _cleanup) = create_app(ServerConfig::default());
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//! axum::serve(listener, app).await.unwrap();
//! # }
//! ```
//!
//! ## Client-Side
//!
//! ```rust,no_run
//! use canvas_sync::client::{CanvasSession, ClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = CanvasSession::start(ClientConfig::from_env()?, Some("alice".into()))?;
//! session.refresh().await?;
//! session.place_pixel(3, 4, "#FF0000").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! - **Server**: per-row `RwLock`s over the grid and a `DashMap` of
//!   cooldown reservations; no global lock on the write path
//! - **Client**: the local snapshot sits behind an `Arc<RwLock<>>` and is
//!   never locked across a network call; events fan out over
//!   `broadcast::Sender`

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

/// Participant session and canvas API client
pub mod client;
