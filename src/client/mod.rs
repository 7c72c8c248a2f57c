//! Client Module
//!
//! The participant side of the canvas: an HTTP client for the canvas API and
//! a session that keeps a local copy of the grid in step with the server.
//!
//! - **`api`** - `CanvasClient`, `GET /canvas` and `POST /canvas`
//! - **`session`** - `CanvasSession`, polling, optimistic writes, events
//! - **`countdown`** - local cooldown countdown and `MM:SS` display
//! - **`config`** - `ClientConfig`
//! - **`error`** - `ClientError`

pub mod api;
pub mod config;
pub mod countdown;
pub mod error;
pub mod session;

pub use api::{CanvasClient, PlaceResult};
pub use config::ClientConfig;
pub use countdown::{format_remaining, Countdown};
pub use error::{ClientError, ClientResult};
pub use session::{CanvasSession, PlaceOutcome, SessionEvent};
