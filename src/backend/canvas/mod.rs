//! Canvas Module
//!
//! The authoritative side of the canvas:
//!
//! - **`cooldown`** - per-participant rate limit records
//! - **`store`** - the `N × N` grid and its store-wide clock
//! - **`arbiter`** - validates writes and applies them against both
//! - **`handlers`** - `GET /canvas` and `POST /canvas`

pub mod arbiter;
pub mod cooldown;
pub mod handlers;
pub mod store;

pub use arbiter::{WriteArbiter, WriteOutcome};
pub use cooldown::{CooldownDecision, CooldownTracker};
pub use store::{CanvasStore, StoreError};
