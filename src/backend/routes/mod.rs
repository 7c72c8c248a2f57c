//! Routes Module
//!
//! HTTP route configuration for the canvas server.

/// Main router assembly
pub mod router;

pub use router::create_router;
