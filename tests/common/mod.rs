//! Common test utilities and helpers
//!
//! - Custom assertion macros
//! - A real canvas server on an ephemeral port, for client tests

#![allow(dead_code)]

pub mod assertions;

#[cfg(feature = "ssr")]
pub mod server;

#[cfg(feature = "ssr")]
pub use server::*;
