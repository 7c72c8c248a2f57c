//! Server Module
//!
//! Initialization and configuration of the canvas HTTP server.
//!
//! - **`state`** - `AppState` and its `FromRef` implementations
//! - **`config`** - `ServerConfig` loading and validation
//! - **`init`** - app creation and background tasks
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: defaults, optional TOML file, env vars
//! 2. **State Creation**: canvas store, cooldown tracker, write arbiter
//! 3. **Background Tasks**: idle cooldown record eviction
//! 4. **Router Creation**: routes plus tracing/CORS middleware

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use config::ServerConfig;
pub use init::create_app;
pub use state::AppState;
