/**
 * Application State Management
 *
 * `AppState` is the central state container handed to every handler. It
 * holds the canvas store, the cooldown tracker and the write arbiter built
 * over both, all behind `Arc` so cloning the state per request is cheap.
 *
 * The `FromRef` implementations let a handler extract just the piece it
 * needs, e.g. `State(store): State<Arc<CanvasStore>>`.
 */

use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::canvas::{CanvasStore, CooldownTracker, WriteArbiter};
use crate::backend::server::config::ServerConfig;

/// Shared server state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Settings the server was started with
    pub config: Arc<ServerConfig>,

    /// Authoritative canvas
    pub store: Arc<CanvasStore>,

    /// Per-participant cooldown records
    pub cooldowns: Arc<CooldownTracker>,

    /// Write path over `store` and `cooldowns`
    pub arbiter: WriteArbiter,
}

impl AppState {
    /// Build fresh state for `config`
    pub fn new(config: ServerConfig) -> Self {
        let store = Arc::new(CanvasStore::new(config.canvas_size, &config.default_color));
        let cooldowns = Arc::new(CooldownTracker::new(config.cooldown_seconds));
        let arbiter = WriteArbiter::new(Arc::clone(&store), Arc::clone(&cooldowns));

        Self {
            config: Arc::new(config),
            store,
            cooldowns,
            arbiter,
        }
    }
}

impl FromRef<AppState> for Arc<CanvasStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for Arc<CooldownTracker> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.cooldowns.clone()
    }
}

impl FromRef<AppState> for WriteArbiter {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.arbiter.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_state_shares_store_with_arbiter() {
        let config = ServerConfig::builder().canvas_size(2).build().unwrap();
        let state = AppState::new(config);
        let request = crate::shared::PlacePixelRequest {
            x: 1,
            y: 0,
            color: "#000000".to_string(),
            username: "alice".to_string(),
        };

        state.arbiter.submit(&request, chrono::Utc::now()).await.unwrap();

        let store: Arc<CanvasStore> = FromRef::from_ref(&state);
        let snapshot = store.read_all().await;
        assert_eq!(snapshot.pixel(1, 0).unwrap().last_updated_by, "alice");
        assert_eq!(state.cooldowns.len(), 1);
    }
}
