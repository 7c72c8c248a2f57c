/**
 * Server Initialization
 *
 * Builds the application state and router, and starts the background task
 * that evicts idle cooldown records.
 *
 * # Initialization Process
 *
 * 1. Create the canvas store and cooldown tracker from `ServerConfig`
 * 2. Start the periodic cooldown cleanup task
 * 3. Create and configure the router
 */

use axum::Router;
use tokio::task::JoinHandle;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
///
/// Returns the router together with the handle of the cleanup task; the
/// task runs until the handle is aborted or the runtime shuts down.
pub fn create_app(config: ServerConfig) -> (Router<()>, JoinHandle<()>) {
    tracing::info!(
        canvas_size = config.canvas_size,
        cooldown_seconds = config.cooldown_seconds,
        "Initializing canvas server"
    );

    let app_state = AppState::new(config);
    let cleanup = spawn_cooldown_cleanup(app_state.clone());
    let app = create_router(app_state);

    tracing::info!("Router configured with periodic cooldown cleanup task");

    (app, cleanup)
}

/// Periodically drop cooldown records that have been expired for a while
pub fn spawn_cooldown_cleanup(app_state: AppState) -> JoinHandle<()> {
    let period = app_state.config.cleanup_interval();
    let ttl = app_state.config.cooldown_record_ttl();

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            let evicted = app_state.cooldowns.evict_idle(chrono::Utc::now(), ttl);
            tracing::debug!(
                evicted,
                tracked = app_state.cooldowns.len(),
                "Cleaned up idle cooldown records"
            );
        }
    })
}
