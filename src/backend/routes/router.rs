/**
 * Router Configuration
 *
 * Combines the canvas routes with the HTTP middleware stack.
 *
 * # Routes
 *
 * - `GET /canvas` - full canvas snapshot
 * - `POST /canvas` - place a pixel
 * - `GET /health` - liveness probe
 *
 * # Middleware
 *
 * - `TraceLayer` - one span per request
 * - `CorsLayer` - browser clients may live on another origin
 */

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::canvas::handlers::{get_canvas, place_pixel};
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    Router::new()
        .route("/canvas", get(get_canvas).post(place_pixel))
        .route("/health", get(|| async { "ok" }))
        .fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state)
}
