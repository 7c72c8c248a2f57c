/**
 * Canvas Handlers
 *
 * HTTP endpoints for the canvas:
 * - GET /canvas - full snapshot, always the whole grid
 * - POST /canvas - place one pixel
 */

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;

use crate::backend::canvas::arbiter::WriteOutcome;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::{CanvasSnapshot, PlacePixelRequest, PlacePixelResponse, SharedError};

/// Handle GET /canvas
pub async fn get_canvas(State(app_state): State<AppState>) -> Json<CanvasSnapshot> {
    let snapshot = app_state.store.read_all().await;
    tracing::debug!(size = snapshot.size, "[Canvas] Served snapshot");
    Json(snapshot)
}

/// Handle POST /canvas
///
/// Returns the written cell on success. A participant still on cooldown gets
/// `429` with the wait both as `retryAfterSeconds` and inside the `error`
/// text.
pub async fn place_pixel(
    State(app_state): State<AppState>,
    payload: Result<Json<PlacePixelRequest>, JsonRejection>,
) -> Result<Json<PlacePixelResponse>, BackendError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!("[Canvas] Malformed write body: {}", rejection.body_text());
        SharedError::validation("body", rejection.body_text())
    })?;

    match app_state.arbiter.submit(&request, Utc::now()).await? {
        WriteOutcome::Accepted { x, y, pixel, .. } => Ok(Json(PlacePixelResponse {
            x,
            y,
            pixel,
            cooldown_seconds: app_state.arbiter.cooldown_seconds(),
        })),
        WriteOutcome::Rejected { retry_after_seconds } => {
            Err(BackendError::CooldownActive { retry_after_seconds })
        }
    }
}
