/**
 * Error Conversion
 *
 * `IntoResponse` for `BackendError`, so handlers can return it directly.
 *
 * # Response Format
 *
 * ```json
 * { "error": "Error message", "status": 400 }
 * ```
 *
 * Cooldown rejections add `"retryAfterSeconds": N` to the body and a
 * `Retry-After` header.
 */

use axum::{
    http::{header::RETRY_AFTER, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "[Canvas] Request failed: {}", message);
        } else {
            tracing::debug!(status = status.as_u16(), "[Canvas] Request rejected: {}", message);
        }

        let mut body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        let mut headers = HeaderMap::new();
        if let Some(retry_after) = self.retry_after_seconds() {
            body["retryAfterSeconds"] = retry_after.into();
            headers.insert(RETRY_AFTER, HeaderValue::from(retry_after));
        }

        (status, headers, Json(body)).into_response()
    }
}
