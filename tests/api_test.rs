//! Canvas API integration tests
//!
//! Drives the real router through axum-test: status codes, bodies and the
//! cooldown contract of `POST /canvas`.

#![cfg(feature = "ssr")]

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use canvas_sync::backend::create_app;
use canvas_sync::shared::{CanvasSnapshot, PlacePixelResponse, RateLimitedBody};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::server_config;

fn create_test_server(canvas_size: usize, cooldown_seconds: u64) -> TestServer {
    let (app, _cleanup) = create_app(server_config(canvas_size, cooldown_seconds));
    TestServer::new(app).expect("build test server")
}

#[tokio::test]
async fn test_get_canvas_returns_blank_grid() {
    let server = create_test_server(4, 60);

    let response = server.get("/canvas").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let snapshot: CanvasSnapshot = response.json();
    assert_eq!(snapshot.size, 4);
    assert!(snapshot.is_complete());
    assert_cell!(snapshot, 3, 3, "#FFFFFF", "");
    assert_eq!(snapshot.pixel(0, 0).unwrap().last_updated, 0);
}

#[tokio::test]
async fn test_place_pixel_then_read_back() {
    let server = create_test_server(4, 60);

    let response = server
        .post("/canvas")
        .json(&json!({ "x": 1, "y": 2, "color": "#FF0000", "username": "alice" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let placed: PlacePixelResponse = response.json();
    assert_eq!((placed.x, placed.y), (1, 2));
    assert_eq!(placed.cooldown_seconds, 60);
    assert_eq!(placed.pixel.last_updated_by, "alice");

    let snapshot: CanvasSnapshot = server.get("/canvas").await.json();
    assert_cell!(snapshot, 1, 2, "#FF0000", "alice");
    assert_eq!(snapshot.pixel(1, 2).unwrap().last_updated, placed.pixel.last_updated);
    assert_cell!(snapshot, 2, 1, "#FFFFFF", "");
}

#[tokio::test]
async fn test_second_write_inside_cooldown_is_rate_limited() {
    let server = create_test_server(4, 60);

    server
        .post("/canvas")
        .json(&json!({ "x": 0, "y": 0, "color": "#00FF00", "username": "bob" }))
        .await
        .assert_status_ok();

    let response = server
        .post("/canvas")
        .json(&json!({ "x": 1, "y": 1, "color": "#0000FF", "username": "bob" }))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);

    let retry_header: u64 = response
        .header("retry-after")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_in_range!(retry_header, 59, 60);

    let body: RateLimitedBody = response.json();
    assert_eq!(body.retry_after_seconds, Some(retry_header));
    assert_contains!(body.error, "seconds before placing another pixel");

    // The refused write left no trace
    let snapshot: CanvasSnapshot = server.get("/canvas").await.json();
    assert_cell!(snapshot, 1, 1, "#FFFFFF", "");
}

#[tokio::test]
async fn test_participants_have_independent_cooldowns() {
    let server = create_test_server(4, 60);

    for (name, x) in [("alice", 0), ("bob", 1), ("carol", 2)] {
        server
            .post("/canvas")
            .json(&json!({ "x": x, "y": 0, "color": "#123456", "username": name }))
            .await
            .assert_status_ok();
    }
}

#[tokio::test]
async fn test_invalid_writes_are_bad_requests() {
    let server = create_test_server(4, 60);

    for body in [
        json!({ "x": 4, "y": 0, "color": "#FF0000", "username": "alice" }),
        json!({ "x": 0, "y": -1, "color": "#FF0000", "username": "alice" }),
        json!({ "x": 0, "y": 0, "color": "red", "username": "alice" }),
        json!({ "x": "zero", "y": 0, "color": "#FF0000", "username": "alice" }),
    ] {
        let response = server.post("/canvas").json(&body).expect_failure().await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "body {}", body);
    }

    // None of those consumed alice's cooldown
    server
        .post("/canvas")
        .json(&json!({ "x": 0, "y": 0, "color": "#FF0000", "username": "alice" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_missing_username_is_unauthenticated() {
    let server = create_test_server(4, 60);

    let response = server
        .post("/canvas")
        .json(&json!({ "x": 0, "y": 0, "color": "#FF0000" }))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_and_unknown_routes() {
    let server = create_test_server(2, 60);

    server.get("/health").await.assert_text("ok");
    server
        .get("/nope")
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
