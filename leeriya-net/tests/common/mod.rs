#![allow(dead_code)]
//! Test harness utilities for leeriya-net integration tests.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use leeriya_core::{RoomManager, RoomManagerConfig, TokenCodec};
use leeriya_net::build_router;
pub use leeriya_net::AppState;
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret";

/// Builds a fresh, empty room registry over the mock generator (no network
/// calls, no real audio hardware).
pub fn test_state() -> AppState {
    let room_manager = RoomManager::new(RoomManagerConfig {
        reservation_ttl: Duration::from_secs(30),
        room_idle_timeout: Duration::from_secs(1800),
        use_mock_generator: true,
        remote_config: None,
    });
    AppState {
        room_manager,
        token_codec: Arc::new(TokenCodec::new(TEST_SECRET)),
        token_ttl_seconds: 86_400,
    }
}

/// A fully wired router over a fresh app state. Two routers built from the
/// same `AppState::clone()` share the same room registry; useful when a
/// test needs to drive HTTP calls (`oneshot`) against the same rooms a real
/// `axum::serve` instance is accepting WebSocket connections for.
pub fn router_for(state: AppState) -> Router {
    build_router(state, &["*".to_string()])
}

pub fn test_router() -> Router {
    router_for(test_state())
}

/// Sends a request against a fresh `oneshot` clone of the router and
/// returns the response status plus the parsed JSON body, if any.
pub async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(req).await.expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}
