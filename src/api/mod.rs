//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/reset", post(reset_handler))
        .route("/skip", post(skip_handler))
        .route("/chime", post(chime_handler))
        .route("/modes", get(modes_handler))
        .route("/modes/:mode_id", get(mode_handler).post(switch_mode_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::cue::CompletionCue;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(0, "127.0.0.1".to_string(), false, CompletionCue::silent()))
    }

    async fn call(router: Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_status_reflects_ticks() {
        let state = test_state();
        state.start().unwrap();
        for _ in 0..65 {
            state.tick().unwrap();
        }

        let (status, body) = call(create_router(state), Method::GET, "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["countdown"]["remainingSeconds"], 1435);
        assert_eq!(body["countdown"]["display"], "23:55");
        assert_eq!(body["countdown"]["running"], true);
        assert_eq!(body["lastAction"], "start");
        assert!(body["lastActionTime"].is_string());
        assert!(body.get("last_action").is_none());
    }

    #[tokio::test]
    async fn test_switch_mode() {
        let state = test_state();
        let (status, body) = call(create_router(Arc::clone(&state)), Method::POST, "/modes/longBreak").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "paused");
        assert_eq!(body["countdown"]["mode"], "longBreak");
        assert_eq!(body["countdown"]["display"], "15:00");
        assert_eq!(body["countdown"]["progress"], 1.0);
    }

    #[tokio::test]
    async fn test_unknown_mode_is_not_found() {
        let state = test_state();
        let (status, body) = call(create_router(Arc::clone(&state)), Method::POST, "/modes/bogus").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "unknown mode: bogus");

        let (status, _) = call(create_router(Arc::clone(&state)), Method::GET, "/modes/bogus").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(create_router(state), Method::POST, "/mode/focus").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_mode_table() {
        let (status, body) = call(create_router(test_state()), Method::GET, "/modes").await;
        assert_eq!(status, StatusCode::OK);
        let modes = body.as_array().unwrap();
        assert_eq!(modes.len(), 3);
        assert_eq!(modes[1]["label"], "Short Break");
        assert_eq!(modes[1]["nextLabel"], "Start Focus Session");

        let (_, body) = call(create_router(test_state()), Method::GET, "/modes/focus").await;
        assert_eq!(body["color"], "#ef4444");
    }

    #[tokio::test]
    async fn test_control_endpoints() {
        let state = test_state();
        let (_, body) = call(create_router(Arc::clone(&state)), Method::POST, "/start").await;
        assert_eq!(body["status"], "running");

        let (_, body) = call(create_router(Arc::clone(&state)), Method::POST, "/pause").await;
        assert_eq!(body["status"], "paused");

        let (_, body) = call(create_router(Arc::clone(&state)), Method::POST, "/skip").await;
        assert_eq!(body["countdown"]["mode"], "shortBreak");

        let (status, _) = call(create_router(state), Method::POST, "/chime").await;
        assert_eq!(status, StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(create_router(test_state()), Method::GET, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
