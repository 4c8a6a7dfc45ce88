//! Shared helpers for HTTP integration tests.
//!
//! Builds the real application router (all middleware layers included) on
//! top of a `#[sqlx::test]`-provided pool and drives it with `oneshot`
//! requests, so tests exercise the same code path as production traffic.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use servly_api::auth::jwt::{generate_access_token, JwtConfig};
use servly_api::config::ServerConfig;
use servly_api::notifications::NotificationDispatcher;
use servly_api::router::build_app_router;
use servly_api::state::AppState;
use servly_api::ws::WsManager;
use servly_db::repositories::UserRepo;
use servly_events::{EmailDelivery, EventBus};
use sqlx::PgPool;
use tower::ServiceExt;

/// Fixed configuration for integration tests.
///
/// Matches what `ServerConfig::from_env` would produce in local
/// development, with a known JWT secret so tests can mint tokens directly.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        ws_heartbeat_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-0123456789".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the application router for tests, wired to the given pool.
///
/// Email delivery is off, as it is by default in local development.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_email(pool, None)
}

/// Build the application router with an explicit email channel.
///
/// Spawns a real [`NotificationDispatcher`] on the state's event bus, so
/// events published by handlers land in the notification ledger just like
/// in production. The broadcast channel buffers published events, so the
/// dispatcher keeps draining them even after the router itself is dropped.
pub fn build_test_app_with_email(pool: PgPool, email: Option<EmailDelivery>) -> Router {
    let config = test_config();
    let ws_manager = Arc::new(WsManager::new());
    let event_bus = Arc::new(EventBus::default());

    let dispatcher = NotificationDispatcher::new(pool.clone(), Arc::clone(&ws_manager), email);
    tokio::spawn(dispatcher.run(event_bus.subscribe()));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager,
        event_bus,
    };

    build_app_router(state, &config)
}

/// Insert a user directly and mint an access token for them.
///
/// Returns `(user_id, token)`. Going through the repository instead of
/// `/auth/register` keeps unrelated tests independent of the auth handlers.
pub async fn create_user(pool: &PgPool, email: &str, display_name: &str, role: &str) -> (i64, String) {
    let password_hash = servly_api::auth::password::hash_password("a-long-enough-password")
        .expect("password hashing should succeed");
    let user = UserRepo::create(pool, email, &password_hash, display_name, role)
        .await
        .expect("user insert should succeed");
    let token = generate_access_token(user.id, role, &test_config().jwt)
        .expect("token generation should succeed");
    (user.id, token)
}

/// Issue an unauthenticated GET request.
pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    app.clone().oneshot(request).await.expect("request should complete")
}

/// Issue a GET request with a bearer token.
pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build");
    app.clone().oneshot(request).await.expect("request should complete")
}

/// Issue an unauthenticated POST request with a JSON body.
pub async fn post_json(app: &Router, uri: &str, body: &Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.clone().oneshot(request).await.expect("request should complete")
}

/// Issue a POST request with a bearer token and a JSON body.
pub async fn post_json_auth(app: &Router, uri: &str, token: &str, body: &Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.clone().oneshot(request).await.expect("request should complete")
}

/// Issue a bodyless POST request with a bearer token.
pub async fn post_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build");
    app.clone().oneshot(request).await.expect("request should complete")
}

/// Issue a PATCH request with a bearer token and a JSON body.
pub async fn patch_json_auth(app: &Router, uri: &str, token: &str, body: &Value) -> Response<Body> {
    let request = Request::builder()
        .method("PATCH")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.clone().oneshot(request).await.expect("request should complete")
}

/// Read and parse a JSON response body.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Assert a status code and return the parsed body in one step.
pub async fn assert_status_json(response: Response<Body>, expected: StatusCode) -> Value {
    assert_eq!(response.status(), expected);
    body_json(response).await
}
