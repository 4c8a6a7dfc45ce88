//! HTTP integration tests for registration, login, and the health probe.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{assert_status_json, build_test_app, get, get_auth, post_json};

// ---------------------------------------------------------------------------
// Test: health probe is public
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn health_is_public(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Test: register returns the user and a working token
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn register_returns_user_and_token(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/auth/register",
        &json!({
            "email": "new@test.local",
            "password": "a-long-enough-password",
            "display_name": "Nia New",
            "role": "customer",
        }),
    )
    .await;
    let body = assert_status_json(response, StatusCode::CREATED).await;

    assert_eq!(body["data"]["user"]["email"], "new@test.local");
    assert_eq!(body["data"]["user"]["role"], "customer");
    // The password hash must never leave the server.
    assert!(body["data"]["user"].get("password_hash").is_none());

    let token = body["data"]["token"].as_str().expect("token should be a string");
    let response = get_auth(&app, "/api/v1/notifications", token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Test: duplicate email registration is a conflict
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_email_is_conflict(pool: PgPool) {
    let app = build_test_app(pool);
    let payload = json!({
        "email": "dup@test.local",
        "password": "a-long-enough-password",
        "display_name": "Dup",
        "role": "provider",
    });

    let response = post_json(&app, "/api/v1/auth/register", &payload).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(&app, "/api/v1/auth/register", &payload).await;
    let body = assert_status_json(response, StatusCode::CONFLICT).await;
    assert_eq!(body["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Test: weak passwords and unknown roles are rejected
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn register_validates_input(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/auth/register",
        &json!({
            "email": "weak@test.local",
            "password": "short",
            "display_name": "Weak",
            "role": "customer",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &app,
        "/api/v1/auth/register",
        &json!({
            "email": "admin@test.local",
            "password": "a-long-enough-password",
            "display_name": "Admin",
            "role": "admin",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: login accepts good credentials, rejects bad ones identically
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_checks_credentials(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/auth/register",
        &json!({
            "email": "login@test.local",
            "password": "a-long-enough-password",
            "display_name": "Logan",
            "role": "customer",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(
        &app,
        "/api/v1/auth/login",
        &json!({ "email": "login@test.local", "password": "a-long-enough-password" }),
    )
    .await;
    let body = assert_status_json(response, StatusCode::OK).await;
    assert!(body["data"]["token"].is_string());

    // Wrong password and unknown email both read the same to the caller.
    let response = post_json(
        &app,
        "/api/v1/auth/login",
        &json!({ "email": "login@test.local", "password": "wrong-password-entirely" }),
    )
    .await;
    let body = assert_status_json(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(body["error"], "Invalid email or password");

    let response = post_json(
        &app,
        "/api/v1/auth/login",
        &json!({ "email": "nobody@test.local", "password": "a-long-enough-password" }),
    )
    .await;
    let body = assert_status_json(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(body["error"], "Invalid email or password");
}
