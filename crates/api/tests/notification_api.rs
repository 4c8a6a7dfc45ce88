//! HTTP integration tests for the notification ledger's read side.

mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use servly_db::repositories::NotificationRepo;
use sqlx::PgPool;

use common::{assert_status_json, build_test_app, create_user, get_auth, post_auth};

/// Insert a ledger row directly, as the dispatcher would.
async fn seed_notification(pool: &PgPool, user_id: i64, title: &str) -> i64 {
    let notification = NotificationRepo::create(
        pool,
        user_id,
        "booking_created",
        title,
        "Someone requested a booking",
        Some("/bookings/1"),
        None,
        None,
    )
    .await
    .expect("notification insert should succeed");
    notification.id
}

/// Fetch `(is_read, read_at)` for one ledger row.
async fn read_state(pool: &PgPool, id: i64) -> (bool, Option<DateTime<Utc>>) {
    sqlx::query_as("SELECT is_read, read_at FROM notifications WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("state query should succeed")
}

// ---------------------------------------------------------------------------
// Test: marking a notification read twice succeeds both times
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn mark_read_is_repeatable(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (user_id, token) = create_user(&pool, "user@test.local", "Uli User", "customer").await;
    let id = seed_notification(&pool, user_id, "New booking request").await;
    let uri = format!("/api/v1/notifications/{id}/read");

    let response = post_auth(&app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (is_read, first_read_at) = read_state(&pool, id).await;
    assert!(is_read);
    let first_read_at = first_read_at.expect("read_at should be set");

    // The second call is not an error, and the original timestamp sticks.
    let response = post_auth(&app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (is_read, second_read_at) = read_state(&pool, id).await;
    assert!(is_read);
    assert_eq!(second_read_at, Some(first_read_at));
}

// ---------------------------------------------------------------------------
// Test: unknown and foreign notification ids are 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn mark_read_unknown_or_foreign_is_not_found(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, token) = create_user(&pool, "user@test.local", "Uli User", "customer").await;
    let (other_id, _) = create_user(&pool, "other@test.local", "Olly Other", "customer").await;
    let foreign = seed_notification(&pool, other_id, "Not yours").await;

    let response = post_auth(&app, "/api/v1/notifications/999999/read", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_auth(&app, &format!("/api/v1/notifications/{foreign}/read"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The foreign row is untouched.
    let (is_read, read_at) = read_state(&pool, foreign).await;
    assert!(!is_read);
    assert!(read_at.is_none());
}

// ---------------------------------------------------------------------------
// Test: unread count and read-all
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unread_count_and_read_all(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (user_id, token) = create_user(&pool, "user@test.local", "Uli User", "customer").await;
    for i in 0..3 {
        seed_notification(&pool, user_id, &format!("Notification {i}")).await;
    }

    let response = get_auth(&app, "/api/v1/notifications/unread-count", &token).await;
    let body = assert_status_json(response, StatusCode::OK).await;
    assert_eq!(body["data"]["unread"], 3);

    let response = post_auth(&app, "/api/v1/notifications/read-all", &token).await;
    let body = assert_status_json(response, StatusCode::OK).await;
    assert_eq!(body["data"]["marked_read"], 3);

    // Read-all on an empty backlog marks nothing.
    let response = post_auth(&app, "/api/v1/notifications/read-all", &token).await;
    let body = assert_status_json(response, StatusCode::OK).await;
    assert_eq!(body["data"]["marked_read"], 0);

    let response = get_auth(&app, "/api/v1/notifications/unread-count", &token).await;
    let body = assert_status_json(response, StatusCode::OK).await;
    assert_eq!(body["data"]["unread"], 0);
}

// ---------------------------------------------------------------------------
// Test: unread_only filters the listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn listing_honours_unread_only(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (user_id, token) = create_user(&pool, "user@test.local", "Uli User", "customer").await;
    let read_id = seed_notification(&pool, user_id, "Already seen").await;
    seed_notification(&pool, user_id, "Still unread").await;

    let response = post_auth(&app, &format!("/api/v1/notifications/{read_id}/read"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(&app, "/api/v1/notifications", &token).await;
    let body = assert_status_json(response, StatusCode::OK).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    let response = get_auth(&app, "/api/v1/notifications?unread_only=true", &token).await;
    let body = assert_status_json(response, StatusCode::OK).await;
    let items = body["data"].as_array().expect("data should be an array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Still unread");
}
