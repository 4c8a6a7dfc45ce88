pub mod auth;
pub mod bookings;
pub mod health;
pub mod notifications;
pub mod services;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                        WebSocket (token via ?token= query param)
///
/// /auth/register             register (public)
/// /auth/login                login (public)
///
/// /services                  list, create (create: providers only)
/// /services/{id}             get
///
/// /bookings                  list, create (create: customers only)
/// /bookings/{id}             get (parties only)
/// /bookings/{id}/status      transition (PATCH, role-gated)
/// /bookings/{id}/messages    list, send (parties only)
/// /bookings/{id}/rating      read rating (GET), rate provider (POST)
///
/// /notifications             list (?unread_only, limit, offset)
/// /notifications/read-all    mark all read (POST)
/// /notifications/unread-count unread count (GET)
/// /notifications/{id}/read   mark read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket endpoint.
        .route("/ws", get(ws::ws_handler))
        // Authentication routes (register, login).
        .nest("/auth", auth::router())
        // Service catalogue.
        .nest("/services", services::router())
        // Bookings, plus nested messages and ratings.
        .nest("/bookings", bookings::router())
        // Notification ledger read side.
        .nest("/notifications", notifications::router())
}
