//! Route definitions for the `/bookings` resource and its sub-resources.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::{bookings, messages, ratings};
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// GET    /               -> list_bookings
/// POST   /               -> create_booking (customers only)
/// GET    /{id}           -> get_booking (parties only)
/// PATCH  /{id}/status    -> transition_booking (role-gated)
/// GET    /{id}/messages  -> list_messages (parties only)
/// POST   /{id}/messages  -> send_message (parties only)
/// GET    /{id}/rating    -> get_rating (parties only)
/// POST   /{id}/rating    -> create_rating (customer, completed only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/{id}", get(bookings::get_booking))
        .route("/{id}/status", patch(bookings::transition_booking))
        .route(
            "/{id}/messages",
            get(messages::list_messages).post(messages::send_message),
        )
        .route(
            "/{id}/rating",
            get(ratings::get_rating).post(ratings::create_rating),
        )
}
