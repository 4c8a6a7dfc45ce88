//! Handlers for booking chat messages over HTTP.
//!
//! The WebSocket path in `crate::ws` is the low-latency way to send
//! messages; these endpoints are the request/response equivalent and go
//! through the same persistence, broadcast, and notification steps.

use axum::extract::ws::Message as WsMessage;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use servly_core::error::CoreError;
use servly_core::types::DbId;
use servly_db::models::booking::Booking;
use servly_db::repositories::{BookingRepo, MessageRepo};
use servly_events::{NotificationEvent, NotificationKind};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::ws::protocol::{server_frame, ServerEvent};

/// Query parameters for `GET /bookings/{id}/messages`.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    /// Maximum number of results. Defaults to 100, capped at 200.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Request body for `POST /bookings/{id}/messages`.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub body: String,
}

/// Maximum page size for message listing.
const MAX_LIMIT: i64 = 200;

/// Default page size for message listing.
const DEFAULT_LIMIT: i64 = 100;

/// GET /api/v1/bookings/{id}/messages
///
/// List a booking's messages, oldest first. Parties only.
pub async fn list_messages(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
    Query(params): Query<MessageQuery>,
) -> AppResult<Json<serde_json::Value>> {
    load_booking_as_party(&state, booking_id, auth.user_id).await?;

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let messages = MessageRepo::list_for_booking(&state.pool, booking_id, limit, offset).await?;
    Ok(Json(json!({ "data": messages })))
}

/// POST /api/v1/bookings/{id}/messages
///
/// Persist a message, broadcast it to the booking room, and notify the
/// counterparty. Party membership is verified on every send.
pub async fn send_message(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
    Json(req): Json<SendMessageRequest>,
) -> AppResult<impl IntoResponse> {
    let booking = load_booking_as_party(&state, booking_id, auth.user_id).await?;

    let body = req.body.trim();
    if body.is_empty() {
        return Err(CoreError::Validation("Message body cannot be empty".into()).into());
    }

    let message = MessageRepo::create(&state.pool, booking_id, auth.user_id, body).await?;

    // Broadcast to whoever is watching the booking room right now.
    let frame = server_frame(ServerEvent::NewMessage, &message);
    state
        .ws_manager
        .broadcast_to_booking(booking_id, WsMessage::Text(frame.into()))
        .await;

    let counterparty = if auth.user_id == booking.customer_id {
        booking.provider_id
    } else {
        booking.customer_id
    };
    state.event_bus.publish(
        NotificationEvent::new(
            counterparty,
            NotificationKind::MessageReceived,
            "New message",
            format!("{} sent you a message", auth.display_name),
        )
        .with_link(format!("/bookings/{booking_id}"))
        .with_booking(booking_id)
        .with_message(message.id),
    );

    Ok((StatusCode::CREATED, Json(json!({ "data": message }))))
}

/// Load a booking and require the user to be one of its parties.
async fn load_booking_as_party(
    state: &AppState,
    booking_id: DbId,
    user_id: DbId,
) -> Result<Booking, crate::error::AppError> {
    let booking = BookingRepo::get_by_id(&state.pool, booking_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Booking",
            id: booking_id,
        })?;

    if user_id != booking.customer_id && user_id != booking.provider_id {
        return Err(CoreError::Forbidden("Not a party to this booking".into()).into());
    }

    Ok(booking)
}
