//! Handlers for rating a completed booking and reading the rating back.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use servly_core::booking::BookingStatus;
use servly_core::error::CoreError;
use servly_core::types::DbId;
use servly_db::models::rating::CreateRating;
use servly_db::repositories::{BookingRepo, RatingRepo};
use servly_events::{NotificationEvent, NotificationKind};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/bookings/{id}/rating
///
/// The customer of a completed booking rates the provider, once. A second
/// rating attempt hits the `uq_ratings_booking` constraint and surfaces as
/// 409. The provider is notified after the response.
pub async fn create_rating(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
    Json(dto): Json<CreateRating>,
) -> AppResult<impl IntoResponse> {
    if !(1..=5).contains(&dto.stars) {
        return Err(CoreError::Validation("Stars must be between 1 and 5".into()).into());
    }

    let booking = BookingRepo::get_by_id(&state.pool, booking_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Booking",
            id: booking_id,
        })?;

    if auth.user_id != booking.customer_id {
        return Err(CoreError::Forbidden("Only the booking customer can rate".into()).into());
    }

    let status = BookingStatus::parse(&booking.status)?;
    if status != BookingStatus::Completed {
        return Err(CoreError::Validation("Only completed bookings can be rated".into()).into());
    }

    let rating = RatingRepo::create(
        &state.pool,
        booking_id,
        auth.user_id,
        booking.provider_id,
        dto.stars,
        dto.comment.as_deref(),
    )
    .await?;

    tracing::info!(booking_id, stars = rating.stars, "Rating created");

    state.event_bus.publish(
        NotificationEvent::new(
            booking.provider_id,
            NotificationKind::RatingReceived,
            "New rating",
            format!("{} rated you {} out of 5", auth.display_name, rating.stars),
        )
        .with_link(format!("/bookings/{booking_id}"))
        .with_booking(booking_id),
    );

    Ok((StatusCode::CREATED, Json(json!({ "data": rating }))))
}

/// GET /api/v1/bookings/{id}/rating
///
/// Fetch the rating on a booking. Parties only; 404 while no rating has
/// been left.
pub async fn get_rating(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let booking = BookingRepo::get_by_id(&state.pool, booking_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Booking",
            id: booking_id,
        })?;

    if auth.user_id != booking.customer_id && auth.user_id != booking.provider_id {
        return Err(CoreError::Forbidden("Not a party to this booking".into()).into());
    }

    let rating = RatingRepo::get_for_booking(&state.pool, booking_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Rating",
            id: booking_id,
        })?;

    Ok(Json(json!({ "data": rating })))
}
