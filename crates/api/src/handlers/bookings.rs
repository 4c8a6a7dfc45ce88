//! Handlers for the `/bookings` resource: creation and status transitions.
//!
//! Both operations follow the same shape: validate, persist, respond, and
//! only then publish the counterparty's notification event to the bus. The
//! publish is synchronous and non-blocking, so the response is never held
//! up by notification delivery.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use servly_core::booking::{check_transition, ActorRole, BookingStatus, RESPONSE_WINDOW_HOURS};
use servly_core::error::CoreError;
use servly_core::roles::{ROLE_CUSTOMER, ROLE_PROVIDER};
use servly_core::types::DbId;
use servly_db::models::booking::{Booking, BookingDetail, CreateBooking};
use servly_db::repositories::{BookingRepo, ServiceRepo};
use servly_events::{NotificationEvent, NotificationKind};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query parameters for `GET /bookings`.
#[derive(Debug, Deserialize)]
pub struct BookingQuery {
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Request body for `PATCH /bookings/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: BookingStatus,
}

/// Maximum page size for booking listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for booking listing.
const DEFAULT_LIMIT: i64 = 50;

/// POST /api/v1/bookings
///
/// Create a `pending` booking for a service. The provider is derived from
/// the service and notified after the response is on its way.
pub async fn create_booking(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(dto): Json<CreateBooking>,
) -> AppResult<impl IntoResponse> {
    if auth.role != ROLE_CUSTOMER {
        return Err(CoreError::Forbidden("Only customers can create bookings".into()).into());
    }

    let service = ServiceRepo::get_by_id(&state.pool, dto.service_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Service",
            id: dto.service_id,
        })?;

    if !service.is_active {
        return Err(CoreError::Validation("Service is no longer active".into()).into());
    }
    if service.provider_id == auth.user_id {
        return Err(CoreError::Validation("Cannot book your own service".into()).into());
    }

    let response_due_at = Utc::now() + Duration::hours(RESPONSE_WINDOW_HOURS);

    let booking = BookingRepo::create(
        &state.pool,
        auth.user_id,
        service.provider_id,
        service.id,
        dto.description.trim(),
        dto.address.trim(),
        dto.scheduled_for,
        response_due_at,
    )
    .await?;

    let detail = load_detail(&state, booking.id).await?;

    tracing::info!(
        booking_id = booking.id,
        customer_id = auth.user_id,
        provider_id = service.provider_id,
        "Booking created"
    );

    state.event_bus.publish(
        NotificationEvent::new(
            service.provider_id,
            NotificationKind::BookingCreated,
            "New booking request",
            format!("{} requested \"{}\"", auth.display_name, service.title),
        )
        .with_link(format!("/bookings/{}", booking.id))
        .with_booking(booking.id),
    );

    Ok((StatusCode::CREATED, Json(json!({ "data": detail }))))
}

/// GET /api/v1/bookings
///
/// List bookings where the authenticated user is a party, newest first.
pub async fn list_bookings(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<BookingQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let bookings = BookingRepo::list_for_user(&state.pool, auth.user_id, limit, offset).await?;
    Ok(Json(json!({ "data": bookings })))
}

/// GET /api/v1/bookings/{id}
pub async fn get_booking(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let detail = load_detail(&state, booking_id).await?;

    if auth.user_id != detail.customer_id && auth.user_id != detail.provider_id {
        return Err(CoreError::Forbidden("Not a party to this booking".into()).into());
    }

    Ok(Json(json!({ "data": detail })))
}

/// PATCH /api/v1/bookings/{id}/status
///
/// Apply a role-gated status transition. The move is validated against the
/// state machine table, then applied with a status precondition so a
/// concurrent (or repeated) transition fails instead of overwriting.
pub async fn transition_booking(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
    Json(req): Json<TransitionRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let booking = BookingRepo::get_by_id(&state.pool, booking_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Booking",
            id: booking_id,
        })?;

    let actor = booking_role(&auth, &booking)?;
    let current = BookingStatus::parse(&booking.status)?;
    let target = req.status;

    check_transition(current, actor, target)?;

    let applied =
        BookingRepo::update_status_checked(&state.pool, booking_id, current.as_str(), target.as_str())
            .await?;
    if !applied {
        // A concurrent transition won the race; our precondition is stale.
        return Err(CoreError::InvalidTransition {
            from: current.as_str().to_string(),
            to: target.as_str().to_string(),
        }
        .into());
    }

    let detail = load_detail(&state, booking_id).await?;

    tracing::info!(
        booking_id,
        from = current.as_str(),
        to = target.as_str(),
        actor_id = auth.user_id,
        "Booking transitioned"
    );

    if let Some(event) = transition_event(&auth, &booking, &detail, target) {
        state.event_bus.publish(event);
    }

    Ok(Json(json!({ "data": detail })))
}

/// Map the authenticated user onto their side of the booking.
///
/// Fails with Forbidden when the user is not the party matching their
/// role; no third role may transition a booking.
fn booking_role(auth: &AuthUser, booking: &Booking) -> Result<ActorRole, AppError> {
    match auth.role.as_str() {
        ROLE_CUSTOMER if auth.user_id == booking.customer_id => Ok(ActorRole::Customer),
        ROLE_PROVIDER if auth.user_id == booking.provider_id => Ok(ActorRole::Provider),
        _ => Err(CoreError::Forbidden("Not a party to this booking".into()).into()),
    }
}

/// Build the counterparty's notification event for an applied transition.
fn transition_event(
    auth: &AuthUser,
    booking: &Booking,
    detail: &BookingDetail,
    target: BookingStatus,
) -> Option<NotificationEvent> {
    let counterparty = if auth.user_id == booking.customer_id {
        booking.provider_id
    } else {
        booking.customer_id
    };

    let (kind, title) = match target {
        BookingStatus::Accepted => (NotificationKind::BookingAccepted, "Booking accepted"),
        BookingStatus::Declined => (NotificationKind::BookingDeclined, "Booking declined"),
        BookingStatus::Completed => (NotificationKind::BookingCompleted, "Booking completed"),
        BookingStatus::Cancelled => (NotificationKind::BookingCancelled, "Booking cancelled"),
        // No legal transition targets `pending`.
        BookingStatus::Pending => return None,
    };

    Some(
        NotificationEvent::new(
            counterparty,
            kind,
            title,
            format!(
                "{} marked the booking for \"{}\" as {}",
                auth.display_name,
                detail.service_title,
                target.as_str()
            ),
        )
        .with_link(format!("/bookings/{}", booking.id))
        .with_booking(booking.id),
    )
}

/// Load the joined booking detail, treating absence as NotFound.
async fn load_detail(state: &AppState, booking_id: DbId) -> Result<BookingDetail, AppError> {
    BookingRepo::get_detail(&state.pool, booking_id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Booking",
                id: booking_id,
            }
            .into()
        })
}
