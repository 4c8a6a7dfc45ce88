use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use servly_core::types::DbId;
use servly_db::repositories::{BookingRepo, MessageRepo};
use servly_events::{NotificationEvent, NotificationKind};

use crate::error::AppError;
use crate::middleware::auth::{resolve_user, AuthUser};
use crate::state::AppState;
use crate::ws::protocol::{error_frame, server_frame, ClientEvent, ServerEvent};

/// Query parameters for the WebSocket upgrade request.
///
/// Browsers cannot set headers on a WebSocket handshake, so the bearer
/// token travels as a query parameter instead.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    token: String,
}

/// HTTP handler that upgrades the connection to WebSocket.
///
/// The token is resolved through the access-control guard *before* the
/// upgrade; a failed handshake never reaches the socket loop.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let user = resolve_user(&query.token, &state).await?;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user)))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with `WsManager`.
///   2. Spawns a sender task that forwards messages from the manager channel.
///   3. Processes inbound frames on the current task.
///   4. Cleans up all room memberships on disconnect.
async fn handle_socket(socket: WebSocket, state: AppState, user: AuthUser) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id = user.user_id, "WebSocket connected");

    // Register and get the receiver for outbound messages.
    let mut rx = state
        .ws_manager
        .add(conn_id.clone(), user.user_id, &user.role)
        .await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: process inbound frames.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                handle_client_frame(&state, &conn_id, &user, text.as_str()).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: remove connection (and its rooms) and abort the sender task.
    state.ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, user_id = user.user_id, "WebSocket disconnected");
}

/// Dispatch one parsed client frame.
async fn handle_client_frame(state: &AppState, conn_id: &str, user: &AuthUser, text: &str) {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::JoinBooking { booking_id }) => {
            join_booking(state, conn_id, user, booking_id).await;
        }
        Ok(ClientEvent::LeaveBooking { booking_id }) => {
            state.ws_manager.leave_room(conn_id, booking_id).await;
        }
        Ok(ClientEvent::SendMessage { booking_id, body }) => {
            send_message(state, conn_id, user, booking_id, &body).await;
        }
        Err(e) => {
            tracing::debug!(conn_id = %conn_id, error = %e, "Unparseable client frame");
            state
                .ws_manager
                .send_to_conn(conn_id, Message::Text(error_frame("Unknown event").into()))
                .await;
        }
    }
}

/// Join the room for a booking the user is a party to.
///
/// Failures are silent no-ops so a probe cannot learn whether a booking
/// id exists.
async fn join_booking(state: &AppState, conn_id: &str, user: &AuthUser, booking_id: DbId) {
    match BookingRepo::get_by_id(&state.pool, booking_id).await {
        Ok(Some(booking)) if is_party(user.user_id, booking.customer_id, booking.provider_id) => {
            state.ws_manager.join_room(conn_id, booking_id).await;
            tracing::debug!(conn_id = %conn_id, booking_id, "Joined booking room");
        }
        Ok(_) => {
            tracing::debug!(conn_id = %conn_id, booking_id, "Ignored join for foreign booking");
        }
        Err(e) => {
            tracing::error!(error = %e, booking_id, "Failed to load booking for room join");
        }
    }
}

/// Persist and broadcast a chat message, then notify the counterparty.
///
/// Party membership is re-verified on every send; a room joined earlier
/// does not imply continued authorization.
async fn send_message(
    state: &AppState,
    conn_id: &str,
    user: &AuthUser,
    booking_id: DbId,
    body: &str,
) {
    let body = body.trim();
    if body.is_empty() {
        state
            .ws_manager
            .send_to_conn(
                conn_id,
                Message::Text(error_frame("Message body cannot be empty").into()),
            )
            .await;
        return;
    }

    let booking = match BookingRepo::get_by_id(&state.pool, booking_id).await {
        Ok(Some(b)) if is_party(user.user_id, b.customer_id, b.provider_id) => b,
        Ok(_) => {
            state
                .ws_manager
                .send_to_conn(
                    conn_id,
                    Message::Text(error_frame("Not a party to this booking").into()),
                )
                .await;
            return;
        }
        Err(e) => {
            tracing::error!(error = %e, booking_id, "Failed to load booking for message send");
            state
                .ws_manager
                .send_to_conn(conn_id, Message::Text(error_frame("Send failed").into()))
                .await;
            return;
        }
    };

    let message = match MessageRepo::create(&state.pool, booking_id, user.user_id, body).await {
        Ok(m) => m,
        Err(e) => {
            tracing::error!(error = %e, booking_id, "Failed to persist message");
            state
                .ws_manager
                .send_to_conn(conn_id, Message::Text(error_frame("Send failed").into()))
                .await;
            return;
        }
    };

    // Broadcast the persisted message to everyone in the booking room.
    let frame = server_frame(ServerEvent::NewMessage, json!(&message));
    state
        .ws_manager
        .broadcast_to_booking(booking_id, Message::Text(frame.into()))
        .await;

    // Notify the counterparty off the broadcast path. Publishing never
    // blocks; the dispatcher owns delivery from here.
    let counterparty = if user.user_id == booking.customer_id {
        booking.provider_id
    } else {
        booking.customer_id
    };
    state.event_bus.publish(
        NotificationEvent::new(
            counterparty,
            NotificationKind::MessageReceived,
            "New message",
            format!("{} sent you a message", user.display_name),
        )
        .with_link(format!("/bookings/{booking_id}"))
        .with_booking(booking_id)
        .with_message(message.id),
    );
}

/// Whether `user_id` is one of the two booking parties.
fn is_party(user_id: DbId, customer_id: DbId, provider_id: DbId) -> bool {
    user_id == customer_id || user_id == provider_id
}
