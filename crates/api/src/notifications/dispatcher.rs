//! Event-to-notification delivery engine.
//!
//! [`NotificationDispatcher`] consumes [`NotificationEvent`]s from the bus
//! and delivers each one over three channels, in order:
//!
//! 1. **Ledger** — one `notifications` row per event. This write alone is
//!    what makes an event "dispatched"; if it fails the event is logged
//!    and dropped, never retried inline.
//! 2. **Realtime** — a `new_notification` frame to every live connection
//!    of the recipient. Zero live connections is not an error; the ledger
//!    row is the durable delivery guarantee.
//! 3. **Email** — lowest priority. Recipient lookup, template rendering,
//!    and SMTP hand-off; every failure is logged and swallowed.
//!
//! A failure in any channel never reaches the operation that published the
//! event — that operation already completed and responded.

use std::sync::Arc;

use axum::extract::ws::Message;
use servly_db::repositories::{NotificationRepo, UserRepo};
use servly_db::DbPool;
use servly_events::{EmailDelivery, NotificationEvent};
use tokio::sync::broadcast;

use crate::ws::protocol::{server_frame, ServerEvent};
use crate::ws::WsManager;

/// Delivers notification events to the ledger, WebSocket, and email.
pub struct NotificationDispatcher {
    pool: DbPool,
    ws_manager: Arc<WsManager>,
    /// `None` when email delivery is not configured.
    email: Option<EmailDelivery>,
}

impl NotificationDispatcher {
    /// Create a dispatcher. Pass `email: None` to disable the email channel.
    pub fn new(pool: DbPool, ws_manager: Arc<WsManager>, email: Option<EmailDelivery>) -> Self {
        Self {
            pool,
            ws_manager,
            email,
        }
    }

    /// Run the main delivery loop.
    ///
    /// Subscribes to the event bus via `receiver` and processes each event.
    /// Per-event failures are swallowed so one bad item cannot stall the
    /// queue. The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](servly_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<NotificationEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.dispatch(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification dispatcher lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification dispatcher shutting down");
                    break;
                }
            }
        }
    }

    /// Deliver a single event over all three channels.
    async fn dispatch(&self, event: &NotificationEvent) {
        // 1. Ledger write-through. Without this row the event never
        //    happened; skip the other channels.
        let notification = match NotificationRepo::create(
            &self.pool,
            event.recipient_user_id,
            event.kind.as_str(),
            &event.title,
            &event.message,
            event.link.as_deref(),
            event.booking_id,
            event.message_id,
        )
        .await
        {
            Ok(n) => n,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    kind = event.kind.as_str(),
                    recipient = event.recipient_user_id,
                    "Failed to write notification ledger entry, dropping event"
                );
                return;
            }
        };

        // 2. Realtime push to the recipient's personal room.
        let frame = server_frame(ServerEvent::NewNotification, &notification);
        let delivered = self
            .ws_manager
            .send_to_user(event.recipient_user_id, Message::Text(frame.into()))
            .await;
        tracing::debug!(
            notification_id = notification.id,
            connections = delivered,
            "Realtime notification push"
        );

        // 3. Best-effort email.
        if let Some(mailer) = &self.email {
            self.deliver_email(mailer, event).await;
        }
    }

    /// Resolve the recipient and hand the rendered email to the transport.
    async fn deliver_email(&self, mailer: &EmailDelivery, event: &NotificationEvent) {
        let user = match UserRepo::get_by_id(&self.pool, event.recipient_user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!(
                    recipient = event.recipient_user_id,
                    "Notification recipient has no user record, skipping email"
                );
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to resolve email recipient");
                return;
            }
        };

        if let Err(e) = mailer
            .deliver(&user.email, &user.display_name, event)
            .await
        {
            tracing::error!(
                error = %e,
                recipient = event.recipient_user_id,
                kind = event.kind.as_str(),
                "Email delivery failed"
            );
        }
    }
}
