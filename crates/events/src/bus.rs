//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the hand-off point between the request path and the
//! notification dispatcher: handlers publish a [`NotificationEvent`] after
//! their own persistence has committed and return immediately; the
//! dispatcher task consumes the channel and performs delivery. Publishing
//! never blocks and never fails the publishing operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use servly_core::types::DbId;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// NotificationKind
// ---------------------------------------------------------------------------

/// The closed set of notification kinds.
///
/// Adding a kind here forces the email template mapping (and any other
/// exhaustive match) to be extended at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BookingCreated,
    BookingAccepted,
    BookingDeclined,
    BookingCompleted,
    BookingCancelled,
    MessageReceived,
    RatingReceived,
}

impl NotificationKind {
    /// The database/wire representation of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::BookingCreated => "booking_created",
            NotificationKind::BookingAccepted => "booking_accepted",
            NotificationKind::BookingDeclined => "booking_declined",
            NotificationKind::BookingCompleted => "booking_completed",
            NotificationKind::BookingCancelled => "booking_cancelled",
            NotificationKind::MessageReceived => "message_received",
            NotificationKind::RatingReceived => "rating_received",
        }
    }
}

// ---------------------------------------------------------------------------
// NotificationEvent
// ---------------------------------------------------------------------------

/// A notification event addressed to exactly one recipient.
///
/// Constructed via [`NotificationEvent::new`] and enriched with the builder
/// methods [`with_link`](NotificationEvent::with_link),
/// [`with_booking`](NotificationEvent::with_booking), and
/// [`with_message`](NotificationEvent::with_message).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// The user this notification is for (always the counterparty of the
    /// user whose action triggered it).
    pub recipient_user_id: DbId,

    /// What happened.
    pub kind: NotificationKind,

    /// Short human-readable title.
    pub title: String,

    /// Longer human-readable message.
    pub message: String,

    /// Optional client-side link target (e.g. `/bookings/42`).
    pub link: Option<String>,

    /// The booking this event relates to, if any.
    pub booking_id: Option<DbId>,

    /// The chat message this event relates to, if any.
    pub message_id: Option<DbId>,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl NotificationEvent {
    /// Create a new event with the required fields.
    ///
    /// All optional fields default to `None`.
    pub fn new(
        recipient_user_id: DbId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            recipient_user_id,
            kind,
            title: title.into(),
            message: message.into(),
            link: None,
            booking_id: None,
            message_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach a client-side link target.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Attach the related booking.
    pub fn with_booking(mut self, booking_id: DbId) -> Self {
        self.booking_id = Some(booking_id);
        self
    }

    /// Attach the related chat message.
    pub fn with_message(mut self, message_id: DbId) -> Self {
        self.message_id = Some(message_id);
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`NotificationEvent`]. Designed
/// to be shared via `Arc<EventBus>` across the application.
pub struct EventBus {
    sender: broadcast::Sender<NotificationEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: NotificationEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let event = NotificationEvent::new(
            7,
            NotificationKind::BookingAccepted,
            "Booking accepted",
            "Your booking was accepted",
        )
        .with_booking(42)
        .with_link("/bookings/42");

        bus.publish(event);

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.recipient_user_id, 7);
        assert_eq!(received.kind, NotificationKind::BookingAccepted);
        assert_eq!(received.booking_id, Some(42));
        assert_eq!(received.link.as_deref(), Some("/bookings/42"));
        assert_eq!(received.message_id, None);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(NotificationEvent::new(
            1,
            NotificationKind::MessageReceived,
            "New message",
            "You have a new message",
        ));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.kind, NotificationKind::MessageReceived);
        assert_eq!(e2.kind, NotificationKind::MessageReceived);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        // No subscribers — this must not panic.
        bus.publish(NotificationEvent::new(
            1,
            NotificationKind::BookingCreated,
            "New booking",
            "A booking was created",
        ));
    }

    #[test]
    fn kind_serializes_as_snake_case() {
        let json = serde_json::to_string(&NotificationKind::BookingCancelled).unwrap();
        assert_eq!(json, "\"booking_cancelled\"");
        assert_eq!(NotificationKind::RatingReceived.as_str(), "rating_received");
    }
}
