//! Email subject/body templates, one per notification kind.
//!
//! The mapping is an exhaustive match on [`NotificationKind`] so a new
//! kind cannot be added without also deciding its email content.

use crate::bus::{NotificationEvent, NotificationKind};

/// A rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

/// Render the email for an event, addressed to `recipient_name`.
pub fn render(event: &NotificationEvent, recipient_name: &str) -> RenderedEmail {
    let subject = match event.kind {
        NotificationKind::BookingCreated => "New booking request",
        NotificationKind::BookingAccepted => "Your booking was accepted",
        NotificationKind::BookingDeclined => "Your booking was declined",
        NotificationKind::BookingCompleted => "Your booking is complete",
        NotificationKind::BookingCancelled => "A booking was cancelled",
        NotificationKind::MessageReceived => "New message on your booking",
        NotificationKind::RatingReceived => "You received a new rating",
    };

    let mut body = format!("Hi {recipient_name},\n\n{}\n", event.message);
    if let Some(link) = &event.link {
        body.push_str(&format!("\nView it here: {link}\n"));
    }
    body.push_str("\n— The Servly team\n");

    RenderedEmail {
        subject: format!("[Servly] {subject}"),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::NotificationEvent;

    fn event(kind: NotificationKind) -> NotificationEvent {
        NotificationEvent::new(1, kind, "title", "Something happened on booking 42.")
    }

    #[test]
    fn every_kind_renders_a_distinct_subject() {
        let kinds = [
            NotificationKind::BookingCreated,
            NotificationKind::BookingAccepted,
            NotificationKind::BookingDeclined,
            NotificationKind::BookingCompleted,
            NotificationKind::BookingCancelled,
            NotificationKind::MessageReceived,
            NotificationKind::RatingReceived,
        ];

        let mut subjects: Vec<String> = kinds
            .iter()
            .map(|k| render(&event(*k), "Ada").subject)
            .collect();
        subjects.sort();
        subjects.dedup();
        assert_eq!(subjects.len(), kinds.len(), "subjects must be unique");
    }

    #[test]
    fn body_contains_recipient_and_message() {
        let rendered = render(&event(NotificationKind::BookingAccepted), "Ada");
        assert!(rendered.body.contains("Hi Ada,"));
        assert!(rendered.body.contains("Something happened on booking 42."));
        assert!(rendered.subject.starts_with("[Servly] "));
    }

    #[test]
    fn link_is_included_when_present() {
        let with_link = event(NotificationKind::MessageReceived).with_link("/bookings/42");
        let rendered = render(&with_link, "Ada");
        assert!(rendered.body.contains("/bookings/42"));

        let without = render(&event(NotificationKind::MessageReceived), "Ada");
        assert!(!without.body.contains("View it here"));
    }
}
