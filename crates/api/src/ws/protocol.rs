//! JSON protocol spoken over the WebSocket connection.
//!
//! Client frames are tagged by an `event` field; server frames use the
//! same shape with a `data` payload. Unknown client events fail to parse
//! and are answered with an `error` frame.

use serde::{Deserialize, Serialize};
use serde_json::json;
use servly_core::types::DbId;

/// Client-originated events.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Join the room for one booking (requires being a party to it).
    JoinBooking { booking_id: DbId },
    /// Leave a booking room.
    LeaveBooking { booking_id: DbId },
    /// Send a chat message into a booking room.
    SendMessage { booking_id: DbId, body: String },
}

/// Server-originated event names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerEvent {
    NewMessage,
    NewNotification,
    Error,
}

/// Build a server frame: `{"event": ..., "data": ...}`.
pub fn server_frame(event: ServerEvent, data: impl Serialize) -> String {
    json!({ "event": event, "data": data }).to_string()
}

/// Build an `error` frame with a human-readable message.
pub fn error_frame(message: &str) -> String {
    server_frame(ServerEvent::Error, json!({ "message": message }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_join_booking() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event": "join_booking", "booking_id": 7}"#).unwrap();
        assert_eq!(event, ClientEvent::JoinBooking { booking_id: 7 });
    }

    #[test]
    fn parses_send_message() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event": "send_message", "booking_id": 7, "body": "hi"}"#)
                .unwrap();
        assert_eq!(
            event,
            ClientEvent::SendMessage {
                booking_id: 7,
                body: "hi".to_string()
            }
        );
    }

    #[test]
    fn unknown_event_fails_to_parse() {
        let result: Result<ClientEvent, _> =
            serde_json::from_str(r#"{"event": "drop_tables", "booking_id": 7}"#);
        assert!(result.is_err());
    }

    #[test]
    fn server_frame_shape() {
        let frame = server_frame(ServerEvent::NewNotification, json!({ "id": 1 }));
        let parsed: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(parsed["event"], "new_notification");
        assert_eq!(parsed["data"]["id"], 1);
    }

    #[test]
    fn error_frame_carries_message() {
        let frame = error_frame("Message body cannot be empty");
        let parsed: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(parsed["event"], "error");
        assert_eq!(parsed["data"]["message"], "Message body cannot be empty");
    }
}
