//! Notification dispatch infrastructure.
//!
//! The [`NotificationDispatcher`] subscribes to the event bus and fans each
//! event out to the ledger, the recipient's live WebSocket connections, and
//! best-effort email.

pub mod dispatcher;

pub use dispatcher::NotificationDispatcher;
