//! Servly notification event infrastructure.
//!
//! This crate provides the building blocks for the booking notification
//! fan-out:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`NotificationEvent`] — the canonical notification event envelope.
//! - [`NotificationKind`] — the closed set of notification kinds.
//! - [`delivery`] — the best-effort email channel and its per-kind
//!   templates.

pub mod bus;
pub mod delivery;

pub use bus::{EventBus, NotificationEvent, NotificationKind};
pub use delivery::email::{EmailConfig, EmailDelivery};
