//! Best-effort email delivery for notification events.
//!
//! Email is the lowest-priority channel: the ledger row is the durable
//! delivery guarantee and the WebSocket push is the latency optimization.
//! Everything in this module is allowed to fail without consequence beyond
//! a log line.

pub mod email;
pub mod templates;
