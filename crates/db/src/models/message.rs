//! Chat message entity models.

use serde::Serialize;
use servly_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `messages` table. Immutable after creation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub booking_id: DbId,
    pub sender_id: DbId,
    pub body: String,
    pub kind: String,
    pub created_at: Timestamp,
}

/// A message joined with the sender's display name, as broadcast to
/// booking rooms and returned by the listing endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MessageWithSender {
    pub id: DbId,
    pub booking_id: DbId,
    pub sender_id: DbId,
    pub body: String,
    pub kind: String,
    pub created_at: Timestamp,
    pub sender_name: String,
}
