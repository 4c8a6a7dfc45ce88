//! Notification ledger entity model.

use serde::Serialize;
use servly_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `notifications` table.
///
/// One row per dispatched event per recipient; only the owning user's
/// read-state toggles ever mutate it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub booking_id: Option<DbId>,
    pub message_id: Option<DbId>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
