//! Repository for the `messages` table.

use servly_core::types::DbId;
use sqlx::PgPool;

use crate::models::message::MessageWithSender;

/// Provides operations for booking chat messages.
pub struct MessageRepo;

impl MessageRepo {
    /// Insert a message and return it joined with the sender's display name.
    ///
    /// Single statement so the broadcast payload needs no second round trip.
    pub async fn create(
        pool: &PgPool,
        booking_id: DbId,
        sender_id: DbId,
        body: &str,
    ) -> Result<MessageWithSender, sqlx::Error> {
        sqlx::query_as::<_, MessageWithSender>(
            "WITH inserted AS (\
                 INSERT INTO messages (booking_id, sender_id, body) \
                 VALUES ($1, $2, $3) \
                 RETURNING id, booking_id, sender_id, body, kind, created_at\
             ) \
             SELECT i.id, i.booking_id, i.sender_id, i.body, i.kind, i.created_at, \
                    u.display_name AS sender_name \
             FROM inserted i \
             JOIN users u ON u.id = i.sender_id",
        )
        .bind(booking_id)
        .bind(sender_id)
        .bind(body)
        .fetch_one(pool)
        .await
    }

    /// List a booking's messages, oldest first.
    pub async fn list_for_booking(
        pool: &PgPool,
        booking_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MessageWithSender>, sqlx::Error> {
        sqlx::query_as::<_, MessageWithSender>(
            "SELECT m.id, m.booking_id, m.sender_id, m.body, m.kind, m.created_at, \
                    u.display_name AS sender_name \
             FROM messages m \
             JOIN users u ON u.id = m.sender_id \
             WHERE m.booking_id = $1 \
             ORDER BY m.created_at ASC \
             LIMIT $2 OFFSET $3",
        )
        .bind(booking_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }
}
