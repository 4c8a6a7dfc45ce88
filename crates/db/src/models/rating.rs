//! Rating entity model and DTOs.

use serde::{Deserialize, Serialize};
use servly_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `ratings` table. One rating per booking.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rating {
    pub id: DbId,
    pub booking_id: DbId,
    pub rater_id: DbId,
    pub ratee_id: DbId,
    pub stars: i16,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for submitting a rating.
#[derive(Debug, Deserialize)]
pub struct CreateRating {
    pub stars: i16,
    pub comment: Option<String>,
}
