//! Repository for the `ratings` table.

use servly_core::types::DbId;
use sqlx::PgPool;

use crate::models::rating::Rating;

/// Column list for `ratings` queries.
const COLUMNS: &str = "id, booking_id, rater_id, ratee_id, stars, comment, created_at";

/// Provides operations for booking ratings.
pub struct RatingRepo;

impl RatingRepo {
    /// Insert a rating for a completed booking.
    ///
    /// Fails with a unique-constraint violation (`uq_ratings_booking`) when
    /// the booking has already been rated.
    pub async fn create(
        pool: &PgPool,
        booking_id: DbId,
        rater_id: DbId,
        ratee_id: DbId,
        stars: i16,
        comment: Option<&str>,
    ) -> Result<Rating, sqlx::Error> {
        let query = format!(
            "INSERT INTO ratings (booking_id, rater_id, ratee_id, stars, comment) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rating>(&query)
            .bind(booking_id)
            .bind(rater_id)
            .bind(ratee_id)
            .bind(stars)
            .bind(comment)
            .fetch_one(pool)
            .await
    }

    /// Fetch the rating for a booking, if any.
    pub async fn get_for_booking(
        pool: &PgPool,
        booking_id: DbId,
    ) -> Result<Option<Rating>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ratings WHERE booking_id = $1");
        sqlx::query_as::<_, Rating>(&query)
            .bind(booking_id)
            .fetch_optional(pool)
            .await
    }
}
