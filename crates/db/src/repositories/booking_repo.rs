//! Repository for the `bookings` table.

use chrono::{DateTime, Utc};
use servly_core::types::DbId;
use sqlx::PgPool;

use crate::models::booking::{Booking, BookingDetail};

/// Column list for `bookings` queries.
const COLUMNS: &str = "id, customer_id, provider_id, service_id, status, description, \
     address, scheduled_for, response_due_at, created_at";

/// Column list for booking-detail queries (aliased to the `bookings` table).
const DETAIL_COLUMNS: &str = "b.id, b.customer_id, b.provider_id, b.service_id, b.status, \
     b.description, b.address, b.scheduled_for, b.response_due_at, b.created_at, \
     s.title AS service_title, \
     cu.display_name AS customer_name, \
     pu.display_name AS provider_name";

/// Joins used by booking-detail queries.
const DETAIL_JOINS: &str = "FROM bookings b \
     JOIN services s ON s.id = b.service_id \
     JOIN users cu ON cu.id = b.customer_id \
     JOIN users pu ON pu.id = b.provider_id";

/// Provides CRUD operations for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Insert a new `pending` booking.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        pool: &PgPool,
        customer_id: DbId,
        provider_id: DbId,
        service_id: DbId,
        description: &str,
        address: &str,
        scheduled_for: Option<DateTime<Utc>>,
        response_due_at: DateTime<Utc>,
    ) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings \
             (customer_id, provider_id, service_id, description, address, scheduled_for, response_due_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(customer_id)
            .bind(provider_id)
            .bind(service_id)
            .bind(description)
            .bind(address)
            .bind(scheduled_for)
            .bind(response_due_at)
            .fetch_one(pool)
            .await
    }

    /// Fetch a booking by id.
    pub async fn get_by_id(
        pool: &PgPool,
        booking_id: DbId,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(booking_id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a booking with service/customer/provider display fields.
    pub async fn get_detail(
        pool: &PgPool,
        booking_id: DbId,
    ) -> Result<Option<BookingDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} {DETAIL_JOINS} WHERE b.id = $1");
        sqlx::query_as::<_, BookingDetail>(&query)
            .bind(booking_id)
            .fetch_optional(pool)
            .await
    }

    /// List all bookings where the user is a party, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BookingDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_JOINS} \
             WHERE b.customer_id = $1 OR b.provider_id = $1 \
             ORDER BY b.created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, BookingDetail>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Apply a status transition with a precondition on the current status.
    ///
    /// The `AND status = $3` clause is what keeps concurrent transitions
    /// honest: whichever update commits second sees a stale precondition and
    /// affects zero rows. Returns `false` in that case so the caller can
    /// reject the move without overwriting.
    pub async fn update_status_checked(
        pool: &PgPool,
        booking_id: DbId,
        from_status: &str,
        to_status: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE bookings SET status = $1 \
             WHERE id = $2 AND status = $3",
        )
        .bind(to_status)
        .bind(booking_id)
        .bind(from_status)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
