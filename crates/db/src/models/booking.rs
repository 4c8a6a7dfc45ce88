//! Booking entity models and DTOs.

use serde::{Deserialize, Serialize};
use servly_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `bookings` table.
///
/// `status` holds one of the `BookingStatus` text values; transitions go
/// through the state machine in `servly_core::booking` only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub customer_id: DbId,
    pub provider_id: DbId,
    pub service_id: DbId,
    pub status: String,
    pub description: String,
    pub address: String,
    pub scheduled_for: Option<Timestamp>,
    pub response_due_at: Timestamp,
    pub created_at: Timestamp,
}

/// A booking joined with the display fields clients render alongside it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingDetail {
    pub id: DbId,
    pub customer_id: DbId,
    pub provider_id: DbId,
    pub service_id: DbId,
    pub status: String,
    pub description: String,
    pub address: String,
    pub scheduled_for: Option<Timestamp>,
    pub response_due_at: Timestamp,
    pub created_at: Timestamp,
    pub service_title: String,
    pub customer_name: String,
    pub provider_name: String,
}

/// DTO for creating a booking.
#[derive(Debug, Deserialize)]
pub struct CreateBooking {
    pub service_id: DbId,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    pub scheduled_for: Option<Timestamp>,
}
