//! Service entity model and DTOs.

use serde::{Deserialize, Serialize};
use servly_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `services` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Service {
    pub id: DbId,
    pub provider_id: DbId,
    pub title: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a service.
#[derive(Debug, Deserialize)]
pub struct CreateService {
    pub title: String,
    #[serde(default)]
    pub description: String,
}
