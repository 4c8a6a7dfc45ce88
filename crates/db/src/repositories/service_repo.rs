//! Repository for the `services` table.

use servly_core::types::DbId;
use sqlx::PgPool;

use crate::models::service::Service;

/// Column list for `services` queries.
const COLUMNS: &str = "id, provider_id, title, description, is_active, created_at";

/// Provides CRUD operations for services.
pub struct ServiceRepo;

impl ServiceRepo {
    /// Insert a new service owned by the given provider.
    pub async fn create(
        pool: &PgPool,
        provider_id: DbId,
        title: &str,
        description: &str,
    ) -> Result<Service, sqlx::Error> {
        let query = format!(
            "INSERT INTO services (provider_id, title, description) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(provider_id)
            .bind(title)
            .bind(description)
            .fetch_one(pool)
            .await
    }

    /// Fetch a service by id.
    pub async fn get_by_id(
        pool: &PgPool,
        service_id: DbId,
    ) -> Result<Option<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services WHERE id = $1");
        sqlx::query_as::<_, Service>(&query)
            .bind(service_id)
            .fetch_optional(pool)
            .await
    }

    /// List all active services.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Service>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM services \
             WHERE is_active = true \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Service>(&query).fetch_all(pool).await
    }
}
