//! Handlers for the `/services` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use servly_core::error::CoreError;
use servly_core::roles::ROLE_PROVIDER;
use servly_core::types::DbId;
use servly_db::models::service::CreateService;
use servly_db::repositories::ServiceRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/services
///
/// List all active services.
pub async fn list_services(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let services = ServiceRepo::list_active(&state.pool).await?;
    Ok(Json(json!({ "data": services })))
}

/// GET /api/v1/services/{id}
pub async fn get_service(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(service_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let service = ServiceRepo::get_by_id(&state.pool, service_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Service",
            id: service_id,
        })?;
    Ok(Json(json!({ "data": service })))
}

/// POST /api/v1/services
///
/// Create a service owned by the authenticated provider.
pub async fn create_service(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(dto): Json<CreateService>,
) -> AppResult<impl IntoResponse> {
    if auth.role != ROLE_PROVIDER {
        return Err(CoreError::Forbidden("Only providers can create services".into()).into());
    }

    let title = dto.title.trim();
    if title.is_empty() {
        return Err(CoreError::Validation("Service title cannot be empty".into()).into());
    }

    let service = ServiceRepo::create(&state.pool, auth.user_id, title, &dto.description).await?;

    tracing::info!(service_id = service.id, provider_id = auth.user_id, "Service created");

    Ok((StatusCode::CREATED, Json(json!({ "data": service }))))
}
