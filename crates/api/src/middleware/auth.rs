//! Access-control guard: bearer token to `(user_id, role)` resolution.
//!
//! Token validity and local provisioning are distinct failures: an
//! invalid or expired token is `Unauthorized`, while a valid token whose
//! subject has no `users` row is `NotFound` — the client needs to know
//! whether to log in again or to finish registration.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use servly_core::error::CoreError;
use servly_core::types::DbId;
use servly_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from a JWT Bearer token.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id.
    pub user_id: DbId,
    /// The user's role name (`"customer"` or `"provider"`).
    pub role: String,
    /// The user's display name (denormalized into realtime payloads).
    pub display_name: String,
}

/// Resolve a bearer token to an authenticated user.
///
/// Shared by the HTTP extractor and the WebSocket handshake. Resolution
/// happens once per request/connection.
pub async fn resolve_user(token: &str, state: &AppState) -> Result<AuthUser, AppError> {
    let claims = validate_token(token, &state.config.jwt)
        .map_err(|_| CoreError::Unauthorized("Invalid or expired token".into()))?;

    // The token is valid upstream; the subject must also be provisioned
    // locally before it can act.
    let user = UserRepo::get_by_id(&state.pool, claims.sub)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: claims.sub,
        })?;

    if !user.is_active {
        return Err(CoreError::Forbidden("Account is deactivated".into()).into());
    }

    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
        display_name: user.display_name,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        resolve_user(token, state).await
    }
}
