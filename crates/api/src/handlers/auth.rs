//! Handlers for the `/auth` resource: registration and login.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use servly_core::error::CoreError;
use servly_core::roles::{ROLE_CUSTOMER, ROLE_PROVIDER};
use servly_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/v1/auth/register
///
/// Create a local user record and return it with a fresh access token.
/// Duplicate emails surface as 409 via the `uq_users_email` constraint.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let email = req.email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(CoreError::Validation("Invalid email address".into()).into());
    }

    validate_password_strength(&req.password).map_err(CoreError::Validation)?;

    if req.role != ROLE_CUSTOMER && req.role != ROLE_PROVIDER {
        return Err(CoreError::Validation(format!(
            "Role must be '{ROLE_CUSTOMER}' or '{ROLE_PROVIDER}'"
        ))
        .into());
    }

    let display_name = req.display_name.trim();
    if display_name.is_empty() {
        return Err(CoreError::Validation("Display name cannot be empty".into()).into());
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(&state.pool, &email, &password_hash, display_name, &req.role)
        .await?;

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "data": { "user": user, "token": token } })),
    ))
}

/// POST /api/v1/auth/login
///
/// Verify credentials and return the user with a fresh access token.
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let email = req.email.trim().to_lowercase();

    let user = UserRepo::get_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("Invalid email or password".into()))?;

    let verified = verify_password(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !verified {
        return Err(CoreError::Unauthorized("Invalid email or password".into()).into());
    }

    if !user.is_active {
        return Err(CoreError::Forbidden("Account is deactivated".into()).into());
    }

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(json!({ "data": { "user": user, "token": token } })))
}
