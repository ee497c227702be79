//! Authentication handlers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::SharedState;
use crate::error::{AppError, Result};
use crate::models::user::{Role, UserDescriptor};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    /// Defaults to `student`
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserDescriptor,
}

/// Login with credentials
pub async fn login(
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let auth_service = state.create_auth_service();
    let user = auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(AuthResponse { user }))
}

/// Create a student account
pub async fn signup(
    State(state): State<SharedState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<AuthResponse>> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let auth_service = state.create_auth_service();
    let user = auth_service
        .signup(
            &payload.username,
            &payload.password,
            payload.role.unwrap_or(Role::Student),
        )
        .await?;

    Ok(Json(AuthResponse { user }))
}
