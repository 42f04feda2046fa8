//! Authentication Handlers

use axum::{Json, extract::State};

use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;

use shared::client::{LoginRequest, LoginResponse, UserInfo};

/// Login handler
///
/// Authenticates account credentials and returns a JWT token.
/// Unknown username and wrong password produce the same error message
/// to prevent username enumeration.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let account = match state.accounts().find_by_username(&req.username)? {
        Some(account) => account,
        None => {
            tracing::warn!(username = %req.username, "Login failed - account not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let password_valid = account
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

    if !password_valid {
        tracing::warn!(username = %req.username, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service
        .generate_token(&account.username, &account.display_name)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(username = %account.username, "User logged in successfully");

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            username: account.username,
            display_name: account.display_name,
        },
    }))
}

/// Get current user info from the bearer token
pub async fn me(user: CurrentUser) -> Json<UserInfo> {
    Json(UserInfo {
        username: user.username,
        display_name: user.display_name,
    })
}
