//! Account Handlers

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::ApiResponse;
use validator::Validate;

use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Account;
use crate::utils::{AppResult, ok, ok_with_message};

use shared::client::{BalanceResponse, BalanceUpdateRequest, UserInfo};

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Defaults to the username when omitted
    pub display_name: Option<String>,
    /// Opening wallet balance, defaults to zero
    pub wallet_balance: Option<Decimal>,
}

/// POST /api/accounts/register - create a new account
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<UserInfo>>> {
    req.validate()?;

    let balance = req.wallet_balance.unwrap_or(Decimal::ZERO);
    if balance < Decimal::ZERO {
        return Err(AppError::validation("Wallet balance cannot be negative"));
    }

    let display_name = req.display_name.unwrap_or_else(|| req.username.clone());
    let account = Account::new(&req.username, &display_name, &req.password, balance)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let created = state.accounts().create(account)?;

    tracing::info!(username = %created.username, "Account registered");

    Ok(ok_with_message(
        UserInfo {
            username: created.username,
            display_name: created.display_name,
        },
        "Account registered successfully",
    ))
}

/// PUT /api/accounts/balance - apply a signed delta to a wallet
///
/// The target account comes from the request body, not the token. The
/// adjustment is rejected when the account is missing or the balance
/// would go negative, with no distinction between the two causes.
pub async fn update_balance(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Json(req): Json<BalanceUpdateRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let updated = state.accounts().update_balance(&req.username, req.amount)?;

    if !updated {
        return Err(AppError::invalid("Failed to update balance"));
    }

    tracing::info!(username = %req.username, amount = %req.amount, "Balance updated");

    Ok(ok_with_message((), "Balance updated successfully"))
}

/// GET /api/accounts/balance - wallet balance of the authenticated caller
///
/// Always scoped to the token identity; there is no way to read another
/// account's balance.
pub async fn get_balance(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<BalanceResponse>>> {
    let account = state
        .accounts()
        .find_by_username(&user.username)?
        .ok_or_else(|| AppError::not_found(format!("Account '{}' not found", user.username)))?;

    Ok(ok(BalanceResponse {
        username: account.username,
        current_balance: account.wallet_balance,
    }))
}
