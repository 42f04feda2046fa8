//! Request/response types shared between server and client
//!
//! Common DTOs used in API communication. Request bodies that need
//! field-level validation live next to their handlers on the server side.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// User information (never carries credentials)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: String,
    pub display_name: String,
}

// =============================================================================
// Account API DTOs
// =============================================================================

/// Balance adjustment request; `amount` is a signed delta
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceUpdateRequest {
    pub username: String,
    pub amount: Decimal,
}

/// Wallet balance of the authenticated caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub username: String,
    pub current_balance: Decimal,
}

// =============================================================================
// Order API DTOs
// =============================================================================

/// Place a simple order from a list of product ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub product_ids: Vec<String>,
}

/// One member slot of a compound order request
///
/// `username` declares who the referenced order is expected to belong to;
/// the server re-validates ownership per slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundMember {
    pub username: String,
    pub order_id: u64,
}

/// Confirm a compound order built from existing simple orders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundOrderRequest {
    pub orders: Vec<CompoundMember>,
}

/// Id of a created order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderIdResponse {
    pub order_id: u64,
}
