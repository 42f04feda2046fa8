//! Order Handlers
//!
//! Thin HTTP layer over [`crate::orders::OrdersManager`]; ownership and
//! lifecycle rules
//! live in the manager, the requester identity always comes from the token.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::{ApiResponse, OrderView};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppResult, ok, ok_with_message};

use shared::client::{CompoundOrderRequest, OrderIdResponse, PlaceOrderRequest};

/// POST /api/orders - place a simple order for the authenticated account
pub async fn place(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<PlaceOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderIdResponse>>> {
    let order = state.orders().place_simple(&user.username, &req.product_ids)?;
    Ok(ok_with_message(
        OrderIdResponse { order_id: order.id },
        "Order placed successfully",
    ))
}

/// GET /api/orders/:id - order detail with its computed total
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
) -> AppResult<Json<OrderView>> {
    let view = state.orders().order_view(id)?;
    Ok(Json(view))
}

/// POST /api/orders/:id/confirm
pub async fn confirm(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<Json<ApiResponse<OrderIdResponse>>> {
    let order = state.orders().confirm_order(id, &user.username)?;
    Ok(ok_with_message(
        OrderIdResponse { order_id: order.id },
        "Order confirmed successfully",
    ))
}

/// DELETE /api/orders/:id - cancel an order
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<u64>,
) -> AppResult<Json<ApiResponse<OrderIdResponse>>> {
    let order = state.orders().cancel_order(id, &user.username)?;
    Ok(ok_with_message(
        OrderIdResponse { order_id: order.id },
        "Order cancelled successfully",
    ))
}

/// POST /api/orders/compound/confirm - aggregate existing simple orders
///
/// Validates every member slot, then creates and confirms the compound
/// order atomically.
pub async fn confirm_compound(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<CompoundOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderIdResponse>>> {
    let order = state.orders().confirm_compound(&req.orders, &user.username)?;
    Ok(ok(OrderIdResponse { order_id: order.id }))
}
