//! Account Routes

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Build account router
/// - /api/accounts/register: public (no auth required)
/// - /api/accounts/balance: protected
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/accounts/register", post(handler::register))
        .route(
            "/api/accounts/balance",
            get(handler::get_balance).put(handler::update_balance),
        )
}
