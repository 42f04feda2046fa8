//! Order Routes

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::place))
        .route("/{id}", get(handler::get_by_id).delete(handler::cancel))
        .route("/{id}/confirm", post(handler::confirm))
        .route("/compound/confirm", post(handler::confirm_compound))
}
