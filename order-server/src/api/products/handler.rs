//! Product Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::AppError;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate};
use crate::utils::AppResult;

/// GET /api/products - list all products
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let products = state.products().find_all()?;
    Ok(Json(products))
}

/// GET /api/products/:id - fetch a single product
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let product = state
        .products()
        .find_by_id(&id)?
        .ok_or_else(|| AppError::not_found(format!("Product '{}' not found", id)))?;
    Ok(Json(product))
}

/// POST /api/products - create a product
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    let product = state.products().create(data)?;
    tracing::info!(product_id = %product.id, name = %product.name, "Product created");
    Ok(Json(product))
}
