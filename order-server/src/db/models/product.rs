//! Product Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product entity
///
/// Read-only from the order lifecycle's perspective; prices are snapshotted
/// into order lines at placement time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    /// Explicit id; generated when omitted
    pub id: Option<String>,
    pub name: String,
    pub price: Decimal,
}
