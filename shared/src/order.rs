//! Order record types
//!
//! The order is a tagged union over two variants:
//! - `Simple` - backed directly by a list of product lines
//! - `Compound` - aggregates existing simple orders (by id, not by copy)
//!
//! A compound order's total is never stored; it is recomputed from its
//! members whenever the order is read, so it cannot drift.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// Transitions only move forward out of `Pending`. `Confirmed` and
/// `Cancelled` are both terminal: attempting either transition from a
/// terminal state fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Confirmed | OrderStatus::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", s)
    }
}

/// One product line of a simple order
///
/// Snapshots the product name and price at placement time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: String,
    pub name: String,
    pub price: Decimal,
}

/// Variant-specific payload of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderDetail {
    /// Product lines, ordered as submitted
    Simple { lines: Vec<OrderLine> },
    /// Ids of the aggregated simple orders
    Compound { members: Vec<u64> },
}

/// Stored order record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order id (assigned by the store on creation)
    pub id: u64,
    /// Owning account username (immutable after creation)
    pub owner: String,
    /// Lifecycle status
    pub status: OrderStatus,
    /// Variant payload
    #[serde(flatten)]
    pub detail: OrderDetail,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Sum of the product lines for a simple order; `None` for compounds,
    /// whose total is only derivable from their members.
    pub fn line_total(&self) -> Option<Decimal> {
        match &self.detail {
            OrderDetail::Simple { lines } => Some(lines.iter().map(|l| l.price).sum()),
            OrderDetail::Compound { .. } => None,
        }
    }

    /// Whether this is a compound order
    pub fn is_compound(&self) -> bool {
        matches!(self.detail, OrderDetail::Compound { .. })
    }
}

/// Order as served to clients: the record plus its computed total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    pub id: u64,
    pub owner: String,
    pub status: OrderStatus,
    /// Total price; for compounds this is recomputed from the members
    pub total: Decimal,
    #[serde(flatten)]
    pub detail: OrderDetail,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Confirmed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn simple_line_total() {
        let order = Order {
            id: 1,
            owner: "alice".to_string(),
            status: OrderStatus::Pending,
            detail: OrderDetail::Simple {
                lines: vec![
                    OrderLine {
                        product_id: "p1".to_string(),
                        name: "Coffee".to_string(),
                        price: Decimal::new(1000, 2),
                    },
                    OrderLine {
                        product_id: "p2".to_string(),
                        name: "Cake".to_string(),
                        price: Decimal::new(1550, 2),
                    },
                ],
            },
            created_at: Utc::now(),
        };
        assert_eq!(order.line_total(), Some(Decimal::new(2550, 2)));
    }

    #[test]
    fn compound_has_no_stored_total() {
        let order = Order {
            id: 2,
            owner: "bob".to_string(),
            status: OrderStatus::Pending,
            detail: OrderDetail::Compound {
                members: vec![1, 3],
            },
            created_at: Utc::now(),
        };
        assert_eq!(order.line_total(), None);
        assert!(order.is_compound());
    }

    #[test]
    fn order_roundtrip_keeps_variant() {
        let order = Order {
            id: 7,
            owner: "alice".to_string(),
            status: OrderStatus::Confirmed,
            detail: OrderDetail::Compound {
                members: vec![1, 2],
            },
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&order).unwrap();
        assert!(json.contains("\"kind\":\"compound\""));
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);
    }
}
