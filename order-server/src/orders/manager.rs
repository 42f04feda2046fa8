//! OrdersManager - order lifecycle core
//!
//! Every mutation follows the same flow:
//!
//! ```text
//! place / confirm / cancel / confirm_compound
//!     ├─ 1. Resolve collaborators (accounts, catalog)
//!     ├─ 2. Begin write transaction
//!     ├─ 3. Load and validate (not found / conflict / ownership)
//!     ├─ 4. Apply the transition
//!     ├─ 5. Commit
//!     └─ 6. Return the updated order
//! ```
//!
//! A validation failure drops the transaction, so nothing is persisted
//! unless every check passed. redb admits one write transaction at a time;
//! of two concurrent transitions on the same order, the first commit wins
//! and the second observes the committed status and fails with a conflict.
//!
//! Check ordering is part of the API contract: for confirm and cancel the
//! terminal-state check precedes the ownership check, so a non-owner
//! hitting an already-confirmed order sees the conflict, not a 403. For
//! compound members the per-slot ownership check precedes the member's
//! already-confirmed check.

use chrono::Utc;
use redb::ReadableTable;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::db::repository::{AccountRepository, ProductRepository, RepoError};
use crate::db::{ORDERS_TABLE, Store, StoreError, decode, encode};
use crate::utils::AppError;
use shared::client::CompoundMember;
use shared::{Order, OrderDetail, OrderLine, OrderStatus, OrderView};

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order {0} not found")]
    OrderNotFound(u64),

    #[error("Account '{0}' not found")]
    AccountNotFound(String),

    #[error("Order {0} is already confirmed")]
    AlreadyConfirmed(u64),

    #[error("Order {0} is already cancelled")]
    AlreadyCancelled(u64),

    #[error("Not authorized to {action} order {id}")]
    NotOwner { id: u64, action: &'static str },

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::OrderNotFound(id) => {
                AppError::NotFound(format!("Order {} not found", id))
            }
            OrderError::AccountNotFound(username) => {
                AppError::NotFound(format!("Account '{}' not found", username))
            }
            OrderError::AlreadyConfirmed(_) => {
                AppError::Conflict("Order is already confirmed".to_string())
            }
            OrderError::AlreadyCancelled(_) => {
                AppError::Conflict("Order is already cancelled".to_string())
            }
            OrderError::NotOwner { action, .. } => AppError::Forbidden(format!(
                "You are not authorized to {} this order",
                action
            )),
            OrderError::Validation(msg) => AppError::Validation(msg),
            OrderError::Repo(e) => e.into(),
            OrderError::Storage(e) => AppError::Database(e.to_string()),
        }
    }
}

impl From<redb::TransactionError> for OrderError {
    fn from(e: redb::TransactionError) -> Self {
        OrderError::Storage(e.into())
    }
}

impl From<redb::TableError> for OrderError {
    fn from(e: redb::TableError) -> Self {
        OrderError::Storage(e.into())
    }
}

impl From<redb::StorageError> for OrderError {
    fn from(e: redb::StorageError) -> Self {
        OrderError::Storage(e.into())
    }
}

impl From<redb::CommitError> for OrderError {
    fn from(e: redb::CommitError) -> Self {
        OrderError::Storage(e.into())
    }
}

type OrderResult<T> = Result<T, OrderError>;

/// Load an order inside the caller's transaction
fn load_order(
    table: &impl ReadableTable<u64, &'static [u8]>,
    id: u64,
) -> OrderResult<Order> {
    match table.get(id)? {
        Some(guard) => Ok(decode(guard.value())?),
        None => Err(OrderError::OrderNotFound(id)),
    }
}

/// Order lifecycle manager
#[derive(Clone)]
pub struct OrdersManager {
    store: Store,
}

impl OrdersManager {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn accounts(&self) -> AccountRepository {
        AccountRepository::new(self.store.clone())
    }

    fn products(&self) -> ProductRepository {
        ProductRepository::new(self.store.clone())
    }

    /// Place a simple order for `owner`
    ///
    /// All product ids are resolved against the catalog first; an unknown
    /// id fails the whole request and no order is created. Prices are
    /// snapshotted into the order lines at this point.
    pub fn place_simple(&self, owner: &str, product_ids: &[String]) -> OrderResult<Order> {
        if product_ids.is_empty() {
            return Err(OrderError::Validation(
                "Order must contain at least one product".to_string(),
            ));
        }
        if self.accounts().find_by_username(owner)?.is_none() {
            return Err(OrderError::AccountNotFound(owner.to_string()));
        }

        let products = self.products().find_by_ids(product_ids)?;
        let lines = products
            .into_iter()
            .map(|p| OrderLine {
                product_id: p.id,
                name: p.name,
                price: p.price,
            })
            .collect();

        let txn = self.store.begin_write()?;
        let order = {
            let id = Store::next_order_id(&txn)?;
            let order = Order {
                id,
                owner: owner.to_string(),
                status: OrderStatus::Pending,
                detail: OrderDetail::Simple { lines },
                created_at: Utc::now(),
            };
            let mut table = txn.open_table(ORDERS_TABLE)?;
            table.insert(id, encode(&order)?.as_slice())?;
            order
        };
        txn.commit()?;

        tracing::info!(order_id = order.id, owner = %order.owner, "simple order placed");
        Ok(order)
    }

    /// Load an order by id
    pub fn get_order(&self, id: u64) -> OrderResult<Order> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(ORDERS_TABLE)?;
        load_order(&table, id)
    }

    /// Load an order with its total computed from one read snapshot
    ///
    /// A compound total is always recomputed from the member orders, never
    /// read from a stored field.
    pub fn order_view(&self, id: u64) -> OrderResult<OrderView> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(ORDERS_TABLE)?;
        let order = load_order(&table, id)?;

        let total = match &order.detail {
            OrderDetail::Simple { lines } => lines.iter().map(|l| l.price).sum(),
            OrderDetail::Compound { members } => {
                let mut sum = Decimal::ZERO;
                for member_id in members {
                    let member = load_order(&table, *member_id)?;
                    sum += member.line_total().unwrap_or(Decimal::ZERO);
                }
                sum
            }
        };

        Ok(OrderView {
            id: order.id,
            owner: order.owner,
            status: order.status,
            total,
            detail: order.detail,
            created_at: order.created_at,
        })
    }

    /// Confirm an order
    ///
    /// Check order (contract, do not reorder): unknown id, terminal state,
    /// then ownership. Success moves Pending → Confirmed.
    pub fn confirm_order(&self, id: u64, requester: &str) -> OrderResult<Order> {
        let txn = self.store.begin_write()?;
        let order = {
            let mut table = txn.open_table(ORDERS_TABLE)?;
            let mut order = load_order(&table, id)?;

            match order.status {
                OrderStatus::Confirmed => return Err(OrderError::AlreadyConfirmed(id)),
                OrderStatus::Cancelled => return Err(OrderError::AlreadyCancelled(id)),
                OrderStatus::Pending => {}
            }
            if order.owner != requester {
                return Err(OrderError::NotOwner {
                    id,
                    action: "confirm",
                });
            }

            order.status = OrderStatus::Confirmed;
            table.insert(id, encode(&order)?.as_slice())?;
            order
        };
        txn.commit()?;

        tracing::info!(order_id = id, requester = %requester, "order confirmed");
        Ok(order)
    }

    /// Cancel an order
    ///
    /// Pending and Confirmed orders can both be cancelled; an already
    /// cancelled order cannot. Same check order as confirm.
    pub fn cancel_order(&self, id: u64, requester: &str) -> OrderResult<Order> {
        let txn = self.store.begin_write()?;
        let order = {
            let mut table = txn.open_table(ORDERS_TABLE)?;
            let mut order = load_order(&table, id)?;

            if order.status == OrderStatus::Cancelled {
                return Err(OrderError::AlreadyCancelled(id));
            }
            if order.owner != requester {
                return Err(OrderError::NotOwner {
                    id,
                    action: "cancel",
                });
            }

            match &order.detail {
                OrderDetail::Simple { .. } => {}
                OrderDetail::Compound { .. } => {
                    // Member orders keep their own status: cancelling a
                    // compound does not cascade.
                }
            }

            order.status = OrderStatus::Cancelled;
            table.insert(id, encode(&order)?.as_slice())?;
            order
        };
        txn.commit()?;

        tracing::info!(order_id = id, requester = %requester, "order cancelled");
        Ok(order)
    }

    /// Build and confirm a compound order from existing simple orders
    ///
    /// Each member slot declares the username its order is expected to
    /// belong to; ownership is re-validated per slot, independently of the
    /// requester's own identity. A member that is already confirmed fails
    /// the whole request. On success the new compound order is owned by
    /// the requester and persisted already confirmed; member orders keep
    /// their own status.
    pub fn confirm_compound(
        &self,
        members: &[CompoundMember],
        requester: &str,
    ) -> OrderResult<Order> {
        if members.is_empty() {
            return Err(OrderError::Validation(
                "Compound order must reference at least one order".to_string(),
            ));
        }
        if self.accounts().find_by_username(requester)?.is_none() {
            return Err(OrderError::AccountNotFound(requester.to_string()));
        }

        let txn = self.store.begin_write()?;
        let order = {
            let mut table = txn.open_table(ORDERS_TABLE)?;

            let mut member_ids = Vec::with_capacity(members.len());
            for member in members {
                let order = load_order(&table, member.order_id)?;

                if order.is_compound() {
                    return Err(OrderError::Validation(format!(
                        "Order {} is not a simple order",
                        member.order_id
                    )));
                }
                if order.owner != member.username {
                    return Err(OrderError::NotOwner {
                        id: member.order_id,
                        action: "confirm",
                    });
                }
                if order.status == OrderStatus::Confirmed {
                    return Err(OrderError::AlreadyConfirmed(member.order_id));
                }

                member_ids.push(member.order_id);
            }

            let id = Store::next_order_id(&txn)?;
            let mut order = Order {
                id,
                owner: requester.to_string(),
                status: OrderStatus::Pending,
                detail: OrderDetail::Compound {
                    members: member_ids,
                },
                created_at: Utc::now(),
            };
            // Created pending, confirmed within the same transaction
            order.status = OrderStatus::Confirmed;
            table.insert(id, encode(&order)?.as_slice())?;
            order
        };
        txn.commit()?;

        tracing::info!(
            order_id = order.id,
            requester = %requester,
            members = members.len(),
            "compound order confirmed"
        );
        Ok(order)
    }
}
