//! Database module
//!
//! redb-backed embedded store. Values are JSON-serialized records keyed by
//! their natural identifier.
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `accounts` | username | `Account` | Registered accounts |
//! | `products` | product id | `Product` | Product catalog |
//! | `orders` | order id (u64) | `Order` | Simple and compound orders |
//! | `sequences` | name | `u64` | Order id counter |
//!
//! # Concurrency
//!
//! redb admits one write transaction at a time. Every order mutation loads,
//! validates and stores inside a single write transaction, so concurrent
//! transitions on the same order serialize: the first commit wins and later
//! ones observe the new status.

pub mod models;
pub mod repository;

use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Accounts: key = username, value = JSON-serialized Account
pub const ACCOUNTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("accounts");

/// Product catalog: key = product id, value = JSON-serialized Product
pub const PRODUCTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("products");

/// Orders: key = order id, value = JSON-serialized Order
pub const ORDERS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("orders");

/// Sequence counters: key = counter name, value = last assigned value
pub const SEQUENCES_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequences");

const ORDER_SEQ_KEY: &str = "order_seq";

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Embedded store — owns the redb database handle
///
/// Cloning is cheap (`Arc`); repositories and the orders manager share one
/// handle and open their own transactions.
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
}

impl Store {
    /// Open (or create) the store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init_tables(&db)?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory store (tests)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init_tables(&db)?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Ensure all tables exist so read transactions never miss them
    fn init_tables(db: &Database) -> StoreResult<()> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ACCOUNTS_TABLE)?;
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(SEQUENCES_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn begin_read(&self) -> StoreResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    pub fn begin_write(&self) -> StoreResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Allocate the next order id within the caller's write transaction
    pub fn next_order_id(txn: &WriteTransaction) -> StoreResult<u64> {
        let mut table = txn.open_table(SEQUENCES_TABLE)?;
        let next = table.get(ORDER_SEQ_KEY)?.map(|v| v.value()).unwrap_or(0) + 1;
        table.insert(ORDER_SEQ_KEY, next)?;
        Ok(next)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

/// Serialize a record for storage
pub fn encode<T: Serialize>(value: &T) -> StoreResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Deserialize a stored record
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}
