//! Product Repository

use super::{RepoError, RepoResult};
use crate::db::models::{Product, ProductCreate};
use crate::db::{PRODUCTS_TABLE, Store, decode, encode};
use chrono::Utc;
use redb::ReadableTable;
use rust_decimal::Decimal;

#[derive(Clone)]
pub struct ProductRepository {
    store: Store,
}

impl ProductRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create a catalog entry
    pub fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.price < Decimal::ZERO {
            return Err(RepoError::Validation("price cannot be negative".into()));
        }
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("name cannot be empty".into()));
        }

        let product = Product {
            id: data
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: data.name,
            price: data.price,
            created_at: Utc::now(),
        };

        let txn = self.store.begin_write()?;
        {
            let mut table = txn.open_table(PRODUCTS_TABLE).map_err(map_err)?;

            let exists = table.get(product.id.as_str()).map_err(map_err)?.is_some();
            if exists {
                return Err(RepoError::Duplicate(format!(
                    "Product '{}' already exists",
                    product.id
                )));
            }

            let bytes = encode(&product)?;
            table
                .insert(product.id.as_str(), bytes.as_slice())
                .map_err(map_err)?;
        }
        txn.commit().map_err(map_err)?;

        Ok(product)
    }

    pub fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(PRODUCTS_TABLE).map_err(map_err)?;

        match table.get(id).map_err(map_err)? {
            Some(guard) => Ok(Some(decode(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn find_all(&self) -> RepoResult<Vec<Product>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(PRODUCTS_TABLE).map_err(map_err)?;

        let mut products = Vec::new();
        for entry in table.iter().map_err(map_err)? {
            let (_, value) = entry.map_err(map_err)?;
            products.push(decode(value.value())?);
        }
        Ok(products)
    }

    /// Resolve a list of product ids, failing on the first unknown id
    ///
    /// All ids resolve against one read snapshot; duplicates are allowed
    /// (ordering two coffees is two lines).
    pub fn find_by_ids(&self, ids: &[String]) -> RepoResult<Vec<Product>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(PRODUCTS_TABLE).map_err(map_err)?;

        let mut products = Vec::with_capacity(ids.len());
        for id in ids {
            match table.get(id.as_str()).map_err(map_err)? {
                Some(guard) => products.push(decode(guard.value())?),
                None => {
                    return Err(RepoError::NotFound(format!("Product '{}' not found", id)));
                }
            }
        }
        Ok(products)
    }
}

fn map_err(e: impl std::fmt::Display) -> RepoError {
    RepoError::Database(e.to_string())
}
