//! Account Repository

use super::{RepoError, RepoResult};
use crate::db::models::Account;
use crate::db::{ACCOUNTS_TABLE, Store, decode, encode};
use redb::ReadableTable;
use rust_decimal::Decimal;

#[derive(Clone)]
pub struct AccountRepository {
    store: Store,
}

impl AccountRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Register a new account; the username is the unique key
    pub fn create(&self, account: Account) -> RepoResult<Account> {
        let txn = self.store.begin_write().map_err(RepoError::from)?;
        {
            let mut table = txn.open_table(ACCOUNTS_TABLE).map_err(map_err)?;

            let exists = table
                .get(account.username.as_str())
                .map_err(map_err)?
                .is_some();
            if exists {
                return Err(RepoError::Duplicate(format!(
                    "Account '{}' already exists",
                    account.username
                )));
            }

            let bytes = encode(&account)?;
            table
                .insert(account.username.as_str(), bytes.as_slice())
                .map_err(map_err)?;
        }
        txn.commit().map_err(map_err)?;

        tracing::info!(username = %account.username, "account registered");
        Ok(account)
    }

    pub fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(ACCOUNTS_TABLE).map_err(map_err)?;

        match table.get(username).map_err(map_err)? {
            Some(guard) => Ok(Some(decode(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Apply a signed balance adjustment
    ///
    /// Returns `false` instead of an error when the account is missing or
    /// the resulting balance would drop below zero; the read-check-write
    /// runs inside one write transaction, so concurrent adjustments cannot
    /// interleave.
    pub fn update_balance(&self, username: &str, delta: Decimal) -> RepoResult<bool> {
        let txn = self.store.begin_write()?;
        {
            let mut table = txn.open_table(ACCOUNTS_TABLE).map_err(map_err)?;

            let mut account: Account = match table.get(username).map_err(map_err)? {
                Some(guard) => decode(guard.value())?,
                None => return Ok(false),
            };

            let new_balance = account.wallet_balance + delta;
            if new_balance < Decimal::ZERO {
                tracing::warn!(username = %username, %delta, "balance update rejected");
                return Ok(false);
            }

            account.wallet_balance = new_balance;
            let bytes = encode(&account)?;
            table
                .insert(username, bytes.as_slice())
                .map_err(map_err)?;
        }
        txn.commit().map_err(map_err)?;
        Ok(true)
    }
}

fn map_err(e: impl std::fmt::Display) -> RepoError {
    RepoError::Database(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> AccountRepository {
        AccountRepository::new(Store::open_in_memory().unwrap())
    }

    fn account(username: &str, balance: i64) -> Account {
        Account::new(username, username, "hunter2-hunter2", Decimal::from(balance)).unwrap()
    }

    #[test]
    fn create_and_find() {
        let repo = repo();
        repo.create(account("alice", 100)).unwrap();

        let found = repo.find_by_username("alice").unwrap().unwrap();
        assert_eq!(found.username, "alice");
        assert_eq!(found.wallet_balance, Decimal::from(100));
        assert!(repo.find_by_username("bob").unwrap().is_none());
    }

    #[test]
    fn duplicate_username_rejected() {
        let repo = repo();
        repo.create(account("alice", 0)).unwrap();

        let err = repo.create(account("alice", 0)).unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[test]
    fn balance_update_applies_signed_delta() {
        let repo = repo();
        repo.create(account("alice", 100)).unwrap();

        assert!(repo.update_balance("alice", Decimal::from(50)).unwrap());
        assert!(repo.update_balance("alice", Decimal::from(-30)).unwrap());

        let found = repo.find_by_username("alice").unwrap().unwrap();
        assert_eq!(found.wallet_balance, Decimal::from(120));
    }

    #[test]
    fn balance_never_goes_negative() {
        let repo = repo();
        repo.create(account("alice", 10)).unwrap();

        assert!(!repo.update_balance("alice", Decimal::from(-11)).unwrap());

        let found = repo.find_by_username("alice").unwrap().unwrap();
        assert_eq!(found.wallet_balance, Decimal::from(10));
    }

    #[test]
    fn balance_update_on_missing_account_fails_silently() {
        let repo = repo();
        assert!(!repo.update_balance("ghost", Decimal::ONE).unwrap());
    }
}
