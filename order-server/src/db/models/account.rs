//! Account Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account entity
///
/// `username` is the unique key and the identity ownership checks compare
/// against. The wallet balance never goes negative; the repository rejects
/// adjustments that would take it below zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub display_name: String,
    /// Argon2 password hash, never returned to clients
    pub password_hash: String,
    pub wallet_balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a freshly hashed password
    pub fn new(
        username: impl Into<String>,
        display_name: impl Into<String>,
        password: &str,
        wallet_balance: Decimal,
    ) -> Result<Self, argon2::password_hash::Error> {
        Ok(Self {
            username: username.into(),
            display_name: display_name.into(),
            password_hash: Self::hash_password(password)?,
            wallet_balance,
            created_at: Utc::now(),
        })
    }

    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_roundtrip() {
        let account =
            Account::new("alice", "Alice", "correct horse battery", Decimal::ZERO).unwrap();

        assert!(account.verify_password("correct horse battery").unwrap());
        assert!(!account.verify_password("wrong password").unwrap());
        assert_ne!(account.password_hash, "correct horse battery");
    }
}
