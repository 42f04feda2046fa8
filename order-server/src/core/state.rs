use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::Store;
use crate::db::repository::{AccountRepository, ProductRepository};
use crate::orders::OrdersManager;

/// Server state shared across all handlers
///
/// Holds the configuration, the embedded database handle and the JWT
/// service. Cloning is cheap: the store and the JWT service are behind
/// `Arc`.
///
/// Repositories and the orders manager are constructed per call; they
/// are thin wrappers around the shared store handle.
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (redb)
    pub store: Store,
    /// JWT auth service
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Initialize state from configuration, opening the database under
    /// the configured working directory
    pub fn initialize(config: &Config) -> crate::core::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        let store = Store::open(config.database_path())?;

        Ok(Self::with_store(config.clone(), store))
    }

    /// Build state around an existing store, used by tests with an
    /// in-memory database
    pub fn with_store(config: Config, store: Store) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            config,
            store,
            jwt_service,
        }
    }

    pub fn accounts(&self) -> AccountRepository {
        AccountRepository::new(self.store.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.store.clone())
    }

    pub fn orders(&self) -> OrdersManager {
        OrdersManager::new(self.store.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_creates_work_dir_and_database() {
        let dir = tempfile::tempdir().unwrap();
        let work_dir = dir.path().join("server");
        let config = Config::with_work_dir(work_dir.to_string_lossy());

        let state = ServerState::initialize(&config).unwrap();

        assert!(config.database_path().exists());
        assert!(state.accounts().find_by_username("nobody").unwrap().is_none());
    }
}
