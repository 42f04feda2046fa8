//! Order Server - account, product and order management backend
//!
//! # Overview
//!
//! - **Auth** (`auth`): JWT + Argon2 bearer-token authentication
//! - **Database** (`db`): embedded redb storage with repositories
//! - **Orders** (`orders`): order lifecycle and compound aggregation
//! - **HTTP API** (`api`): RESTful routes and handlers
//!
//! # Module structure
//!
//! ```text
//! order-server/src/
//! ├── core/          # configuration, state, server, errors
//! ├── auth/          # JWT service, extractor, middleware
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # store, models, repositories
//! ├── orders/        # order lifecycle manager
//! └── utils/         # error envelope, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::OrdersManager;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
