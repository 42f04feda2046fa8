//! Authentication module
//!
//! JWT authentication and request identity:
//! - [`JwtService`] - token generation and validation
//! - [`CurrentUser`] - authenticated request identity
//! - [`require_auth`] - authentication middleware

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
