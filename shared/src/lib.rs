//! Shared types for the order-management backend
//!
//! Wire contract used by the server and by client code: request/response
//! DTOs, the unified API response envelope, and the order record types.

pub mod client;
pub mod order;
pub mod response;

pub use order::{Order, OrderDetail, OrderLine, OrderStatus, OrderView};
pub use response::ApiResponse;
