//! Order lifecycle module
//!
//! [`OrdersManager`] owns every order mutation: placing simple orders,
//! confirming, cancelling, and building confirmed compound orders from
//! existing simple orders. All checks run before anything is persisted.

pub mod manager;


pub use manager::{OrderError, OrdersManager};
