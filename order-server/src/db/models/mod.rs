//! Database entity models

pub mod account;
pub mod product;

pub use account::Account;
pub use product::{Product, ProductCreate};
