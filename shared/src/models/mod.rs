//! Domain models shared between server and clients
//!
//! Persisted entities plus their create/update payloads. The row structs
//! derive `sqlx::FromRow` behind the `db` feature so client crates do not
//! pull the database stack.

pub mod discount;
pub mod order;
pub mod product;
pub mod user;

// Re-exports
pub use discount::{DiscountCode, DiscountCodeCreate, DiscountCodeUpdate};
pub use order::{Bill, Order, OrderLine, Payment};
pub use product::{Inventory, Product, ProductCreate, ProductUpdate, ProductWithStock};
pub use user::{EmployeeCreate, EmployeeUpdate, User, UserPublic};
