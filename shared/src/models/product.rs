//! Product Model (商品与库存)

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Unit price (snapshot-copied into order lines at order time)
    pub price: f64,
    pub image: String,
    pub category: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Inventory entity: 1:1 with product, same lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Inventory {
    pub id: i64,
    pub product_id: i64,
    /// Non-negative; mutated only by order placement and manager stock edits
    pub stock_quantity: i64,
}

/// Product joined with its stock counter (menu / admin list view)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductWithStock {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub image: String,
    pub category: String,
    pub is_active: bool,
    pub stock_quantity: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    pub image: Option<String>,
    pub category: String,
    /// Initial stock (defaults to 100, like a fresh inventory record)
    #[validate(range(min = 0))]
    pub stock: Option<i64>,
    pub is_active: Option<bool>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub image: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 0))]
    pub stock: Option<i64>,
    pub is_active: Option<bool>,
}
