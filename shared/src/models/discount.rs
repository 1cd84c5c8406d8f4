//! Discount Code Model (折扣码)

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Discount code entity. The code is stored upper-cased, matched
/// case-insensitively by normalizing the lookup input
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiscountCode {
    pub id: i64,
    pub code: String,
    /// Percentage off, 0–100
    pub percentage: f64,
    pub is_active: bool,
}

/// Create discount code payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiscountCodeCreate {
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub percentage: f64,
}

/// Update discount code payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountCodeUpdate {
    pub percentage: Option<f64>,
    pub is_active: Option<bool>,
}
