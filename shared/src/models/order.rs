//! Order / Bill / Payment rows (订单、账单、支付记录)
//!
//! These are the persisted shapes. The workflow types (status machine,
//! cart input, coordinator results, domain events) live in [`crate::order`].

use crate::order::OrderStatus;
use serde::{Deserialize, Serialize};

/// Order row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    /// Set only on completion (the confirming staff member)
    pub staff_id: Option<i64>,
    pub created_at: i64,
    pub status: OrderStatus,
    /// Snapshot copied at creation time; later discount-code edits never
    /// touch placed orders
    pub discount_percent: f64,
}

/// Order line row. Product name and unit price are copied at order time
/// so later product edits cannot alter historical totals
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub price_at_time: f64,
    pub customization: String,
}

impl OrderLine {
    pub fn subtotal(&self) -> f64 {
        self.quantity as f64 * self.price_at_time
    }

    /// Display name with the customization folded in parentheses
    pub fn display_name(&self) -> String {
        if self.customization.is_empty() {
            self.product_name.clone()
        } else {
            format!("{} ({})", self.product_name, self.customization)
        }
    }
}

/// Bill row: frozen monetary snapshot, 1:1 with its order
/// (UNIQUE(order_id) is the double-creation guard)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Bill {
    pub id: i64,
    pub order_id: i64,
    pub created_at: i64,
    /// Pre-discount total
    pub total_amount: f64,
    pub discount_applied: f64,
    pub final_amount: f64,
}

/// Payment row; its existence is the terminal marker of completion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: i64,
    pub bill_id: i64,
    pub method: String,
    pub paid_at: i64,
}
