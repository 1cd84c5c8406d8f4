//! Shared types for the order workflow

use serde::{Deserialize, Serialize};

// ============================================================================
// Order Status
// ============================================================================

/// 订单状态 — 只允许向前流转
///
/// Pending → Paying → Completed. No backward transition, no skipping
/// Paying (payment confirmation requires an existing bill).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    /// 已下单，等待出单
    #[default]
    Pending,
    /// 账单已出，等待支付确认
    Paying,
    /// 已支付，订单终结
    Completed,
}

impl OrderStatus {
    /// Whether a transition to `next` is a legal forward step
    pub fn can_advance_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Paying)
                | (OrderStatus::Paying, OrderStatus::Completed)
        )
    }

    /// Completed orders are immutable
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "PENDING"),
            OrderStatus::Paying => write!(f, "PAYING"),
            OrderStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

// ============================================================================
// Operator Context
// ============================================================================

/// Explicit identity for every coordinator call, replacing ambient
/// current-user state. `session_id` addresses targeted replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorContext {
    pub operator_id: i64,
    /// Name snapshot (shown on staff order cards)
    pub operator_name: String,
    pub session_id: String,
}

impl OperatorContext {
    pub fn new(
        operator_id: i64,
        operator_name: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            operator_id,
            operator_name: operator_name.into(),
            session_id: session_id.into(),
        }
    }
}

// ============================================================================
// Cart Input
// ============================================================================

/// One cart line as submitted by a customer session
///
/// Wire field names match the client payload: `{id, qty, options}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineInput {
    #[serde(rename = "id")]
    pub product_id: i64,
    #[serde(rename = "qty")]
    pub quantity: i64,
    /// Free-text customization ("less sugar", "extra shot", ...)
    #[serde(rename = "options", default)]
    pub customization: Option<String>,
}

/// Full order submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub discount_percent: f64,
    pub cart: Vec<CartLineInput>,
}

// ============================================================================
// Coordinator Results
// ============================================================================

/// Why a cart line was not accepted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    UnknownProduct,
    ProductInactive,
    InsufficientStock,
    /// Quantity was zero or negative
    InvalidQuantity,
}

/// A cart line dropped during placement (partial-order policy)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedLine {
    pub product_id: i64,
    pub quantity: i64,
    pub reason: SkipReason,
}

/// Result of a successful `place_order`. The order exists even when
/// some (or all) cart lines were skipped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub order: crate::models::Order,
    pub lines: Vec<crate::models::OrderLine>,
    pub skipped: Vec<SkippedLine>,
    /// `sum(qty * price_at_time) * (1 - discount_percent/100)`
    pub final_total: f64,
}
