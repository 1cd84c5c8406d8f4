//! Order Ledger Repository (read side)
//!
//! The write path (placement, billing, payment) lives in the order
//! coordinator, which drives its own transactions. These queries back the
//! staff/manager read endpoints, the surface a reconnecting session uses
//! instead of event replay.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::RepoResult;
use shared::models::{Bill, Order, OrderLine, Payment};

/// Open-order card for the staff dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenOrderSummary {
    pub id: i64,
    pub customer: String,
    pub details: String,
    pub total: f64,
    pub created_at: i64,
    pub status: shared::order::OrderStatus,
    pub discount_percent: f64,
}

/// Full order view: lines plus billing state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: Order,
    pub lines: Vec<OrderLine>,
    pub bill: Option<Bill>,
    pub payment: Option<Payment>,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, Order>(
        "SELECT id, customer_id, staff_id, created_at, status, discount_percent FROM orders WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_lines(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderLine>> {
    let rows = sqlx::query_as::<_, OrderLine>(
        "SELECT id, order_id, product_id, product_name, quantity, price_at_time, customization FROM order_line WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_bill_by_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Option<Bill>> {
    let row = sqlx::query_as::<_, Bill>(
        "SELECT id, order_id, created_at, total_amount, discount_applied, final_amount FROM bill WHERE order_id = ?",
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_payment_by_bill(pool: &SqlitePool, bill_id: i64) -> RepoResult<Option<Payment>> {
    let row = sqlx::query_as::<_, Payment>(
        "SELECT id, bill_id, method, paid_at FROM payment WHERE bill_id = ?",
    )
    .bind(bill_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_detail(pool: &SqlitePool, order_id: i64) -> RepoResult<Option<OrderDetail>> {
    let Some(order) = find_by_id(pool, order_id).await? else {
        return Ok(None);
    };
    let lines = find_lines(pool, order_id).await?;
    let bill = find_bill_by_order(pool, order_id).await?;
    let payment = match &bill {
        Some(b) => find_payment_by_bill(pool, b.id).await?,
        None => None,
    };
    Ok(Some(OrderDetail {
        order,
        lines,
        bill,
        payment,
    }))
}

/// All non-completed orders, newest first (staff dashboard)
pub async fn find_open(pool: &SqlitePool) -> RepoResult<Vec<OpenOrderSummary>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT o.id, o.customer_id, o.staff_id, o.created_at, o.status, o.discount_percent FROM orders o WHERE o.status != 'COMPLETED' ORDER BY o.created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    let mut summaries = Vec::with_capacity(orders.len());
    for order in orders {
        let lines = find_lines(pool, order.id).await?;
        let customer = sqlx::query_scalar::<_, String>("SELECT full_name FROM user WHERE id = ?")
            .bind(order.customer_id)
            .fetch_optional(pool)
            .await?
            .unwrap_or_default();
        let raw_total: f64 = lines.iter().map(|l| l.subtotal()).sum();
        summaries.push(OpenOrderSummary {
            id: order.id,
            customer,
            details: line_summary(&lines),
            total: raw_total * (1.0 - order.discount_percent / 100.0),
            created_at: order.created_at,
            status: order.status,
            discount_percent: order.discount_percent,
        });
    }
    Ok(summaries)
}

/// Revenue over `[from, to)` from billed amounts
pub async fn revenue_between(pool: &SqlitePool, from: i64, to: i64) -> RepoResult<f64> {
    let total = sqlx::query_scalar::<_, Option<f64>>(
        "SELECT SUM(final_amount) FROM bill WHERE created_at >= ?1 AND created_at < ?2",
    )
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await?;
    Ok(total.unwrap_or(0.0))
}

/// Bill count over `[from, to)`
pub async fn bill_count_between(pool: &SqlitePool, from: i64, to: i64) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM bill WHERE created_at >= ?1 AND created_at < ?2",
    )
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// "Espresso x2, Flat White (oat milk) x1"
pub fn line_summary(lines: &[OrderLine]) -> String {
    lines
        .iter()
        .map(|l| format!("{} x{}", l.display_name(), l.quantity))
        .collect::<Vec<_>>()
        .join(", ")
}
