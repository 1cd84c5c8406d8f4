//! OrderCoordinator - the order/payment state machine
//!
//! This module handles:
//! - Stock-checked order placement (one transaction per order)
//! - The Pending → Paying → Completed status flow
//! - Bill creation (idempotent) and payment recording
//! - Event publication to the fan-out bus (after commit only)
//!
//! # Operation Flow
//!
//! ```text
//! place_order(ctx, req)
//!     ├─ 1. Begin write transaction
//!     ├─ 2. Insert order row (PENDING, discount snapshot)
//!     ├─ 3. Per cart line: conditional stock decrement + line insert
//!     │     (failed lines are skipped, the rest of the order proceeds)
//!     ├─ 4. Commit
//!     ├─ 5. Publish update_staff_orders (staff-channel)
//!     └─ 6. Publish order_success_response (session:<id>)
//! ```
//!
//! Broadcasts are fire-and-forget and strictly post-commit: a rolled-back
//! operation emits nothing.

mod error;
pub use error::*;

#[cfg(test)]
mod tests;

use chrono_tz::Tz;
use sqlx::SqlitePool;
use std::sync::Arc;

use shared::message::Topic;
use shared::models::{Bill, Order, OrderLine, Payment, Product};
use shared::order::{
    CartLineInput, CustomerBillItem, CustomerBillPayload, DiscountResultPayload, OperatorContext,
    OrderAckPayload, OrderStatus, PaymentSuccessPayload, PlaceOrderRequest, PlacedOrder, PosEvent,
    SkipReason, SkippedLine, StaffOrderPayload,
};

use crate::db::repository::order as order_repo;
use crate::db::repository::discount as discount_repo;
use crate::message::MessageBus;
use crate::utils::time::clock_time;

/// Payment method tag recorded on confirmation
const PAYMENT_METHOD: &str = "QR/Cash";

/// OrderCoordinator - validates stock, creates orders, transitions their
/// status and drives the bill/payment sequence
pub struct OrderCoordinator {
    pool: SqlitePool,
    bus: Arc<MessageBus>,
    /// 业务时区 (下单时间展示用)
    tz: Tz,
}

impl std::fmt::Debug for OrderCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderCoordinator")
            .field("tz", &self.tz)
            .finish()
    }
}

impl OrderCoordinator {
    pub fn new(pool: SqlitePool, bus: Arc<MessageBus>, tz: Tz) -> Self {
        Self { pool, bus, tz }
    }

    // ========================================================================
    // place_order
    // ========================================================================

    /// Place a customer order from a cart
    ///
    /// Unknown, inactive and out-of-stock lines are skipped and the rest of
    /// the order goes through (partial-order policy); every skip is logged
    /// and echoed in [`PlacedOrder::skipped`]. Stock decrement and line
    /// creation commit together or not at all.
    pub async fn place_order(
        &self,
        ctx: &OperatorContext,
        req: PlaceOrderRequest,
    ) -> CoordinatorResult<PlacedOrder> {
        let discount_percent = req.discount_percent.clamp(0.0, 100.0);
        if discount_percent != req.discount_percent {
            tracing::warn!(
                submitted = req.discount_percent,
                clamped = discount_percent,
                "Discount percent out of range, clamped"
            );
        }

        let order_id = shared::util::snowflake_id();
        let now = shared::util::now_millis();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO orders (id, customer_id, staff_id, created_at, status, discount_percent) VALUES (?1, ?2, NULL, ?3, 'PENDING', ?4)",
        )
        .bind(order_id)
        .bind(ctx.operator_id)
        .bind(now)
        .bind(discount_percent)
        .execute(&mut *tx)
        .await?;

        let mut lines: Vec<OrderLine> = Vec::new();
        let mut skipped: Vec<SkippedLine> = Vec::new();

        for cart_line in &req.cart {
            match self.try_accept_line(&mut tx, order_id, cart_line).await? {
                Ok(line) => lines.push(line),
                Err(reason) => {
                    tracing::warn!(
                        order_id,
                        product_id = cart_line.product_id,
                        quantity = cart_line.quantity,
                        reason = ?reason,
                        "Cart line skipped"
                    );
                    skipped.push(SkippedLine {
                        product_id: cart_line.product_id,
                        quantity: cart_line.quantity,
                        reason,
                    });
                }
            }
        }

        tx.commit().await?;

        let raw_total: f64 = lines.iter().map(|l| l.subtotal()).sum();
        let final_total = raw_total * (1.0 - discount_percent / 100.0);

        let order = Order {
            id: order_id,
            customer_id: ctx.operator_id,
            staff_id: None,
            created_at: now,
            status: OrderStatus::Pending,
            discount_percent,
        };

        tracing::info!(
            order_id,
            customer = %ctx.operator_name,
            accepted = lines.len(),
            skipped = skipped.len(),
            final_total,
            "Order placed"
        );

        // Post-commit fan-out: staff card first, then the private ack
        self.bus.publish_event(
            Topic::Staff,
            &PosEvent::UpdateStaffOrders(StaffOrderPayload {
                id: order_id,
                customer: ctx.operator_name.clone(),
                details: order_repo::line_summary(&lines),
                total: final_total,
                time: clock_time(now, self.tz),
                discount: discount_percent,
            }),
        );
        self.bus.publish_event(
            Topic::Session(ctx.session_id.clone()),
            &PosEvent::OrderSuccessResponse(OrderAckPayload {
                order_id,
                msg: "Order submitted".to_string(),
                skipped: skipped.clone(),
            }),
        );

        Ok(PlacedOrder {
            order,
            lines,
            skipped,
            final_total,
        })
    }

    /// Validate one cart line inside the order transaction
    ///
    /// Returns `Ok(Err(reason))` for a skipped line; only infrastructure
    /// failures abort the whole placement.
    async fn try_accept_line(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        order_id: i64,
        cart_line: &CartLineInput,
    ) -> CoordinatorResult<Result<OrderLine, SkipReason>> {
        if cart_line.quantity <= 0 {
            return Ok(Err(SkipReason::InvalidQuantity));
        }

        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, image, category, is_active, created_at, updated_at FROM product WHERE id = ?",
        )
        .bind(cart_line.product_id)
        .fetch_optional(&mut **tx)
        .await?;

        let Some(product) = product else {
            return Ok(Err(SkipReason::UnknownProduct));
        };
        if !product.is_active {
            return Ok(Err(SkipReason::ProductInactive));
        }

        // Compare-and-swap stock decrement: the WHERE guard makes
        // check-then-decrement one atomic statement
        let decremented = sqlx::query(
            "UPDATE inventory SET stock_quantity = stock_quantity - ?1 WHERE product_id = ?2 AND stock_quantity >= ?1",
        )
        .bind(cart_line.quantity)
        .bind(cart_line.product_id)
        .execute(&mut **tx)
        .await?;
        if decremented.rows_affected() == 0 {
            return Ok(Err(SkipReason::InsufficientStock));
        }

        let line = OrderLine {
            id: shared::util::snowflake_id(),
            order_id,
            product_id: product.id,
            // Snapshot name and price at order time
            product_name: product.name,
            quantity: cart_line.quantity,
            price_at_time: product.price,
            customization: cart_line.customization.clone().unwrap_or_default(),
        };
        sqlx::query(
            "INSERT INTO order_line (id, order_id, product_id, product_name, quantity, price_at_time, customization) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(line.id)
        .bind(line.order_id)
        .bind(line.product_id)
        .bind(&line.product_name)
        .bind(line.quantity)
        .bind(line.price_at_time)
        .bind(&line.customization)
        .execute(&mut **tx)
        .await?;

        Ok(Ok(line))
    }

    // ========================================================================
    // request_payment
    // ========================================================================

    /// Issue (or re-issue) the bill for an order and move it to PAYING
    ///
    /// Missing orders are a no-op. The bill is created at most once per
    /// order: UNIQUE(order_id) plus `ON CONFLICT DO NOTHING` makes a
    /// duplicate request reuse the frozen bill. Completed orders never move
    /// backward.
    pub async fn request_payment(
        &self,
        _ctx: &OperatorContext,
        order_id: i64,
    ) -> CoordinatorResult<Option<Bill>> {
        let Some(order) = order_repo::find_by_id(&self.pool, order_id).await? else {
            tracing::warn!(order_id, "Payment requested for unknown order, ignoring");
            return Ok(None);
        };
        if order.status.is_terminal() {
            tracing::warn!(order_id, "Payment requested for completed order, ignoring");
            return Ok(None);
        }

        let lines = order_repo::find_lines(&self.pool, order_id).await?;
        let raw_total: f64 = lines.iter().map(|l| l.subtotal()).sum();
        let discount_amount = raw_total * (order.discount_percent / 100.0);
        let final_total = raw_total - discount_amount;

        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE orders SET status = 'PAYING' WHERE id = ?1 AND status != 'COMPLETED'")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;
        // Lost race inserts nothing; the first bill stays authoritative
        sqlx::query(
            "INSERT INTO bill (id, order_id, created_at, total_amount, discount_applied, final_amount) VALUES (?1, ?2, ?3, ?4, ?5, ?6) ON CONFLICT(order_id) DO NOTHING",
        )
        .bind(shared::util::snowflake_id())
        .bind(order_id)
        .bind(shared::util::now_millis())
        .bind(raw_total)
        .bind(discount_amount)
        .bind(final_total)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        let bill = order_repo::find_bill_by_order(&self.pool, order_id)
            .await?
            .ok_or_else(|| {
                CoordinatorError::Internal(format!("Bill missing after creation for order {order_id}"))
            })?;

        tracing::info!(
            order_id,
            bill_id = bill.id,
            final_amount = bill.final_amount,
            "Bill issued"
        );

        // The customer panel shows the frozen bill amounts, not a recompute
        let items = lines
            .iter()
            .map(|l| CustomerBillItem {
                name: l.display_name(),
                qty: l.quantity,
                subtotal: l.subtotal(),
            })
            .collect();
        self.bus.publish_event(
            Topic::Customer,
            &PosEvent::ShowCustomerQr(CustomerBillPayload {
                total: bill.final_amount,
                raw_total: bill.total_amount,
                discount: bill.discount_applied,
                items,
            }),
        );

        Ok(Some(bill))
    }

    // ========================================================================
    // confirm_payment
    // ========================================================================

    /// Confirm payment: COMPLETED + staff reference + payment record
    ///
    /// No-ops when the order is missing, has no bill yet (confirming from
    /// PENDING must not advance status), or is not in PAYING.
    pub async fn confirm_payment(
        &self,
        ctx: &OperatorContext,
        order_id: i64,
    ) -> CoordinatorResult<Option<Payment>> {
        let Some(order) = order_repo::find_by_id(&self.pool, order_id).await? else {
            tracing::warn!(order_id, "Payment confirmed for unknown order, ignoring");
            return Ok(None);
        };
        let Some(bill) = order_repo::find_bill_by_order(&self.pool, order_id).await? else {
            tracing::warn!(order_id, "Payment confirmed without a bill, ignoring");
            return Ok(None);
        };
        if !order.status.can_advance_to(OrderStatus::Completed) {
            tracing::warn!(order_id, status = %order.status, "Payment confirmed from invalid status, ignoring");
            return Ok(None);
        }

        let mut tx = self.pool.begin().await?;
        let advanced = sqlx::query(
            "UPDATE orders SET status = 'COMPLETED', staff_id = ?1 WHERE id = ?2 AND status = 'PAYING'",
        )
        .bind(ctx.operator_id)
        .bind(order_id)
        .execute(&mut *tx)
        .await?;
        if advanced.rows_affected() == 0 {
            // Raced with a concurrent confirmation; drop the transaction
            return Ok(None);
        }
        sqlx::query(
            "INSERT INTO payment (id, bill_id, method, paid_at) VALUES (?1, ?2, ?3, ?4) ON CONFLICT(bill_id) DO NOTHING",
        )
        .bind(shared::util::snowflake_id())
        .bind(bill.id)
        .bind(PAYMENT_METHOD)
        .bind(shared::util::now_millis())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        let payment = order_repo::find_payment_by_bill(&self.pool, bill.id)
            .await?
            .ok_or_else(|| {
                CoordinatorError::Internal(format!("Payment missing after creation for bill {}", bill.id))
            })?;

        tracing::info!(
            order_id,
            bill_id = bill.id,
            staff_id = ctx.operator_id,
            "Order completed"
        );

        self.bus.publish_event(
            Topic::All,
            &PosEvent::PaymentSuccess(PaymentSuccessPayload::default()),
        );

        Ok(Some(payment))
    }

    // ========================================================================
    // check_discount
    // ========================================================================

    /// Validate a discount code for the requesting session only
    ///
    /// Normalization (trim + upper-case) against upper-cased stored codes
    /// makes the lookup case-insensitive. The reply is targeted at
    /// `session:<id>` and never broadcast.
    pub async fn check_discount(
        &self,
        ctx: &OperatorContext,
        code: &str,
    ) -> CoordinatorResult<DiscountResultPayload> {
        let normalized = code.trim().to_uppercase();
        let result = match discount_repo::find_active_by_code(&self.pool, &normalized).await? {
            Some(discount) => {
                tracing::debug!(code = %normalized, percent = discount.percentage, "Discount code accepted");
                DiscountResultPayload::valid(normalized, discount.percentage)
            }
            None => {
                tracing::debug!(code = %normalized, "Discount code rejected");
                DiscountResultPayload::invalid("Invalid discount code")
            }
        };

        self.bus.publish_event(
            Topic::Session(ctx.session_id.clone()),
            &PosEvent::DiscountResult(result.clone()),
        );

        Ok(result)
    }

    /// Shared pool handle (read endpoints, tests)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
