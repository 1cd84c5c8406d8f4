use super::*;
use shared::order::{OrderStatus, PlaceOrderRequest};

#[tokio::test]
async fn test_place_order_decrements_stock() {
    let (coordinator, _bus, _dir) = create_test_coordinator().await;
    let product_id = seed_product(coordinator.pool(), "Espresso", 25000.0, 5, true).await;

    let placed = coordinator
        .place_order(
            &customer_ctx(),
            PlaceOrderRequest {
                discount_percent: 0.0,
                cart: vec![cart_line(product_id, 3)],
            },
        )
        .await
        .unwrap();

    assert_eq!(placed.lines.len(), 1);
    assert!(placed.skipped.is_empty());
    assert_eq!(placed.lines[0].quantity, 3);
    assert_eq!(placed.order.status, OrderStatus::Pending);
    assert_eq!(stock_of(coordinator.pool(), product_id).await, 2);
    assert_eq!(count_rows(coordinator.pool(), "order_line", placed.order.id).await, 1);
}

#[tokio::test]
async fn test_insufficient_stock_skips_line_and_keeps_stock() {
    let (coordinator, _bus, _dir) = create_test_coordinator().await;
    let product_id = seed_product(coordinator.pool(), "Espresso", 25000.0, 5, true).await;

    let placed = coordinator
        .place_order(
            &customer_ctx(),
            PlaceOrderRequest {
                discount_percent: 0.0,
                cart: vec![cart_line(product_id, 6)],
            },
        )
        .await
        .unwrap();

    // Order exists, line silently skipped, stock untouched
    assert!(placed.lines.is_empty());
    assert_eq!(placed.skipped.len(), 1);
    assert_eq!(placed.skipped[0].reason, shared::order::SkipReason::InsufficientStock);
    assert_eq!(stock_of(coordinator.pool(), product_id).await, 5);
    assert_eq!(count_rows(coordinator.pool(), "order_line", placed.order.id).await, 0);
}

#[tokio::test]
async fn test_final_total_formula() {
    let (coordinator, _bus, _dir) = create_test_coordinator().await;
    let espresso = seed_product(coordinator.pool(), "Espresso", 25000.0, 50, true).await;
    let latte = seed_product(coordinator.pool(), "Latte", 35000.0, 50, true).await;

    let placed = coordinator
        .place_order(
            &customer_ctx(),
            PlaceOrderRequest {
                discount_percent: 20.0,
                cart: vec![cart_line(espresso, 2), cart_line(latte, 1)],
            },
        )
        .await
        .unwrap();

    let raw: f64 = placed
        .lines
        .iter()
        .map(|l| l.quantity as f64 * l.price_at_time)
        .sum();
    assert_close(raw, 85000.0);
    assert_close(placed.final_total, raw * (1.0 - 20.0 / 100.0));
}

#[tokio::test]
async fn test_price_edit_does_not_change_placed_order() {
    let (coordinator, _bus, _dir) = create_test_coordinator().await;
    let product_id = seed_product(coordinator.pool(), "Espresso", 25000.0, 50, true).await;

    let placed = coordinator
        .place_order(
            &customer_ctx(),
            PlaceOrderRequest {
                discount_percent: 0.0,
                cart: vec![cart_line(product_id, 2)],
            },
        )
        .await
        .unwrap();

    // Manager doubles the price after the order was placed
    sqlx::query("UPDATE product SET price = 50000 WHERE id = ?")
        .bind(product_id)
        .execute(coordinator.pool())
        .await
        .unwrap();

    let bill = coordinator
        .request_payment(&staff_ctx(), placed.order.id)
        .await
        .unwrap()
        .unwrap();

    // Bill is computed from the price-at-time snapshot
    assert_close(bill.total_amount, 50000.0);
    assert_close(bill.final_amount, 50000.0);
}

#[tokio::test]
async fn test_request_payment_is_idempotent() {
    let (coordinator, _bus, _dir) = create_test_coordinator().await;
    let product_id = seed_product(coordinator.pool(), "Espresso", 25000.0, 50, true).await;

    let placed = coordinator
        .place_order(
            &customer_ctx(),
            PlaceOrderRequest {
                discount_percent: 0.0,
                cart: vec![cart_line(product_id, 1)],
            },
        )
        .await
        .unwrap();

    let first = coordinator
        .request_payment(&staff_ctx(), placed.order.id)
        .await
        .unwrap()
        .unwrap();
    let second = coordinator
        .request_payment(&staff_ctx(), placed.order.id)
        .await
        .unwrap()
        .unwrap();

    // Exactly one bill; the re-request reuses it
    assert_eq!(first.id, second.id);
    assert_eq!(count_rows(coordinator.pool(), "bill", placed.order.id).await, 1);
}

#[tokio::test]
async fn test_request_payment_unknown_order_is_noop() {
    let (coordinator, _bus, _dir) = create_test_coordinator().await;
    let result = coordinator
        .request_payment(&staff_ctx(), 424242)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_confirm_without_bill_is_noop() {
    let (coordinator, _bus, _dir) = create_test_coordinator().await;
    let product_id = seed_product(coordinator.pool(), "Espresso", 25000.0, 50, true).await;

    let placed = coordinator
        .place_order(
            &customer_ctx(),
            PlaceOrderRequest {
                discount_percent: 0.0,
                cart: vec![cart_line(product_id, 1)],
            },
        )
        .await
        .unwrap();

    // Confirm straight from PENDING: skipping request_payment must not advance
    let result = coordinator
        .confirm_payment(&staff_ctx(), placed.order.id)
        .await
        .unwrap();
    assert!(result.is_none());

    let order = crate::db::repository::order::find_by_id(coordinator.pool(), placed.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.staff_id, None);
    assert_eq!(count_rows(coordinator.pool(), "payment", placed.order.id).await, 0);
}

#[tokio::test]
async fn test_discount_lookup_is_case_insensitive() {
    let (coordinator, _bus, _dir) = create_test_coordinator().await;
    seed_discount(coordinator.pool(), "SAVE10", 10.0, true).await;

    let result = coordinator
        .check_discount(&customer_ctx(), "  save10 ")
        .await
        .unwrap();

    assert!(result.valid);
    assert_eq!(result.percent, Some(10.0));
    assert_eq!(result.code.as_deref(), Some("SAVE10"));
}

#[tokio::test]
async fn test_inactive_discount_is_rejected() {
    let (coordinator, _bus, _dir) = create_test_coordinator().await;
    seed_discount(coordinator.pool(), "OLD20", 20.0, false).await;

    let result = coordinator
        .check_discount(&customer_ctx(), "old20")
        .await
        .unwrap();

    assert!(!result.valid);
    assert!(result.msg.is_some());
    assert!(result.percent.is_none());
}
