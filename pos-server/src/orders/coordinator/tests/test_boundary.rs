use super::*;
use shared::order::{OrderStatus, PlaceOrderRequest, SkipReason};

#[tokio::test]
async fn test_unknown_product_is_skipped() {
    let (coordinator, _bus, _dir) = create_test_coordinator().await;

    let placed = coordinator
        .place_order(
            &customer_ctx(),
            PlaceOrderRequest {
                discount_percent: 0.0,
                cart: vec![cart_line(999_999, 1)],
            },
        )
        .await
        .unwrap();

    assert!(placed.lines.is_empty());
    assert_eq!(placed.skipped[0].reason, SkipReason::UnknownProduct);
}

#[tokio::test]
async fn test_inactive_product_is_skipped() {
    let (coordinator, _bus, _dir) = create_test_coordinator().await;
    let product_id = seed_product(coordinator.pool(), "Retired Blend", 20000.0, 50, false).await;

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

    assert!(placed.lines.is_empty());
    assert_eq!(placed.skipped[0].reason, SkipReason::ProductInactive);
    assert_eq!(stock_of(coordinator.pool(), product_id).await, 50);
}

#[tokio::test]
async fn test_non_positive_quantity_is_skipped() {
    let (coordinator, _bus, _dir) = create_test_coordinator().await;
    let product_id = seed_product(coordinator.pool(), "Espresso", 25000.0, 50, true).await;

    let placed = coordinator
        .place_order(
            &customer_ctx(),
            PlaceOrderRequest {
                discount_percent: 0.0,
                cart: vec![cart_line(product_id, 0), cart_line(product_id, -2)],
            },
        )
        .await
        .unwrap();

    assert!(placed.lines.is_empty());
    assert_eq!(placed.skipped.len(), 2);
    assert!(placed
        .skipped
        .iter()
        .all(|s| s.reason == SkipReason::InvalidQuantity));
    assert_eq!(stock_of(coordinator.pool(), product_id).await, 50);
}

#[tokio::test]
async fn test_partial_order_accepts_valid_lines_only() {
    let (coordinator, _bus, _dir) = create_test_coordinator().await;
    let in_stock = seed_product(coordinator.pool(), "Espresso", 25000.0, 10, true).await;
    let sold_out = seed_product(coordinator.pool(), "Cold Brew", 30000.0, 1, true).await;

    let placed = coordinator
        .place_order(
            &customer_ctx(),
            PlaceOrderRequest {
                discount_percent: 0.0,
                cart: vec![cart_line(in_stock, 2), cart_line(sold_out, 5)],
            },
        )
        .await
        .unwrap();

    assert_eq!(placed.lines.len(), 1);
    assert_eq!(placed.lines[0].product_id, in_stock);
    assert_eq!(placed.skipped.len(), 1);
    assert_eq!(stock_of(coordinator.pool(), in_stock).await, 8);
    assert_eq!(stock_of(coordinator.pool(), sold_out).await, 1);
    assert_close(placed.final_total, 50000.0);
}

#[tokio::test]
async fn test_empty_order_bills_zero() {
    let (coordinator, _bus, _dir) = create_test_coordinator().await;

    // All lines skipped: the order still exists and bills to zero
    let placed = coordinator
        .place_order(
            &customer_ctx(),
            PlaceOrderRequest {
                discount_percent: 10.0,
                cart: vec![cart_line(1, 1)],
            },
        )
        .await
        .unwrap();
    assert!(placed.lines.is_empty());

    let bill = coordinator
        .request_payment(&staff_ctx(), placed.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_close(bill.total_amount, 0.0);
    assert_close(bill.final_amount, 0.0);
}

#[tokio::test]
async fn test_out_of_range_discount_is_clamped() {
    let (coordinator, _bus, _dir) = create_test_coordinator().await;
    let product_id = seed_product(coordinator.pool(), "Espresso", 25000.0, 50, true).await;

    let placed = coordinator
        .place_order(
            &customer_ctx(),
            PlaceOrderRequest {
                discount_percent: 150.0,
                cart: vec![cart_line(product_id, 1)],
            },
        )
        .await
        .unwrap();

    assert_close(placed.order.discount_percent, 100.0);
    assert_close(placed.final_total, 0.0);
}

#[tokio::test]
async fn test_completed_order_never_moves_backward() {
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
    coordinator
        .request_payment(&staff_ctx(), placed.order.id)
        .await
        .unwrap();
    coordinator
        .confirm_payment(&staff_ctx(), placed.order.id)
        .await
        .unwrap()
        .unwrap();

    // Re-requesting payment on a terminal order is ignored
    let result = coordinator
        .request_payment(&staff_ctx(), placed.order.id)
        .await
        .unwrap();
    assert!(result.is_none());

    let order = crate::db::repository::order::find_by_id(coordinator.pool(), placed.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
}

#[tokio::test]
async fn test_second_confirm_is_noop() {
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
    coordinator
        .request_payment(&staff_ctx(), placed.order.id)
        .await
        .unwrap();
    let first = coordinator
        .confirm_payment(&staff_ctx(), placed.order.id)
        .await
        .unwrap();
    assert!(first.is_some());

    let second = coordinator
        .confirm_payment(&staff_ctx(), placed.order.id)
        .await
        .unwrap();
    assert!(second.is_none());
    assert_eq!(count_rows(coordinator.pool(), "payment", placed.order.id).await, 1);
}
