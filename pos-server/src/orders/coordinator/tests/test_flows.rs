use super::*;
use shared::message::{EventType, Topic};
use shared::order::{OrderStatus, PlaceOrderRequest, PosEvent};

/// End-to-end scenario: cart [P1 (price 25000, stock 50) x2], discount 10%
/// → order with one line, stock 48; bill 50000 / 5000 / 45000; one payment
/// and a COMPLETED order, with the full event sequence on the bus.
#[tokio::test]
async fn test_full_lifecycle_with_events() {
    let (coordinator, bus, _dir) = create_test_coordinator().await;
    let product_id = seed_product(coordinator.pool(), "Espresso", 25000.0, 50, true).await;
    let mut rx = bus.subscribe();

    // 1. Customer places the order
    let placed = coordinator
        .place_order(
            &customer_ctx(),
            PlaceOrderRequest {
                discount_percent: 10.0,
                cart: vec![cart_line(product_id, 2)],
            },
        )
        .await
        .unwrap();

    assert_eq!(placed.lines.len(), 1);
    assert_eq!(placed.lines[0].quantity, 2);
    assert_close(placed.lines[0].price_at_time, 25000.0);
    assert_eq!(stock_of(coordinator.pool(), product_id).await, 48);

    let staff_msg = rx.recv().await.unwrap();
    assert_eq!(staff_msg.event_type, EventType::OrderEvent);
    assert_eq!(staff_msg.topic, Topic::Staff);
    match staff_msg.parse_payload::<PosEvent>().unwrap() {
        PosEvent::UpdateStaffOrders(payload) => {
            assert_eq!(payload.id, placed.order.id);
            assert_eq!(payload.customer, "Test Customer");
            assert_close(payload.total, 45000.0);
            assert_close(payload.discount, 10.0);
            assert!(payload.details.contains("Espresso x2"));
        }
        other => panic!("expected update_staff_orders, got {}", other.name()),
    }

    let ack_msg = rx.recv().await.unwrap();
    assert_eq!(ack_msg.topic, Topic::Session("session-customer".into()));
    match ack_msg.parse_payload::<PosEvent>().unwrap() {
        PosEvent::OrderSuccessResponse(payload) => {
            assert_eq!(payload.order_id, placed.order.id);
            assert!(payload.skipped.is_empty());
        }
        other => panic!("expected order_success_response, got {}", other.name()),
    }

    // 2. Staff requests payment
    let bill = coordinator
        .request_payment(&staff_ctx(), placed.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_close(bill.total_amount, 50000.0);
    assert_close(bill.discount_applied, 5000.0);
    assert_close(bill.final_amount, 45000.0);

    let qr_msg = rx.recv().await.unwrap();
    assert_eq!(qr_msg.topic, Topic::Customer);
    match qr_msg.parse_payload::<PosEvent>().unwrap() {
        PosEvent::ShowCustomerQr(payload) => {
            assert_close(payload.total, 45000.0);
            assert_close(payload.raw_total, 50000.0);
            assert_close(payload.discount, 5000.0);
            assert_eq!(payload.items.len(), 1);
            assert_eq!(payload.items[0].name, "Espresso");
            assert_eq!(payload.items[0].qty, 2);
            assert_close(payload.items[0].subtotal, 50000.0);
        }
        other => panic!("expected show_customer_qr, got {}", other.name()),
    }

    // 3. Staff confirms payment
    let payment = coordinator
        .confirm_payment(&staff_ctx(), placed.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.method, "QR/Cash");

    let done_msg = rx.recv().await.unwrap();
    assert_eq!(done_msg.topic, Topic::All);
    match done_msg.parse_payload::<PosEvent>().unwrap() {
        PosEvent::PaymentSuccess(_) => {}
        other => panic!("expected payment_success, got {}", other.name()),
    }

    let order = crate::db::repository::order::find_by_id(coordinator.pool(), placed.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
    assert_eq!(order.staff_id, Some(2001));
}

#[tokio::test]
async fn test_customization_folds_into_bill_item_name() {
    let (coordinator, _bus, _dir) = create_test_coordinator().await;
    let product_id = seed_product(coordinator.pool(), "Latte", 35000.0, 10, true).await;

    let placed = coordinator
        .place_order(
            &customer_ctx(),
            PlaceOrderRequest {
                discount_percent: 0.0,
                cart: vec![shared::order::CartLineInput {
                    product_id,
                    quantity: 1,
                    customization: Some("oat milk".to_string()),
                }],
            },
        )
        .await
        .unwrap();

    assert_eq!(placed.lines[0].display_name(), "Latte (oat milk)");
    assert_eq!(placed.lines[0].customization, "oat milk");
}

#[tokio::test]
async fn test_discount_reply_targets_requesting_session_only() {
    let (coordinator, bus, _dir) = create_test_coordinator().await;
    seed_discount(coordinator.pool(), "SAVE10", 10.0, true).await;
    let mut rx = bus.subscribe();

    coordinator
        .check_discount(&customer_ctx(), "save10")
        .await
        .unwrap();

    let msg = rx.recv().await.unwrap();
    // Targeted at the requesting session, never a broadcast topic
    assert_eq!(msg.topic, Topic::Session("session-customer".into()));
    match msg.parse_payload::<PosEvent>().unwrap() {
        PosEvent::DiscountResult(payload) => {
            assert!(payload.valid);
            assert_eq!(payload.code.as_deref(), Some("SAVE10"));
        }
        other => panic!("expected discount_result, got {}", other.name()),
    }
}

#[tokio::test]
async fn test_failed_operation_emits_no_events() {
    let (coordinator, bus, _dir) = create_test_coordinator().await;
    let mut rx = bus.subscribe();

    // Unknown order: no-op, and nothing reaches the bus
    coordinator
        .request_payment(&staff_ctx(), 77)
        .await
        .unwrap();
    coordinator
        .confirm_payment(&staff_ctx(), 77)
        .await
        .unwrap();

    assert!(matches!(
        rx.try_recv(),
        Err(tokio::sync::broadcast::error::TryRecvError::Empty)
    ));
}
