//! Order lifecycle module
//!
//! The [`OrderCoordinator`] drives the order/payment state machine:
//!
//! ```text
//! place_order ──▶ PENDING ──request_payment──▶ PAYING ──confirm_payment──▶ COMPLETED
//!      │                          │                          │
//!      ▼                          ▼                          ▼
//! update_staff_orders       show_customer_qr           payment_success
//! (staff-channel)           (customer-channel)         (all sessions)
//! ```
//!
//! Every mutation commits before its event is published; a failed
//! transaction rolls back completely and emits nothing.

pub mod coordinator;

pub use coordinator::{CoordinatorError, CoordinatorResult, OrderCoordinator};
