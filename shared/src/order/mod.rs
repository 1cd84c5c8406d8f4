//! Order workflow types
//!
//! - **types**: status machine, cart input, operator context, coordinator
//!   results
//! - **event**: domain events fanned out to connected sessions

pub mod event;
pub mod types;

// Re-exports
pub use event::{
    CustomerBillItem, CustomerBillPayload, DiscountResultPayload, OrderAckPayload,
    PaymentSuccessPayload, PosEvent, StaffOrderPayload,
};
pub use types::{
    CartLineInput, OperatorContext, OrderStatus, PlaceOrderRequest, PlacedOrder, SkipReason,
    SkippedLine,
};
