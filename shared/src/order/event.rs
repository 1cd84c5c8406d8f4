//! Domain events - fanned out to connected sessions after a commit
//!
//! The serialized `event` tag is the wire name each dashboard listens for.
//! Events are fire-and-forget: a session that missed one re-fetches state
//! through the read API instead of relying on replay.

use super::types::SkippedLine;
use serde::{Deserialize, Serialize};

/// POS domain event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum PosEvent {
    /// New order placed; staff dashboards append an order card
    UpdateStaffOrders(StaffOrderPayload),
    /// Private acknowledgment to the submitting session
    OrderSuccessResponse(OrderAckPayload),
    /// Bill issued; customer dashboards show the QR / totals panel
    ShowCustomerQr(CustomerBillPayload),
    /// Payment confirmed; all dashboards refresh their order lists
    PaymentSuccess(PaymentSuccessPayload),
    /// Discount validation reply (targeted only, never broadcast)
    DiscountResult(DiscountResultPayload),
}

impl PosEvent {
    /// Wire name of the event (the serde tag)
    pub fn name(&self) -> &'static str {
        match self {
            PosEvent::UpdateStaffOrders(_) => "update_staff_orders",
            PosEvent::OrderSuccessResponse(_) => "order_success_response",
            PosEvent::ShowCustomerQr(_) => "show_customer_qr",
            PosEvent::PaymentSuccess(_) => "payment_success",
            PosEvent::DiscountResult(_) => "discount_result",
        }
    }
}

/// Staff order card: `{id, customer, details, total, time, discount}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffOrderPayload {
    pub id: i64,
    /// Customer display name
    pub customer: String,
    /// Human-readable line summary ("Espresso x2, Flat White x1")
    pub details: String,
    /// Final total after discount
    pub total: f64,
    /// Creation time, HH:MM in the business timezone
    pub time: String,
    pub discount: f64,
}

/// Private order acknowledgment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAckPayload {
    pub order_id: i64,
    pub msg: String,
    /// Cart lines that were dropped (unknown / inactive / out of stock)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedLine>,
}

/// Itemized bill for the customer payment panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerBillPayload {
    /// Final total after discount
    pub total: f64,
    pub raw_total: f64,
    /// Discount amount (not percent)
    pub discount: f64,
    pub items: Vec<CustomerBillItem>,
}

/// One bill line: customization folds into the name in parentheses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerBillItem {
    pub name: String,
    pub qty: i64,
    pub subtotal: f64,
}

/// Payment success carries no payload; dashboards re-fetch their lists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentSuccessPayload {}

/// Discount validation reply: `{valid, percent?, code?, msg?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountResultPayload {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl DiscountResultPayload {
    pub fn valid(code: impl Into<String>, percent: f64) -> Self {
        Self {
            valid: true,
            percent: Some(percent),
            code: Some(code.into()),
            msg: None,
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self {
            valid: false,
            percent: None,
            code: None,
            msg: Some(msg.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_names() {
        let ev = PosEvent::PaymentSuccess(PaymentSuccessPayload::default());
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["event"], "payment_success");
        assert_eq!(json["data"], serde_json::json!({}));
        assert_eq!(ev.name(), "payment_success");
    }

    #[test]
    fn test_discount_result_omits_empty_fields() {
        let invalid = DiscountResultPayload::invalid("Invalid code");
        let json = serde_json::to_value(&invalid).unwrap();
        assert_eq!(json["valid"], false);
        assert!(json.get("percent").is_none());
        assert!(json.get("code").is_none());

        let valid = DiscountResultPayload::valid("SAVE10", 10.0);
        let json = serde_json::to_value(&valid).unwrap();
        assert_eq!(json["code"], "SAVE10");
        assert_eq!(json["percent"], 10.0);
        assert!(json.get("msg").is_none());
    }
}
