//! Message Handler for inbound client events
//!
//! Subscribes to the bus's inbound channel and maps each client action to
//! a coordinator call. The coordinator publishes its own domain events on
//! success; the handler only sends targeted failure replies.
//!
//! | action | coordinator call |
//! |---|---|
//! | `check_discount_code` | check_discount |
//! | `new_order_request` | place_order |
//! | `staff_request_payment` | request_payment |
//! | `staff_confirm_payment` | confirm_payment |

use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use serde::Deserialize;
use shared::message::{BusMessage, EventType, RequestCommandPayload, ResponsePayload};
use shared::order::{OperatorContext, PlaceOrderRequest};

use crate::message::MessageBus;
use crate::orders::OrderCoordinator;

#[derive(Debug, Deserialize)]
struct CodeParams {
    code: String,
}

#[derive(Debug, Deserialize)]
struct OrderIdParams {
    order_id: i64,
}

/// Server-side handler for the inbound event channel
///
/// Long-running background task; one instance per server.
pub struct MessageHandler {
    receiver: broadcast::Receiver<BusMessage>,
    bus: Arc<MessageBus>,
    coordinator: Arc<OrderCoordinator>,
    shutdown_token: CancellationToken,
}

impl MessageHandler {
    pub fn new(bus: Arc<MessageBus>, coordinator: Arc<OrderCoordinator>) -> Self {
        Self {
            receiver: bus.subscribe_inbound(),
            shutdown_token: bus.shutdown_token().clone(),
            bus,
            coordinator,
        }
    }

    /// Start processing messages
    ///
    /// This is a long-running task that should be spawned in the background.
    pub async fn run(mut self) {
        tracing::info!("Message handler started");

        loop {
            tokio::select! {
                // Listen for shutdown signal
                _ = self.shutdown_token.cancelled() => {
                    tracing::info!("Message handler shutting down");
                    break;
                }

                // Receive messages from bus
                msg_result = self.receiver.recv() => {
                    match msg_result {
                        Ok(msg) => self.handle_message(msg).await,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!("Message handler lagged, skipped {} messages", skipped);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::info!("Inbound channel closed");
                            break;
                        }
                    }
                }
            }
        }

        tracing::info!("Message handler stopped");
    }

    /// Handle a single inbound message
    ///
    /// Failures never crash the loop: they are logged and answered with a
    /// targeted error reply; unrelated in-flight operations are unaffected.
    async fn handle_message(&self, msg: BusMessage) {
        if msg.event_type != EventType::RequestCommand {
            tracing::debug!(event_type = %msg.event_type, "Ignoring non-request message");
            return;
        }

        let request: RequestCommandPayload = match msg.parse_payload() {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed request payload");
                return;
            }
        };
        let session_id = msg.source.clone().unwrap_or_default();
        let ctx = OperatorContext::new(
            request.operator_id,
            request.operator_name.clone(),
            session_id.clone(),
        );

        tracing::debug!(action = %request.action, session_id = %session_id, "Processing request");

        let outcome = self.dispatch(&ctx, &request).await;
        if let Err(reply) = outcome {
            let mut response = BusMessage::response(&session_id, &reply);
            if let Some(correlation) = msg.correlation_id {
                response = response.with_correlation_id(correlation);
            }
            self.bus.publish(response);
        }
    }

    /// Route one action to its coordinator call
    async fn dispatch(
        &self,
        ctx: &OperatorContext,
        request: &RequestCommandPayload,
    ) -> Result<(), ResponsePayload> {
        let params = request.params.clone().unwrap_or(serde_json::Value::Null);

        match request.action.as_str() {
            "check_discount_code" => {
                let params: CodeParams = parse_params(params)?;
                self.coordinator
                    .check_discount(ctx, &params.code)
                    .await
                    .map_err(|e| coordinator_failure(&request.action, e))?;
            }
            "new_order_request" => {
                let req: PlaceOrderRequest = parse_params(params)?;
                self.coordinator
                    .place_order(ctx, req)
                    .await
                    .map_err(|e| coordinator_failure(&request.action, e))?;
            }
            "staff_request_payment" => {
                let params: OrderIdParams = parse_params(params)?;
                self.coordinator
                    .request_payment(ctx, params.order_id)
                    .await
                    .map_err(|e| coordinator_failure(&request.action, e))?;
            }
            "staff_confirm_payment" => {
                let params: OrderIdParams = parse_params(params)?;
                self.coordinator
                    .confirm_payment(ctx, params.order_id)
                    .await
                    .map_err(|e| coordinator_failure(&request.action, e))?;
            }
            other => {
                tracing::warn!(action = %other, "No handler registered for action");
                return Err(ResponsePayload::error(
                    format!("Unknown action: {other}"),
                    Some("UNKNOWN_ACTION".to_string()),
                ));
            }
        }
        Ok(())
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
) -> Result<T, ResponsePayload> {
    serde_json::from_value(value).map_err(|e| {
        ResponsePayload::error(
            format!("Invalid parameters: {e}"),
            Some("INVALID_PARAMS".to_string()),
        )
    })
}

fn coordinator_failure(
    action: &str,
    err: crate::orders::CoordinatorError,
) -> ResponsePayload {
    tracing::error!(action, error = %err, "Coordinator operation failed");
    ResponsePayload::error(err.to_string(), Some(err.code().to_string()))
}
