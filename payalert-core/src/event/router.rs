use crate::event::{
    INVOICE_PAYMENT_FAILED, Invoice, PAYMENT_INTENT_FAILED, PaymentIntent, WebhookEnvelope,
    WebhookError, minor_to_major,
};
use crate::notify::{Notifier, NotifyOutcome};
use crate::store::{FailureKind, FailureRecord, FailureStore, LogStore};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

pub const INVOICE_FAILURE_CODE: &str = "invoice_payment_failed";
pub const INVOICE_FAILURE_MESSAGE: &str = "Invoice payment failed";

const DEFAULT_ERROR_CODE: &str = "unknown";
const DEFAULT_ERROR_MESSAGE: &str = "No error message";
const DEFAULT_STATUS: &str = "failed";

/// Acknowledgement returned to the webhook sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookReceipt {
    pub received: bool,
    #[serde(rename = "type")]
    pub event_type: String,
}

/// Classifies inbound provider events and fans them out to the stores and
/// the notifier.
///
/// Only payment intent failures trigger an alert. Invoice failures are
/// recorded without one.
pub struct EventRouter {
    logs: Arc<LogStore>,
    failures: Arc<FailureStore>,
    notifier: Arc<Notifier>,
}

impl EventRouter {
    pub fn new(logs: Arc<LogStore>, failures: Arc<FailureStore>, notifier: Arc<Notifier>) -> Self {
        Self {
            logs,
            failures,
            notifier,
        }
    }

    /// Handle a raw webhook body. Errors are logged before being returned.
    pub async fn handle(&self, body: &[u8]) -> Result<WebhookReceipt, WebhookError> {
        match self.dispatch(body).await {
            Ok(receipt) => Ok(receipt),
            Err(err) => {
                self.logs.error(
                    "Webhook processing error",
                    Some(json!({ "error": err.to_string() })),
                );
                Err(err)
            }
        }
    }

    async fn dispatch(&self, body: &[u8]) -> Result<WebhookReceipt, WebhookError> {
        let envelope = WebhookEnvelope::parse(body)?;

        match envelope.event_type.as_str() {
            PAYMENT_INTENT_FAILED => {
                let intent: PaymentIntent = envelope.object()?;
                self.on_payment_intent_failed(&intent).await;
            }

            INVOICE_PAYMENT_FAILED => {
                let invoice: Invoice = envelope.object()?;
                self.on_invoice_payment_failed(&invoice);
            }

            other => {
                self.logs.info(
                    format!("Unhandled event type: {other}"),
                    Some(json!({ "event_id": envelope.id, "type": other })),
                );
            }
        }

        Ok(WebhookReceipt {
            received: true,
            event_type: envelope.event_type,
        })
    }

    async fn on_payment_intent_failed(&self, intent: &PaymentIntent) {
        let amount = minor_to_major(intent.amount);

        self.logs.warning(
            "Payment failed",
            Some(json!({
                "payment_id": intent.id,
                "amount": amount,
                "currency": intent.currency,
                "customer": intent.customer_id(),
                "error_code": intent.error_code(),
                "error_message": intent.error_message(),
            })),
        );

        self.failures.append(FailureRecord {
            id: intent.id.clone(),
            amount,
            currency: intent.currency.clone(),
            customer: intent.customer_id().map(str::to_string),
            error_code: intent.error_code().unwrap_or(DEFAULT_ERROR_CODE).to_string(),
            error_message: intent
                .error_message()
                .unwrap_or(DEFAULT_ERROR_MESSAGE)
                .to_string(),
            timestamp: Utc::now(),
            status: intent.status.clone().unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            kind: None,
        });

        match self.notifier.notify_payment_failure(intent).await {
            NotifyOutcome::Sent { recipient } => {
                tracing::debug!(payment_id = %intent.id, %recipient, "alert delivered");
            }
            NotifyOutcome::Failed { error } => {
                tracing::debug!(payment_id = %intent.id, %error, "alert not delivered");
            }
        }
    }

    fn on_invoice_payment_failed(&self, invoice: &Invoice) {
        let amount = minor_to_major(invoice.amount_due);

        self.logs.warning(
            "Invoice payment failed",
            Some(json!({
                "invoice_id": invoice.id,
                "amount_due": amount,
                "customer": invoice.customer_id(),
            })),
        );

        self.failures.append(FailureRecord {
            id: invoice.id.clone(),
            amount,
            currency: invoice.currency.clone(),
            customer: invoice.customer_id().map(str::to_string),
            error_code: INVOICE_FAILURE_CODE.to_string(),
            error_message: INVOICE_FAILURE_MESSAGE.to_string(),
            timestamp: Utc::now(),
            status: invoice.status.clone().unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            kind: Some(FailureKind::Invoice),
        });
    }
}
