use crate::event::{PaymentIntent, minor_to_major};
use crate::notify::{Addresses, Customer, CustomerDirectory, Mailer, compose_failure_alert};
use crate::store::LogStore;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

/// Result of a best-effort alert.
///
/// Delivery problems are reported here instead of as an `Err`: a broken mail
/// channel must never fail the request that triggered the alert.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent { recipient: String },
    Failed { error: String },
}

impl NotifyOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, NotifyOutcome::Sent { .. })
    }
}

/// Composes and dispatches payment failure alerts.
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    customers: Arc<dyn CustomerDirectory>,
    logs: Arc<LogStore>,
    addresses: Addresses,
}

impl Notifier {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        customers: Arc<dyn CustomerDirectory>,
        logs: Arc<LogStore>,
        addresses: Addresses,
    ) -> Self {
        Self {
            mailer,
            customers,
            logs,
            addresses,
        }
    }

    pub fn addresses(&self) -> &Addresses {
        &self.addresses
    }

    pub async fn notify_payment_failure(&self, intent: &PaymentIntent) -> NotifyOutcome {
        let customer = match intent.customer_id() {
            Some(customer_id) => self.resolve_customer(customer_id, &intent.id).await,
            None => None,
        };

        let message =
            compose_failure_alert(intent, customer.as_ref(), &self.addresses, Utc::now());

        match self.mailer.send(&message).await {
            Ok(()) => {
                self.logs.info(
                    "Payment failure alert sent",
                    Some(json!({
                        "payment_id": intent.id,
                        "amount": minor_to_major(intent.amount),
                        "recipient": message.to,
                    })),
                );
                NotifyOutcome::Sent {
                    recipient: message.to,
                }
            }
            Err(err) => {
                let error = err.to_string();
                self.logs.error(
                    "Failed to send payment failure alert",
                    Some(json!({
                        "error": error,
                        "payment_id": intent.id,
                    })),
                );
                NotifyOutcome::Failed { error }
            }
        }
    }

    // Lookup problems only cost the alert its customer section.
    async fn resolve_customer(&self, customer_id: &str, payment_id: &str) -> Option<Customer> {
        match self.customers.retrieve_customer(customer_id).await {
            Ok(customer) => Some(customer),
            Err(err) => {
                self.logs.warning(
                    "Could not retrieve customer details",
                    Some(json!({
                        "customer_id": customer_id,
                        "payment_id": payment_id,
                        "error": err.to_string(),
                    })),
                );
                None
            }
        }
    }
}
