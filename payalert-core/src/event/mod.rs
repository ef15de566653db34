mod error;
mod router;
mod types;

#[cfg(test)]
mod tests;

pub use error::WebhookError;
pub use router::{EventRouter, INVOICE_FAILURE_CODE, INVOICE_FAILURE_MESSAGE, WebhookReceipt};
pub use types::{
    CustomerRef, EventData, INVOICE_PAYMENT_FAILED, Invoice, PAYMENT_INTENT_FAILED, PaymentError,
    PaymentIntent, WebhookEnvelope, minor_to_major,
};
