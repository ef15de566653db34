use crate::event::WebhookError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PAYMENT_INTENT_FAILED: &str = "payment_intent.payment_failed";
pub const INVOICE_PAYMENT_FAILED: &str = "invoice.payment_failed";

/// Outer shape shared by every provider event.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default)]
    pub data: Option<EventData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    #[serde(default)]
    pub object: Option<Value>,
}

impl WebhookEnvelope {
    pub fn parse(body: &[u8]) -> Result<Self, WebhookError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Decode `data.object` into the type expected for this event.
    pub fn object<T: DeserializeOwned>(&self) -> Result<T, WebhookError> {
        let object = self
            .data
            .as_ref()
            .and_then(|d| d.object.clone())
            .ok_or_else(|| WebhookError::MissingObject {
                event_type: self.event_type.clone(),
            })?;

        serde_json::from_value(object).map_err(|source| WebhookError::InvalidObject {
            event_type: self.event_type.clone(),
            source,
        })
    }
}

/// A customer field is either a bare id or an expanded customer object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerRef {
    Id(String),
    Expanded { id: String },
}

impl CustomerRef {
    pub fn id(&self) -> &str {
        match self {
            CustomerRef::Id(id) => id,
            CustomerRef::Expanded { id } => id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentError {
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub decline_code: Option<String>,

    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,

    /// Minor currency units.
    pub amount: i64,

    pub currency: String,

    #[serde(default)]
    pub customer: Option<CustomerRef>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub last_payment_error: Option<PaymentError>,
}

impl PaymentIntent {
    pub fn customer_id(&self) -> Option<&str> {
        self.customer.as_ref().map(CustomerRef::id)
    }

    pub fn error_code(&self) -> Option<&str> {
        self.last_payment_error.as_ref()?.code.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.last_payment_error.as_ref()?.message.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,

    /// Minor currency units.
    pub amount_due: i64,

    pub currency: String,

    #[serde(default)]
    pub customer: Option<CustomerRef>,

    #[serde(default)]
    pub status: Option<String>,
}

impl Invoice {
    pub fn customer_id(&self) -> Option<&str> {
        self.customer.as_ref().map(CustomerRef::id)
    }
}

/// Convert provider minor units (cents) to major units.
pub fn minor_to_major(amount: i64) -> f64 {
    amount as f64 / 100.0
}
