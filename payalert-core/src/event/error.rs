use thiserror::Error;

/// Payload-shape problems on the webhook intake. Surfaced to the caller as a
/// client error.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("event {event_type} is missing data.object")]
    MissingObject { event_type: String },

    #[error("malformed {event_type} object: {source}")]
    InvalidObject {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },
}
