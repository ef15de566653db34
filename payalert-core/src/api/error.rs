use thiserror::Error;

/// Anything that escapes an endpoint handler. Always answered with a generic
/// server error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("json serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to read request body: {0}")]
    Body(String),
}
