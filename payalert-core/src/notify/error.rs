use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail API key is not configured")]
    MissingCredentials,

    #[error("mail request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail API rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum CustomerLookupError {
    #[error("payment provider secret key is not configured")]
    MissingCredentials,

    #[error("invalid payment provider API base '{base}'")]
    InvalidBaseUrl { base: String },

    #[error("customer request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("customer lookup returned status {status}")]
    Status { status: u16 },
}
