use crate::conf::MailConfig;
use crate::notify::MailError;
use async_trait::async_trait;
use serde::Serialize;

/// Sender and recipient for every outgoing alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addresses {
    pub sender: String,
    pub recipient: String,
}

impl Addresses {
    pub fn from_config(cfg: &MailConfig) -> Self {
        Self {
            sender: cfg.from.clone(),
            recipient: cfg.recipient().to_string(),
        }
    }
}

/// A single outgoing email. Built per send, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    #[serde(rename = "html")]
    pub html_body: String,
}

/// Mail delivery collaborator.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

/// Delivers mail through an HTTP mail API that accepts a JSON
/// `{from, to, subject, html}` body with bearer authentication.
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl HttpMailer {
    pub fn new(cfg: &MailConfig) -> Result<Self, MailError> {
        Ok(Self {
            client: super::http_client()?,
            api_url: cfg.api_url.clone(),
            api_key: cfg.api_key.clone(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(MailError::MissingCredentials)?;

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(message)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(to = %message.to, status = status.as_u16(), "mail accepted");
        Ok(())
    }
}
