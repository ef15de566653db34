use async_trait::async_trait;
use payalert_core::notify::{
    Customer, CustomerDirectory, CustomerLookupError, EmailMessage, MailError, Mailer,
};
use std::sync::{Arc, Mutex};

/// Mailer that keeps every message instead of delivering it.
#[derive(Default)]
pub struct RecordingMailer {
    fail: bool,
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingMailer {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Rejects every message, as an unreachable mail provider would.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn attempts(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(message.clone());
        if self.fail {
            Err(MailError::Rejected {
                status: 502,
                body: "upstream mail provider unreachable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

/// Directory where every lookup fails.
pub struct NoCustomers;

#[async_trait]
impl CustomerDirectory for NoCustomers {
    async fn retrieve_customer(&self, _customer_id: &str) -> Result<Customer, CustomerLookupError> {
        Err(CustomerLookupError::MissingCredentials)
    }
}
