mod compose;
mod customer;
mod error;
mod mail;
mod notifier;


pub use compose::{compose_failure_alert, compose_test_email, format_amount};
pub use customer::{Customer, CustomerDirectory, StripeCustomerDirectory};
pub use error::{CustomerLookupError, MailError};
pub use mail::{Addresses, EmailMessage, HttpMailer, Mailer};
pub use notifier::{NotifyOutcome, Notifier};

/// Shared outbound HTTP client settings for the external collaborators.
fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("payalert/", env!("CARGO_PKG_VERSION")))
        .build()
}
