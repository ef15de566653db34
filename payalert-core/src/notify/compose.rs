use crate::event::{PaymentIntent, minor_to_major};
use crate::notify::{Addresses, Customer, EmailMessage};
use chrono::{DateTime, Utc};

const UNKNOWN_CODE: &str = "Unknown";
const UNKNOWN_MESSAGE: &str = "No specific error message";
const NOT_PROVIDED: &str = "Not provided";

/// Minor units rendered as a two-decimal major amount, e.g. `2500 -> "25.00"`.
pub fn format_amount(minor: i64) -> String {
    format!("{:.2}", minor_to_major(minor))
}

/// Build the operator alert for a failed payment intent.
pub fn compose_failure_alert(
    intent: &PaymentIntent,
    customer: Option<&Customer>,
    addresses: &Addresses,
    sent_at: DateTime<Utc>,
) -> EmailMessage {
    let amount = format_amount(intent.amount);
    let currency = intent.currency.to_uppercase();
    let status = intent.status.as_deref().unwrap_or("unknown");
    let code = intent.error_code().unwrap_or(UNKNOWN_CODE);
    let message = intent.error_message().unwrap_or(UNKNOWN_MESSAGE);

    let payment_rows = [
        row("Amount", &format!("{amount} {currency}")),
        row("Payment ID", &intent.id),
        row("Status", status),
        row("Failure code", code),
        row("Failure message", message),
        row("Time", &sent_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
    ]
    .concat();

    let customer_section = match customer {
        Some(customer) => {
            let customer_rows = [
                row("Name", customer.name.as_deref().unwrap_or(NOT_PROVIDED)),
                row("Email", customer.email.as_deref().unwrap_or(NOT_PROVIDED)),
                row("Customer ID", non_empty(&customer.id).unwrap_or(NOT_PROVIDED)),
            ]
            .concat();
            format!("<h3>Customer</h3>\n<table>\n{customer_rows}</table>\n")
        }
        None => String::new(),
    };

    let html_body = format!(
        "<h2>Payment failed</h2>\n\
         <p>A payment attempt failed and may need attention.</p>\n\
         <h3>Payment</h3>\n<table>\n{payment_rows}</table>\n\
         {customer_section}\
         <p>Review this payment in the Stripe dashboard.</p>\n"
    );

    EmailMessage {
        from: addresses.sender.clone(),
        to: addresses.recipient.clone(),
        subject: format!("Payment failed: {amount} {currency}"),
        html_body,
    }
}

/// Fixed message for checking the mail channel end to end.
pub fn compose_test_email(addresses: &Addresses, sent_at: DateTime<Utc>) -> EmailMessage {
    EmailMessage {
        from: addresses.sender.clone(),
        to: addresses.recipient.clone(),
        subject: "Payment alert test email".to_string(),
        html_body: format!(
            "<h2>Test successful</h2>\n\
             <p>Payment failure alerts will be delivered to this address.</p>\n\
             <p>Sent at {}</p>\n",
            sent_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
    }
}

fn row(label: &str, value: &str) -> String {
    format!(
        "<tr><td><strong>{}</strong></td><td>{}</td></tr>\n",
        label,
        escape_html(value)
    )
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
