use crate::event::{EventRouter, INVOICE_FAILURE_CODE, INVOICE_FAILURE_MESSAGE, WebhookError};
use crate::notify::tests::fakes::{RecordingMailer, StaticCustomers, notifier};
use crate::store::{FailureKind, FailureStore, LogLevel, LogStore};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;

struct Fixture {
    router: EventRouter,
    logs: Arc<LogStore>,
    failures: Arc<FailureStore>,
    mailer: Arc<RecordingMailer>,
}

fn fixture(mailer: Arc<RecordingMailer>) -> Fixture {
    let logs = Arc::new(LogStore::new());
    let failures = Arc::new(FailureStore::new());
    let notifier = Arc::new(notifier(
        mailer.clone(),
        StaticCustomers::empty(),
        logs.clone(),
    ));

    Fixture {
        router: EventRouter::new(logs.clone(), failures.clone(), notifier),
        logs,
        failures,
        mailer,
    }
}

fn payment_failed_event() -> Value {
    json!({
        "id": "evt_pi",
        "type": "payment_intent.payment_failed",
        "data": { "object": {
            "id": "pi_1",
            "amount": 2500,
            "currency": "usd",
            "customer": null,
            "status": "requires_payment_method",
            "last_payment_error": { "code": "card_declined", "message": "Your card was declined." }
        }}
    })
}

fn invoice_failed_event() -> Value {
    json!({
        "id": "evt_in",
        "type": "invoice.payment_failed",
        "data": { "object": {
            "id": "in_1",
            "amount_due": 4999,
            "currency": "eur",
            "customer": "cus_5",
            "status": "open"
        }}
    })
}

#[tokio::test]
async fn payment_intent_failure_records_and_notifies_once() {
    // Arrange
    let fx = fixture(RecordingMailer::ok());

    // Act
    let receipt = fx
        .router
        .handle(payment_failed_event().to_string().as_bytes())
        .await
        .unwrap();

    // Assert
    assert!(receipt.received);
    assert_eq!(receipt.event_type, "payment_intent.payment_failed");

    let failures = fx.failures.list(10);
    assert_eq!(failures.len(), 1);
    let record = &failures[0];
    assert_eq!(record.id, "pi_1");
    assert_eq!(record.amount, 25.0);
    assert_eq!(record.currency, "usd");
    assert_eq!(record.customer, None);
    assert_eq!(record.error_code, "card_declined");
    assert_eq!(record.error_message, "Your card was declined.");
    assert_eq!(record.status, "requires_payment_method");
    assert_eq!(record.kind, None);

    assert_eq!(fx.mailer.attempts().len(), 1);

    let levels: Vec<_> = fx.logs.list(10).iter().map(|e| e.level).collect();
    assert_eq!(levels, vec![LogLevel::Info, LogLevel::Warning]);
}

#[tokio::test]
async fn payment_intent_failure_defaults_missing_error_fields() {
    // Arrange
    let fx = fixture(RecordingMailer::ok());
    let event = json!({
        "type": "payment_intent.payment_failed",
        "data": { "object": { "id": "pi_2", "amount": 100, "currency": "gbp" } }
    });

    // Act
    fx.router
        .handle(event.to_string().as_bytes())
        .await
        .unwrap();

    // Assert
    let record = &fx.failures.list(1)[0];
    assert_eq!(record.error_code, "unknown");
    assert_eq!(record.error_message, "No error message");
    assert_eq!(record.status, "failed");
}

#[tokio::test]
async fn mail_failure_does_not_fail_the_webhook() {
    // Arrange
    let fx = fixture(RecordingMailer::failing());

    // Act
    let receipt = fx
        .router
        .handle(payment_failed_event().to_string().as_bytes())
        .await
        .unwrap();

    // Assert
    assert!(receipt.received);
    assert_eq!(receipt.event_type, "payment_intent.payment_failed");
    assert_eq!(fx.failures.len(), 1);
    assert_eq!(fx.logs.list(1)[0].level, LogLevel::Error);
}

#[tokio::test]
async fn invoice_failure_records_without_notifying() {
    // Arrange
    let fx = fixture(RecordingMailer::ok());

    // Act
    let receipt = fx
        .router
        .handle(invoice_failed_event().to_string().as_bytes())
        .await
        .unwrap();

    // Assert
    assert_eq!(receipt.event_type, "invoice.payment_failed");

    let record = &fx.failures.list(1)[0];
    assert_eq!(record.id, "in_1");
    assert_eq!(record.amount, 49.99);
    assert_eq!(record.currency, "eur");
    assert_eq!(record.customer.as_deref(), Some("cus_5"));
    assert_eq!(record.error_code, INVOICE_FAILURE_CODE);
    assert_eq!(record.error_message, INVOICE_FAILURE_MESSAGE);
    assert_eq!(record.kind, Some(FailureKind::Invoice));

    assert!(fx.mailer.attempts().is_empty());

    let entries = fx.logs.list(10);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, LogLevel::Warning);
    assert_eq!(entries[0].data.as_ref().unwrap()["invoice_id"], "in_1");
}

#[tokio::test]
async fn unhandled_type_logs_one_info_entry_only() {
    // Arrange
    let fx = fixture(RecordingMailer::ok());
    let event = json!({ "id": "evt_x", "type": "customer.created", "data": { "object": {} } });

    // Act
    let receipt = fx
        .router
        .handle(event.to_string().as_bytes())
        .await
        .unwrap();

    // Assert
    assert_eq!(receipt.event_type, "customer.created");
    assert!(fx.failures.is_empty());
    assert!(fx.mailer.attempts().is_empty());

    let entries = fx.logs.list(10);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, LogLevel::Info);
    assert!(entries[0].message.contains("customer.created"));
}

#[tokio::test]
async fn malformed_payload_is_logged_and_returned() {
    // Arrange
    let fx = fixture(RecordingMailer::ok());
    let event = json!({
        "type": "payment_intent.payment_failed",
        "data": { "object": { "id": "pi_3", "amount": "lots", "currency": "usd" } }
    });

    // Act
    let err = fx
        .router
        .handle(event.to_string().as_bytes())
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(err, WebhookError::InvalidObject { .. }));
    assert!(fx.failures.is_empty());

    let entries = fx.logs.list(10);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, LogLevel::Error);
    assert_eq!(
        entries[0].data.as_ref().unwrap()["error"],
        Value::String(err.to_string())
    );
}

#[test]
fn receipt_serializes_type_field() {
    let receipt = crate::event::WebhookReceipt {
        received: true,
        event_type: "invoice.payment_failed".to_string(),
    };

    assert_eq!(
        serde_json::to_value(receipt).unwrap(),
        json!({ "received": true, "type": "invoice.payment_failed" })
    );
}
