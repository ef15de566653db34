use integration_tests::harness::{RecordingMailer, TestServer, captured_events};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::OnceLock;

static SERVER: OnceLock<TestServer> = OnceLock::new();

fn server() -> &'static TestServer {
    SERVER.get_or_init(|| TestServer::start(RecordingMailer::ok()))
}

fn failed_intent_event(payment_id: &str) -> Value {
    json!({
        "id": format!("evt_{payment_id}"),
        "type": "payment_intent.payment_failed",
        "data": {
            "object": {
                "id": payment_id,
                "object": "payment_intent",
                "amount": 4999,
                "currency": "eur",
                "customer": "cus_it_missing",
                "status": "requires_payment_method",
                "last_payment_error": {
                    "code": "insufficient_funds",
                    "message": "Your card has insufficient funds.",
                    "type": "card_error"
                }
            }
        }
    })
}

fn failures() -> Vec<Value> {
    server()
        .get("/failures?limit=50")
        .send()
        .expect("request failed")
        .json()
        .expect("failures should be JSON")
}

fn log_messages() -> Vec<String> {
    let logs: Vec<Value> = server()
        .get("/logs?limit=100")
        .send()
        .expect("request failed")
        .json()
        .expect("logs should be JSON");

    logs.iter()
        .filter_map(|entry| entry["message"].as_str().map(str::to_string))
        .collect()
}

#[test]
fn failed_payment_intent_is_recorded_and_alerted() {
    // Arrange
    let server = server();

    // Act
    let res = server
        .post("/webhook/stripe")
        .json(&failed_intent_event("pi_it_alerted"))
        .send()
        .expect("request failed");

    // Assert
    assert_eq!(res.status(), 200);
    let body: Value = res.json().unwrap();
    assert_eq!(
        body,
        json!({ "received": true, "type": "payment_intent.payment_failed" })
    );

    let record = failures()
        .into_iter()
        .find(|r| r["id"] == "pi_it_alerted")
        .expect("failure should be recorded");
    assert_eq!(record["amount"], json!(49.99));
    assert_eq!(record["currency"], "eur");
    assert_eq!(record["customer"], "cus_it_missing");
    assert_eq!(record["error_code"], "insufficient_funds");
    assert_eq!(record["status"], "requires_payment_method");
    assert!(record.get("type").is_none());

    let alert = server
        .mail_attempts()
        .into_iter()
        .find(|m| m.html_body.contains("pi_it_alerted"))
        .expect("alert should be sent");
    assert_eq!(alert.subject, "Payment failed: 49.99 EUR");
    assert_eq!(alert.to, "ops@example.com");

    // The customer could not be resolved, so the alert omits that section.
    assert!(!alert.html_body.contains("<h3>Customer</h3>"));
    let messages = log_messages();
    assert!(messages.iter().any(|m| m == "Could not retrieve customer details"));
    assert!(messages.iter().any(|m| m == "Payment failure alert sent"));
}

#[test]
fn invoice_failure_is_recorded_without_alert() {
    // Arrange
    let server = server();
    let event = json!({
        "id": "evt_in_it",
        "type": "invoice.payment_failed",
        "data": {
            "object": {
                "id": "in_it_quiet",
                "object": "invoice",
                "amount_due": 1200,
                "currency": "usd",
                "customer": "cus_it_invoice",
                "status": "open"
            }
        }
    });

    // Act
    let res = server
        .post("/webhook/stripe")
        .json(&event)
        .send()
        .expect("request failed");

    // Assert
    assert_eq!(res.status(), 200);

    let record = failures()
        .into_iter()
        .find(|r| r["id"] == "in_it_quiet")
        .expect("invoice failure should be recorded");
    assert_eq!(record["type"], "invoice");
    assert_eq!(record["amount"], json!(12.0));
    assert_eq!(record["error_code"], "invoice_payment_failed");
    assert_eq!(record["error_message"], "Invoice payment failed");

    assert!(
        server
            .mail_attempts()
            .iter()
            .all(|m| !m.html_body.contains("in_it_quiet"))
    );
}

#[test]
fn unhandled_event_type_is_acknowledged_and_logged() {
    // Arrange
    let server = server();
    let event = json!({
        "id": "evt_customer_it",
        "type": "customer.created",
        "data": { "object": { "id": "cus_it_new" } }
    });

    // Act
    let res = server
        .post("/webhook/stripe")
        .json(&event)
        .send()
        .expect("request failed");

    // Assert
    assert_eq!(res.status(), 200);
    let body: Value = res.json().unwrap();
    assert_eq!(body["type"], "customer.created");
    assert!(
        log_messages()
            .iter()
            .any(|m| m == "Unhandled event type: customer.created")
    );
    assert!(failures().iter().all(|r| r["id"] != "cus_it_new"));
}

#[test]
fn malformed_body_is_rejected_with_plain_text() {
    // Arrange
    let server = server();

    // Act
    let res = server
        .post("/webhook/stripe")
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .expect("request failed");

    // Assert
    assert_eq!(res.status(), 400);
    let body = res.text().unwrap();
    assert!(body.starts_with("Webhook Error: "), "got {body}");
    assert!(
        log_messages()
            .iter()
            .any(|m| m == "Webhook processing error")
    );
}

#[test]
fn store_events_are_mirrored_to_tracing() {
    // Arrange
    let server = server();

    // Act
    let res = server
        .post("/webhook/stripe")
        .json(&failed_intent_event("pi_it_traced"))
        .send()
        .expect("request failed");

    // Assert
    assert_eq!(res.status(), 200);
    let events = captured_events();
    assert!(
        events
            .iter()
            .any(|e| e.level == tracing::Level::WARN && e.message() == Some("Payment failed")),
        "expected a mirrored WARNING event"
    );
}
