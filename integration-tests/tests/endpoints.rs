use integration_tests::harness::{RecordingMailer, TestServer};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::OnceLock;

static SERVER: OnceLock<TestServer> = OnceLock::new();

fn server() -> &'static TestServer {
    SERVER.get_or_init(|| TestServer::start(RecordingMailer::ok()))
}

fn get_json(path: &str) -> (u16, Value) {
    let res = server().get(path).send().expect("request failed");
    let status = res.status().as_u16();
    (status, res.json().expect("body should be JSON"))
}

#[test]
fn banner_lists_endpoints() {
    // Act
    let (status, body) = get_json("/");

    // Assert
    assert_eq!(status, 200);
    assert_eq!(body["status"], "running");
    assert_eq!(body["service"], "Stripe Payment Failure Notifier");
    assert_eq!(body["endpoints"].as_object().unwrap().len(), 7);
    assert!(body["logs_count"].is_u64());
    assert!(body["recent_failures"].is_u64());
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
}

#[test]
fn health_reports_status_and_memory() {
    // Act
    let (status, body) = get_json("/health");

    // Assert
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
    assert!(body.get("memory").is_some());
}

#[test]
fn logs_respect_limit_and_newest_first() {
    // Arrange
    for _ in 0..4 {
        let res = server().post("/test").send().expect("request failed");
        assert_eq!(res.status(), 200);
    }

    // Act
    let (status, body) = get_json("/logs?limit=3");

    // Assert
    assert_eq!(status, 200);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 3);

    let ids: Vec<i64> = entries.iter().map(|e| e["id"].as_i64().unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] > w[1]), "ids not descending: {ids:?}");
}

#[test]
fn invalid_limit_falls_back_to_default() {
    // Act
    let (status, body) = get_json("/failures?limit=abc");

    // Assert
    assert_eq!(status, 200);
    assert!(body.as_array().unwrap().len() <= 20);
}

#[test]
fn test_trigger_sends_mock_alert() {
    // Act
    let res = server().post("/test").send().expect("request failed");

    // Assert
    assert_eq!(res.status(), 200);
    let body: Value = res.json().unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["test_data"]["amount"], 2500);
    assert_eq!(body["test_data"]["currency"], "usd");

    let payment_id = body["test_data"]["id"].as_str().unwrap().to_string();
    assert!(payment_id.starts_with("pi_test_"));
    assert!(
        server()
            .mail_attempts()
            .iter()
            .any(|m| m.subject == "Payment failed: 25.00 USD" && m.html_body.contains(&payment_id))
    );

    // The mock payment is never recorded as a failure.
    let (_, failures) = get_json("/failures?limit=50");
    assert!(
        failures
            .as_array()
            .unwrap()
            .iter()
            .all(|r| r["id"] != payment_id.as_str())
    );
}

#[test]
fn test_email_is_delivered() {
    // Act
    let res = server().post("/test-email").send().expect("request failed");

    // Assert
    assert_eq!(res.status(), 200);
    let body: Value = res.json().unwrap();
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Test email sent successfully",
            "recipient": "ops@example.com",
        })
    );
    assert!(
        server()
            .mail_attempts()
            .iter()
            .any(|m| m.subject == "Payment alert test email")
    );
}

#[test]
fn unknown_route_is_not_found() {
    // Act
    let (status, body) = get_json("/nope");

    // Assert
    assert_eq!(status, 404);
    assert_eq!(body, json!({ "error": "Not found", "path": "/nope" }));
}

#[test]
fn wrong_method_is_not_found() {
    // Act
    let res = server().get("/webhook/stripe").send().expect("request failed");

    // Assert
    assert_eq!(res.status(), 404);
}
