use crate::store::{FAILURE_CAPACITY, FailureKind, FailureRecord, FailureStore};
use chrono::Utc;
use pretty_assertions::assert_eq;

fn record(id: &str, kind: Option<FailureKind>) -> FailureRecord {
    FailureRecord {
        id: id.to_string(),
        amount: 25.0,
        currency: "usd".to_string(),
        customer: None,
        error_code: "card_declined".to_string(),
        error_message: "Your card was declined.".to_string(),
        timestamp: Utc::now(),
        status: "requires_payment_method".to_string(),
        kind,
    }
}

#[test]
fn retains_only_the_newest_fifty_records() {
    // Arrange
    let store = FailureStore::new();

    // Act
    for i in 0..80 {
        store.append(record(&format!("pi_{i}"), None));
    }

    // Assert
    let records = store.list(usize::MAX);
    assert_eq!(records.len(), FAILURE_CAPACITY);
    let ids: Vec<_> = records.iter().map(|r| r.id.clone()).collect();
    let expected: Vec<_> = (30..80).rev().map(|i| format!("pi_{i}")).collect();
    assert_eq!(ids, expected);
}

#[test]
fn list_never_exceeds_limit() {
    // Arrange
    let store = FailureStore::new();
    for i in 0..3 {
        store.append(record(&format!("pi_{i}"), None));
    }

    // Act / Assert
    assert_eq!(store.list(2).len(), 2);
    assert_eq!(store.list(10).len(), 3);
    assert_eq!(store.list(0).len(), 0);
    assert_eq!(store.len(), 3);
}

#[test]
fn invoice_kind_serializes_as_type_tag() {
    let with_kind = serde_json::to_value(record("in_1", Some(FailureKind::Invoice))).unwrap();
    let without_kind = serde_json::to_value(record("pi_1", None)).unwrap();

    assert_eq!(with_kind["type"], "invoice");
    assert!(without_kind.get("type").is_none());
    assert!(without_kind["customer"].is_null());
}
