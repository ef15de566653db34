use crate::store::CappedLog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of failures retained by the [`FailureStore`].
pub const FAILURE_CAPACITY: usize = 50;

/// Number of failures returned by a listing when no limit is given.
pub const DEFAULT_FAILURE_LIMIT: usize = 20;

/// Tags failures that did not come from a payment intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Invoice,
}

/// Summary of one failed payment or invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub id: String,
    /// Major currency units (minor units / 100).
    pub amount: f64,
    pub currency: String,
    pub customer: Option<String>,
    pub error_code: String,
    pub error_message: String,
    pub timestamp: DateTime<Utc>,
    pub status: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
}

#[derive(Debug)]
pub struct FailureStore {
    records: CappedLog<FailureRecord>,
}

impl Default for FailureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FailureStore {
    pub fn new() -> Self {
        Self::with_capacity(FAILURE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: CappedLog::new(capacity),
        }
    }

    pub fn append(&self, record: FailureRecord) {
        self.records.push(record);
    }

    pub fn list(&self, limit: usize) -> Vec<FailureRecord> {
        self.records.recent(limit)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
