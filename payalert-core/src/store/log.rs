use crate::store::CappedLog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// Maximum number of entries retained by the [`LogStore`].
pub const LOG_CAPACITY: usize = 100;

/// Number of entries returned by a listing when no limit is given.
pub const DEFAULT_LOG_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// One operator-facing event. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Millisecond clock value, bumped when needed to stay strictly increasing.
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Recent-events buffer exposed on `/logs`.
#[derive(Debug)]
pub struct LogStore {
    entries: CappedLog<LogEntry>,
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LogStore {
    pub fn new() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: CappedLog::new(capacity),
        }
    }

    /// Record an event and mirror it to the process tracing output.
    pub fn append(&self, level: LogLevel, message: impl Into<String>, data: Option<Value>) -> LogEntry {
        let message = message.into();

        let entry = self.entries.push_with(|newest| {
            let timestamp = Utc::now();
            let clock = timestamp.timestamp_millis();
            let id = match newest {
                Some(prev) if prev.id >= clock => prev.id + 1,
                _ => clock,
            };

            LogEntry {
                id,
                timestamp,
                level,
                message,
                data,
            }
        });

        mirror_to_tracing(&entry);
        entry
    }

    pub fn info(&self, message: impl Into<String>, data: Option<Value>) -> LogEntry {
        self.append(LogLevel::Info, message, data)
    }

    pub fn warning(&self, message: impl Into<String>, data: Option<Value>) -> LogEntry {
        self.append(LogLevel::Warning, message, data)
    }

    pub fn error(&self, message: impl Into<String>, data: Option<Value>) -> LogEntry {
        self.append(LogLevel::Error, message, data)
    }

    /// The `limit` newest entries, newest first.
    pub fn list(&self, limit: usize) -> Vec<LogEntry> {
        self.entries.recent(limit)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn mirror_to_tracing(entry: &LogEntry) {
    let data = entry
        .data
        .as_ref()
        .map(Value::to_string)
        .unwrap_or_default();

    match entry.level {
        LogLevel::Info => tracing::info!(log_id = entry.id, data = %data, "{}", entry.message),
        LogLevel::Warning => tracing::warn!(log_id = entry.id, data = %data, "{}", entry.message),
        LogLevel::Error => tracing::error!(log_id = entry.id, data = %data, "{}", entry.message),
    }
}
