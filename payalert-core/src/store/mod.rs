mod capped;
mod failure;
mod log;

#[cfg(test)]
mod tests;

pub use capped::CappedLog;
pub use failure::{
    DEFAULT_FAILURE_LIMIT, FAILURE_CAPACITY, FailureKind, FailureRecord, FailureStore,
};
pub use log::{DEFAULT_LOG_LIMIT, LOG_CAPACITY, LogEntry, LogLevel, LogStore};
