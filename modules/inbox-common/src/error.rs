//! Typed errors shared across the inbox crates.

use thiserror::Error;

/// Text surfaced on `ActionStatus::error` after a rejected mutation.
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update. Please try again.";

/// The only domain failure: the remote side refused a read-status change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("read-status update rejected for {id}")]
    Rejected { id: String },
}

/// Invalid configuration values read from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("failure rate must be within [0, 1], got {0}")]
    FailureRateOutOfRange(f64),

    #[error("arrival interval is empty: min {min_ms}ms > max {max_ms}ms")]
    EmptyArrivalInterval { min_ms: u64, max_ms: u64 },

    #[error("page size must be at least 1")]
    ZeroPageSize,
}
