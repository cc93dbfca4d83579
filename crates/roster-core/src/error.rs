// Error types for batch execution

use thiserror::Error;

/// Result type alias for batch operations
pub type Result<T> = std::result::Result<T, BatchError>;

/// Call-level failures. These fail the whole batch; nothing is partially
/// reported.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Input rejected before any work started
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The executor itself could not run the batch
    #[error("batch execution unavailable: {0}")]
    Systemic(String),
}

impl BatchError {
    /// Create an invalid-input error
    pub fn invalid(msg: impl Into<String>) -> Self {
        BatchError::InvalidInput(msg.into())
    }

    /// Create a systemic error
    pub fn systemic(msg: impl Into<String>) -> Self {
        BatchError::Systemic(msg.into())
    }
}

/// Per-item failures. Captured into the batch outcome, never raised to the
/// caller; siblings keep running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    /// The item exceeded the per-item timeout
    #[error("timed out")]
    Timeout,

    /// The item's unit of work returned an error or panicked
    #[error("{0}")]
    Failed(String),
}
