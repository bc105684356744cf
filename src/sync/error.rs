//! Sync error types.

use thiserror::Error;

use crate::models::FAILED_STATUS_CODE;

/// Errors raised by an [`HttpTransport`](super::HttpTransport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout
    #[error("request timed out: {0}")]
    Timeout(String),
    /// Could not connect to the server
    #[error("connection failed: {0}")]
    Connection(String),
    /// Any other failure while building, sending or reading a request
    #[error("request failed: {0}")]
    Request(String),
}

/// Errors raised by a [`MessageStore`](super::MessageStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A stored row could not be turned into a message
    #[error("invalid message row: {0}")]
    InvalidRow(String),
}

/// Everything that can go wrong during one exchange with a sync endpoint.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to encode request body: {0}")]
    Encode(serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("failed to parse server response: {0}")]
    Parse(serde_json::Error),
}

impl SyncError {
    /// Status code reported for this failure: the HTTP status when the
    /// server answered, [`FAILED_STATUS_CODE`] otherwise.
    pub fn status_code(&self) -> i32 {
        match self {
            SyncError::Status(code) => i32::from(*code),
            _ => FAILED_STATUS_CODE,
        }
    }
}
