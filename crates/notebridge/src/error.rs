//! Error types for the publisher.

use notebridge_core::{CoreError, KeyError, MiningError};
use notebridge_relay::PublishError;
use thiserror::Error;

/// Errors that can occur while finalizing or publishing an event.
#[derive(Debug, Error)]
pub enum PublisherError {
    /// Key material was rejected at configuration time.
    #[error("signing key invalid: {0}")]
    SigningKey(#[from] KeyError),

    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Encoding or signing failed.
    #[error("event error: {0}")]
    Event(#[from] CoreError),

    /// Proof-of-work did not complete.
    #[error("mining failed: {0}")]
    Mining(#[from] MiningError),

    /// The mining worker panicked or was aborted.
    #[error("mining worker failed: {0}")]
    Worker(String),

    /// No relay accepted the event.
    #[error("publication failed: {0}")]
    Publish(#[from] PublishError),
}

impl From<std::io::Error> for PublisherError {
    fn from(e: std::io::Error) -> Self {
        PublisherError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for PublisherError {
    fn from(e: serde_json::Error) -> Self {
        PublisherError::Config(e.to_string())
    }
}

/// Result type for publisher operations.
pub type Result<T> = std::result::Result<T, PublisherError>;
