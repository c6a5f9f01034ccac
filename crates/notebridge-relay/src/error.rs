//! Error types for the relay module.

use std::fmt;
use std::time::Duration;

use notebridge_core::EventId;
use thiserror::Error;

use crate::messages::OkPrefix;

/// Failure of a single relay for a single event.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    /// The relay answered and refused the event.
    #[error("rejected: {reason}")]
    Rejected {
        prefix: Option<OkPrefix>,
        reason: String,
    },

    /// The relay could not be reached.
    #[error("unreachable: {0}")]
    Unreachable(String),

    /// No answer within the per-relay timeout.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The relay answered with something we could not interpret.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The send task panicked or was aborted.
    #[error("send task failed: {0}")]
    TaskFailed(String),
}

/// A relay failure tagged with the relay it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayFailure {
    pub url: String,
    pub error: RelayError,
}

impl fmt::Display for RelayFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.url, self.error)
    }
}

/// Publication failed as a whole.
#[derive(Debug, Clone, Error)]
pub enum PublishError {
    /// There was nowhere to send the event.
    #[error("no relays configured")]
    NoRelays,

    /// Every relay refused or was unreachable.
    #[error("all {} relays failed for event {event_id}", .failures.len())]
    AllRelaysFailed {
        event_id: EventId,
        failures: Vec<RelayFailure>,
    },
}

/// Result type for single-relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;
