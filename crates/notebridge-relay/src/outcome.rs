//! Aggregate results of publishing one event to many relays.

use std::time::Duration;

use notebridge_core::EventId;

use crate::error::{PublishError, RelayError, RelayFailure};
use crate::messages::RelayAck;

/// What one relay did with the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResult {
    pub url: String,
    pub outcome: std::result::Result<RelayAck, RelayError>,
    /// Time from dispatch to verdict (or timeout).
    pub elapsed: Duration,
}

impl RelayResult {
    pub fn is_accepted(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Results for every relay the event was sent to, in relay order.
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    pub event_id: EventId,
    pub results: Vec<RelayResult>,
}

impl PublishOutcome {
    /// True if at least one relay accepted the event.
    pub fn published(&self) -> bool {
        self.results.iter().any(RelayResult::is_accepted)
    }

    /// URLs of relays that accepted the event.
    pub fn accepted(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.is_accepted())
            .map(|r| r.url.as_str())
            .collect()
    }

    /// Relays that refused or could not be reached.
    pub fn failures(&self) -> Vec<RelayFailure> {
        self.results
            .iter()
            .filter_map(|r| match &r.outcome {
                Ok(_) => None,
                Err(error) => Some(RelayFailure {
                    url: r.url.clone(),
                    error: error.clone(),
                }),
            })
            .collect()
    }

    /// One line per failed relay.
    pub fn warnings(&self) -> Vec<String> {
        self.failures().iter().map(ToString::to_string).collect()
    }

    /// Collapse into success if any relay accepted.
    pub fn into_result(self) -> std::result::Result<PublishReport, PublishError> {
        if self.results.is_empty() {
            return Err(PublishError::NoRelays);
        }
        if !self.published() {
            return Err(PublishError::AllRelaysFailed {
                event_id: self.event_id,
                failures: self.failures(),
            });
        }

        let accepted = self.accepted().into_iter().map(String::from).collect();
        let failures = self.failures();
        Ok(PublishReport {
            event_id: self.event_id,
            accepted,
            failures,
        })
    }
}

/// A successful publication, possibly with some relays failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub event_id: EventId,
    pub accepted: Vec<String>,
    pub failures: Vec<RelayFailure>,
}

impl PublishReport {
    /// Some relays failed even though the event went out.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }

    /// Human-readable status line.
    pub fn summary(&self) -> String {
        let total = self.accepted.len() + self.failures.len();
        let mut line = format!(
            "published {} to {}/{} relays",
            self.event_id,
            self.accepted.len(),
            total
        );
        if self.is_partial() {
            line.push_str(&format!(
                " (some relays failed, visibility may be limited: {})",
                self.warnings().join("; ")
            ));
        }
        line
    }
}
