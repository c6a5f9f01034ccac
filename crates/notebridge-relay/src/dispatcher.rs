//! Concurrent fan-out of one event to a set of relays.
//!
//! Every relay gets exactly one attempt, each in its own task and each
//! bounded by [`DispatchConfig::relay_timeout`]. The dispatcher waits for
//! all attempts before reporting, so one slow relay cannot hide the results
//! of the others, and one failing relay never cancels the rest.

use std::sync::Arc;
use std::time::{Duration, Instant};

use notebridge_core::Event;
use tracing::{debug, info, warn};

use crate::error::RelayError;
use crate::outcome::{PublishOutcome, RelayResult};
use crate::relay::Relay;

/// Configuration for dispatch behavior.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Upper bound on a single relay's send, including its verdict.
    pub relay_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            relay_timeout: Duration::from_secs(10),
        }
    }
}

/// Notified as each relay finishes.
pub trait DispatchObserver: Send + Sync {
    fn on_result(&self, result: &RelayResult);
}

impl<F> DispatchObserver for F
where
    F: Fn(&RelayResult) + Send + Sync,
{
    fn on_result(&self, result: &RelayResult) {
        self(result)
    }
}

/// Publishes events to relays.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Send `event` to every relay and collect the verdicts.
    ///
    /// Results are in the same order as `relays`.
    pub async fn publish(&self, event: Arc<Event>, relays: &[Arc<dyn Relay>]) -> PublishOutcome {
        self.publish_observed(event, relays, None).await
    }

    /// As [`publish`](Self::publish), reporting each result as it arrives.
    pub async fn publish_observed(
        &self,
        event: Arc<Event>,
        relays: &[Arc<dyn Relay>],
        observer: Option<Arc<dyn DispatchObserver>>,
    ) -> PublishOutcome {
        let event_id = *event.id();
        let timeout = self.config.relay_timeout;

        if relays.is_empty() {
            warn!(event = %event_id, "no relays to publish to");
            return PublishOutcome {
                event_id,
                results: Vec::new(),
            };
        }

        debug!(event = %event_id, relays = relays.len(), "dispatching");

        let handles: Vec<_> = relays
            .iter()
            .map(|relay| {
                let relay = Arc::clone(relay);
                let event = Arc::clone(&event);
                let observer = observer.clone();
                let url = relay.url().to_string();
                let handle = tokio::spawn(async move {
                    let result = send_one(relay.as_ref(), &event, timeout).await;
                    if let Some(observer) = &observer {
                        observer.on_result(&result);
                    }
                    result
                });
                (url, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (url, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    warn!(relay = %url, error = %e, "send task failed");
                    RelayResult {
                        url,
                        outcome: Err(RelayError::TaskFailed(e.to_string())),
                        elapsed: Duration::ZERO,
                    }
                }
            };
            results.push(result);
        }

        let accepted = results.iter().filter(|r| r.is_accepted()).count();
        if accepted == 0 {
            warn!(event = %event_id, relays = results.len(), "no relay accepted the event");
        } else {
            info!(
                event = %event_id,
                accepted,
                total = results.len(),
                "event published"
            );
        }

        PublishOutcome { event_id, results }
    }
}

async fn send_one(relay: &dyn Relay, event: &Event, timeout: Duration) -> RelayResult {
    let url = relay.url().to_string();
    let started = Instant::now();

    let outcome = match tokio::time::timeout(timeout, relay.send_event(event)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(RelayError::Timeout(timeout)),
    };
    let elapsed = started.elapsed();

    match &outcome {
        Ok(ack) if ack.duplicate => info!(relay = %url, ?elapsed, "relay already had event"),
        Ok(_) => info!(relay = %url, ?elapsed, "relay accepted event"),
        Err(error) => warn!(relay = %url, %error, ?elapsed, "relay failed"),
    }

    RelayResult {
        url,
        outcome,
        elapsed,
    }
}
