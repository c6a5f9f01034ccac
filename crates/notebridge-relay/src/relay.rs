//! Relay abstraction.
//!
//! A relay accepts signed events and answers with an `OK` verdict.
//! Implementations may use WebSockets, HTTP, or anything else; connection
//! management belongs to the implementor.

use async_trait::async_trait;
use notebridge_core::Event;

use crate::error::Result;
use crate::messages::RelayAck;

/// A publication endpoint.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Relay: Send + Sync {
    /// Address used for logging and failure reports.
    fn url(&self) -> &str;

    /// Deliver one event and wait for the relay's verdict.
    ///
    /// No retries; the dispatcher bounds the call with its own timeout.
    async fn send_event(&self, event: &Event) -> Result<RelayAck>;
}

/// In-memory relays for testing.
///
/// Events are encoded to the JSON wire form on the way in and verdicts on
/// the way out, so tests exercise the same messages a network relay sees.
pub mod memory {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use std::time::Duration;

    use notebridge_core::{validate_event, validate_pow, EventId};
    use tokio::sync::RwLock;

    use crate::error::RelayError;
    use crate::messages::{ClientMessage, OkPrefix, RelayMessage};

    /// How a memory relay responds to events.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RelayBehavior {
        /// Validate and store.
        Accept,
        /// Answer `OK false` with this message.
        Reject(String),
        /// Fail before any message is exchanged.
        Unreachable,
        /// Wait, then behave as `Accept`.
        Delay(Duration),
    }

    /// A single in-memory relay.
    pub struct MemoryRelay {
        url: String,
        behavior: RwLock<RelayBehavior>,
        min_pow: u32,
        events: RwLock<Vec<Event>>,
        seen: RwLock<HashSet<EventId>>,
    }

    impl MemoryRelay {
        /// Create an accepting relay.
        pub fn new(url: impl Into<String>) -> Self {
            Self {
                url: url.into(),
                behavior: RwLock::new(RelayBehavior::Accept),
                min_pow: 0,
                events: RwLock::new(Vec::new()),
                seen: RwLock::new(HashSet::new()),
            }
        }

        pub fn with_behavior(self, behavior: RelayBehavior) -> Self {
            Self {
                behavior: RwLock::new(behavior),
                ..self
            }
        }

        /// Require at least this many leading zero bits, honestly committed.
        pub fn with_min_pow(mut self, min_pow: u32) -> Self {
            self.min_pow = min_pow;
            self
        }

        pub async fn set_behavior(&self, behavior: RelayBehavior) {
            *self.behavior.write().await = behavior;
        }

        /// Events stored so far, in arrival order.
        pub async fn events(&self) -> Vec<Event> {
            self.events.read().await.clone()
        }

        pub async fn event_count(&self) -> usize {
            self.events.read().await.len()
        }

        pub async fn has_event(&self, id: &EventId) -> bool {
            self.seen.read().await.contains(id)
        }

        /// Process one raw client message and produce the raw reply.
        pub async fn handle_message(&self, raw: &str) -> Result<String> {
            let ClientMessage::Event(event) = ClientMessage::from_json(raw)?;
            let reply = self.handle_event(event).await;
            reply.to_json()
        }

        async fn handle_event(&self, event: Event) -> RelayMessage {
            let event_id = *event.id();
            let verdict = |accepted: bool, message: String| RelayMessage::Ok {
                event_id,
                accepted,
                message,
            };

            if let RelayBehavior::Reject(reason) = &*self.behavior.read().await {
                return verdict(false, reason.clone());
            }

            if let Err(e) = validate_event(&event) {
                return verdict(false, OkPrefix::Invalid.message(&e.to_string()));
            }
            if let Err(e) = validate_pow(&event, self.min_pow) {
                return verdict(false, OkPrefix::Pow.message(&e.to_string()));
            }

            if !self.seen.write().await.insert(event_id) {
                return verdict(true, OkPrefix::Duplicate.message("already have this event"));
            }
            self.events.write().await.push(event);
            verdict(true, String::new())
        }
    }

    #[async_trait]
    impl Relay for MemoryRelay {
        fn url(&self) -> &str {
            &self.url
        }

        async fn send_event(&self, event: &Event) -> Result<RelayAck> {
            let behavior = self.behavior.read().await.clone();
            match behavior {
                RelayBehavior::Unreachable => {
                    return Err(RelayError::Unreachable(format!(
                        "connection to {} refused",
                        self.url
                    )))
                }
                RelayBehavior::Delay(delay) => tokio::time::sleep(delay).await,
                RelayBehavior::Accept | RelayBehavior::Reject(_) => {}
            }

            let request = ClientMessage::Event(event.clone()).to_json()?;
            let reply = self.handle_message(&request).await?;
            RelayMessage::from_json(&reply)?.into_ack(event.id())
        }
    }

    /// A set of memory relays addressed by URL.
    pub struct MemoryNetwork {
        relays: RwLock<HashMap<String, Arc<MemoryRelay>>>,
    }

    impl MemoryNetwork {
        /// Create a new memory network.
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        /// Register a relay with the given behavior.
        pub async fn add_relay(
            self: &Arc<Self>,
            url: &str,
            behavior: RelayBehavior,
        ) -> Arc<MemoryRelay> {
            self.insert(MemoryRelay::new(url).with_behavior(behavior)).await
        }

        /// Register a preconfigured relay.
        pub async fn insert(self: &Arc<Self>, relay: MemoryRelay) -> Arc<MemoryRelay> {
            let relay = Arc::new(relay);
            self.relays
                .write()
                .await
                .insert(relay.url.clone(), Arc::clone(&relay));
            relay
        }

        pub async fn relay(&self, url: &str) -> Option<Arc<MemoryRelay>> {
            self.relays.read().await.get(url).cloned()
        }

        /// All relays as trait objects, sorted by URL.
        pub async fn endpoints(&self) -> Vec<Arc<dyn Relay>> {
            let relays = self.relays.read().await;
            let mut urls: Vec<&String> = relays.keys().collect();
            urls.sort();
            urls.into_iter()
                .map(|url| Arc::clone(&relays[url]) as Arc<dyn Relay>)
                .collect()
        }

        /// How many relays stored the event.
        pub async fn replicas(&self, id: &EventId) -> usize {
            let relays: Vec<Arc<MemoryRelay>> =
                self.relays.read().await.values().cloned().collect();
            let mut count = 0;
            for relay in relays {
                if relay.has_event(id).await {
                    count += 1;
                }
            }
            count
        }
    }

    impl Default for MemoryNetwork {
        fn default() -> Self {
            Self {
                relays: RwLock::new(HashMap::new()),
            }
        }
    }
}
