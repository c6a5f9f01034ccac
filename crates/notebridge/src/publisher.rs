//! The Publisher: draft, sign, mine, re-sign, dispatch.
//!
//! Every kind of event goes through the same pipeline; only the request
//! parameters differ.

use std::sync::Arc;
use std::time::Duration;

use notebridge_core::{
    sign_draft, unix_now, CancelFlag, Event, EventDraft, Keys, Kind, MiningError,
    MiningObserver, PowMiner, PublicKey, Tag, MINING_DEADLINE,
};
use notebridge_relay::{Dispatcher, PublishReport, Relay};
use tracing::{debug, info, warn};

use crate::config::{PublisherConfig, TimeoutFallback};
use crate::error::{PublisherError, Result};

/// How proof-of-work went for a finalized event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowStatus {
    /// Difficulty 0; the first signature is final.
    Disabled,
    /// The event id meets the requested difficulty.
    Mined {
        difficulty: u32,
        nonce: u64,
        attempts: u64,
        elapsed: Duration,
    },
    /// Mining timed out and the unmined event was kept.
    SkippedAfterTimeout { attempts: u64, elapsed: Duration },
}

/// A signed event ready for dispatch.
#[derive(Debug, Clone)]
pub struct Finalized {
    pub event: Arc<Event>,
    pub pow: PowStatus,
}

/// Parameters for one end-to-end publication.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub kind: Kind,
    pub content: String,
    pub tags: Vec<Tag>,
    /// Leading zero bits required of the event id; 0 disables mining.
    pub difficulty: u32,
    pub cancel: CancelFlag,
}

impl PublishRequest {
    pub fn new(kind: Kind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            tags: Vec::new(),
            difficulty: 0,
            cancel: CancelFlag::new(),
        }
    }

    pub fn text_note(content: impl Into<String>) -> Self {
        Self::new(Kind::TEXT_NOTE, content)
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn difficulty(mut self, difficulty: u32) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Share a cancellation flag with the caller.
    pub fn cancel_with(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Finalizes events with one issuer key and publishes them to a fixed set
/// of relays.
pub struct Publisher {
    keys: Keys,
    relays: Vec<Arc<dyn Relay>>,
    dispatcher: Dispatcher,
    config: PublisherConfig,
    mining_deadline: Duration,
    mining_observer: Option<Arc<dyn MiningObserver>>,
}

impl Publisher {
    /// Create a publisher, validating the configured key.
    pub fn new(config: PublisherConfig, relays: Vec<Arc<dyn Relay>>) -> Result<Self> {
        let keys = config.keys()?;
        Ok(Self::with_keys(keys, relays, config))
    }

    /// Create a publisher with already loaded keys.
    ///
    /// `config.secret_key` is ignored.
    pub fn with_keys(keys: Keys, relays: Vec<Arc<dyn Relay>>, config: PublisherConfig) -> Self {
        Self {
            keys,
            relays,
            dispatcher: Dispatcher::new(config.dispatch_config()),
            config,
            mining_deadline: MINING_DEADLINE,
            mining_observer: None,
        }
    }

    /// Lower the mining deadline. Cannot exceed [`MINING_DEADLINE`].
    pub fn with_mining_deadline(mut self, deadline: Duration) -> Self {
        self.mining_deadline = deadline.min(MINING_DEADLINE);
        self
    }

    pub fn with_mining_observer(mut self, observer: Arc<dyn MiningObserver>) -> Self {
        self.mining_observer = Some(observer);
        self
    }

    pub fn public_key(&self) -> PublicKey {
        self.keys.public_key()
    }

    pub fn relays(&self) -> &[Arc<dyn Relay>] {
        &self.relays
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    /// Start a draft issued by this publisher, stamped with the current time.
    pub fn draft(&self, kind: Kind, tags: Vec<Tag>, content: impl Into<String>) -> EventDraft {
        EventDraft::new(self.keys.public_key(), unix_now(), kind, tags, content)
    }

    /// Sign the draft and, if `difficulty > 0`, mine and sign again.
    ///
    /// Mining runs on a blocking worker so the async runtime stays
    /// responsive. The signature over the mined draft is the authoritative
    /// one; the first signature only survives when mining is disabled or
    /// when it times out under [`TimeoutFallback::PublishUnmined`].
    ///
    /// Dropping the returned future (for example under a caller-side
    /// timeout) stops the mining worker.
    pub async fn finalize(
        &self,
        draft: EventDraft,
        difficulty: u32,
        cancel: &CancelFlag,
    ) -> Result<Finalized> {
        if cancel.is_cancelled() {
            return Err(MiningError::Cancelled { attempts: 0 }.into());
        }

        let signed = sign_draft(&draft, &self.keys)?;
        if difficulty == 0 {
            debug!(id = %signed.id(), "proof-of-work disabled");
            return Ok(Finalized {
                event: Arc::new(signed),
                pow: PowStatus::Disabled,
            });
        }

        let miner = PowMiner::new(difficulty)
            .with_deadline(self.mining_deadline)
            .with_progress_interval(self.config.progress_interval());
        let observer = self.mining_observer.clone();
        // Abandoning this future stops the worker without raising `cancel`.
        let worker_cancel = cancel.child();
        let _stop_worker = worker_cancel.clone().drop_guard();

        let mined = tokio::task::spawn_blocking(move || {
            miner.mine(&draft, &worker_cancel, observer.as_deref())
        })
        .await
        .map_err(|e| PublisherError::Worker(e.to_string()))?;

        match mined {
            Ok(mined) => {
                let event = sign_draft(&mined.draft, &self.keys)?;
                debug!(
                    id = %event.id(),
                    difficulty,
                    attempts = mined.attempts,
                    "event mined and re-signed"
                );
                Ok(Finalized {
                    event: Arc::new(event),
                    pow: PowStatus::Mined {
                        difficulty,
                        nonce: mined.nonce,
                        attempts: mined.attempts,
                        elapsed: mined.elapsed,
                    },
                })
            }
            Err(MiningError::Timeout {
                attempts, elapsed, ..
            }) if self.config.timeout_fallback == TimeoutFallback::PublishUnmined => {
                warn!(
                    id = %signed.id(),
                    difficulty,
                    attempts,
                    "mining timed out, publishing without proof-of-work"
                );
                Ok(Finalized {
                    event: Arc::new(signed),
                    pow: PowStatus::SkippedAfterTimeout { attempts, elapsed },
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Send a finalized event to every relay.
    ///
    /// Succeeds if any relay accepted; the report lists the ones that did not.
    pub async fn publish(&self, event: Arc<Event>) -> Result<PublishReport> {
        let report = self
            .dispatcher
            .publish(event, &self.relays)
            .await
            .into_result()?;

        if report.is_partial() {
            warn!("{}", report.summary());
        } else {
            info!("{}", report.summary());
        }
        Ok(report)
    }

    /// Draft, finalize and publish in one step.
    pub async fn submit(&self, request: PublishRequest) -> Result<PublishReport> {
        let PublishRequest {
            kind,
            content,
            tags,
            difficulty,
            cancel,
        } = request;

        let draft = self.draft(kind, tags, content);
        let finalized = self.finalize(draft, difficulty, &cancel).await?;
        debug!(id = %finalized.event.id(), pow = ?finalized.pow, "finalized");
        self.publish(finalized.event).await
    }
}
