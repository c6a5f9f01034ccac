//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use notebridge_core::{
    sign_draft_with, CancelFlag, Event, EventBuilder, EventDraft, Keys, PowMiner, PublicKey,
    SignMode, Tag,
};
use notebridge_relay::{MemoryNetwork, Relay, RelayBehavior};

/// Timestamp used by fixture drafts, so ids are reproducible.
pub const FIXED_TIME: u64 = 1_700_000_000;

/// A test fixture holding one issuer's keys.
pub struct TestFixture {
    pub keys: Keys,
}

impl TestFixture {
    /// Create a new test fixture with a random key.
    pub fn new() -> Self {
        Self {
            keys: Keys::generate(),
        }
    }

    /// Create with the secret scalar `n` (must be non-zero).
    pub fn with_scalar(n: u32) -> Self {
        let mut secret = [0u8; 32];
        secret[28..].copy_from_slice(&n.to_be_bytes());
        Self {
            keys: Keys::from_secret_bytes(&secret).expect("non-zero scalar is a valid key"),
        }
    }

    /// Get the issuer's public key.
    pub fn public_key(&self) -> PublicKey {
        self.keys.public_key()
    }

    /// A kind-1 draft at [`FIXED_TIME`].
    pub fn draft(&self, content: &str, tags: Vec<Tag>) -> EventDraft {
        EventBuilder::text_note(content)
            .tags(tags)
            .created_at(FIXED_TIME)
            .build(self.keys.public_key())
    }

    /// A signed kind-1 event with a deterministic signature.
    pub fn note(&self, content: &str) -> Event {
        sign_draft_with(&self.draft(content, Vec::new()), &self.keys, SignMode::Deterministic)
            .expect("fixture draft is issued by fixture keys")
    }

    /// A signed kind-1 event whose id meets `difficulty`.
    pub fn mined_note(&self, content: &str, difficulty: u32) -> Event {
        let mined = PowMiner::new(difficulty)
            .mine(&self.draft(content, Vec::new()), &CancelFlag::new(), None)
            .expect("fixture difficulty is reachable");
        sign_draft_with(&mined.draft, &self.keys, SignMode::Deterministic)
            .expect("fixture draft is issued by fixture keys")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple test fixtures for multi-issuer tests.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (1..=count as u32).map(TestFixture::with_scalar).collect()
}

/// A memory network with one relay per behavior, named `mem://relay-00`,
/// `mem://relay-01`, ... in order.
pub async fn relay_network(
    behaviors: &[RelayBehavior],
) -> (Arc<MemoryNetwork>, Vec<Arc<dyn Relay>>) {
    let network = MemoryNetwork::new();
    for (i, behavior) in behaviors.iter().enumerate() {
        network
            .add_relay(&format!("mem://relay-{:02}", i), behavior.clone())
            .await;
    }
    let endpoints = network.endpoints().await;
    (network, endpoints)
}
