//! Events: drafts under construction and finalized, signed records.
//!
//! An [`EventDraft`] is the mutable pre-signing form. Its issuer, timestamp,
//! kind and content are fixed when it is built; only the tag list may change
//! (proof-of-work mining rewrites the trailing nonce tag).
//!
//! An [`Event`] is immutable. It is produced only by signing a draft, and its
//! `id` and `sig` are valid for exactly the tag set present at signing time.
//! To change anything, convert back with [`Event::into_draft`] and sign again.

use serde::{Deserialize, Serialize};

use crate::canonical::{canonical_bytes, compute_event_id};
use crate::crypto::{Keys, PublicKey, Signature};
use crate::error::{CoreError, ValidationError};
use crate::signer::{finalize, SignMode};
use crate::types::{EventId, Kind, Tag};

/// Current Unix time in seconds.
pub fn unix_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Pre-finalization representation of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pubkey: PublicKey,
    created_at: u64,
    kind: Kind,
    tags: Vec<Tag>,
    content: String,
}

impl EventDraft {
    /// Create a draft with every identity field supplied.
    pub fn new(
        pubkey: PublicKey,
        created_at: u64,
        kind: Kind,
        tags: Vec<Tag>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            pubkey,
            created_at,
            kind,
            tags,
            content: content.into(),
        }
    }

    /// The issuer's public key.
    pub fn pubkey(&self) -> &PublicKey {
        &self.pubkey
    }

    /// Creation timestamp (Unix seconds).
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Event kind.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Current tag list.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Mutable access to the tag list.
    ///
    /// Any change here invalidates identifiers computed earlier.
    pub fn tags_mut(&mut self) -> &mut Vec<Tag> {
        &mut self.tags
    }

    /// Append a tag.
    pub fn push_tag(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    /// Text payload.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Canonical bytes of the draft's current fields.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        canonical_bytes(
            &self.pubkey,
            self.created_at,
            self.kind,
            &self.tags,
            &self.content,
        )
    }

    /// Identifier of the draft's current fields.
    pub fn compute_id(&self) -> EventId {
        compute_event_id(
            &self.pubkey,
            self.created_at,
            self.kind,
            &self.tags,
            &self.content,
        )
    }

    /// The trailing nonce tag, if mining has placed one.
    pub fn nonce_tag(&self) -> Option<&Tag> {
        self.tags.last().filter(|t| t.is_nonce())
    }
}

/// A finalized, signed event.
///
/// Field order matches the wire object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    pubkey: PublicKey,
    created_at: u64,
    kind: Kind,
    tags: Vec<Tag>,
    content: String,
    sig: Signature,
}

impl Event {
    /// Assemble from a draft and an id/signature computed over it.
    pub(crate) fn from_parts(draft: EventDraft, id: EventId, sig: Signature) -> Self {
        Self {
            id,
            pubkey: draft.pubkey,
            created_at: draft.created_at,
            kind: draft.kind,
            tags: draft.tags,
            content: draft.content,
            sig,
        }
    }

    /// The event id.
    pub fn id(&self) -> &EventId {
        &self.id
    }

    /// The issuer's public key.
    pub fn pubkey(&self) -> &PublicKey {
        &self.pubkey
    }

    /// Creation timestamp (Unix seconds).
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Event kind.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Tags, frozen at signing time.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Text payload.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Schnorr signature over the id.
    pub fn sig(&self) -> &Signature {
        &self.sig
    }

    /// Canonical bytes of the event's identity fields.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        canonical_bytes(
            &self.pubkey,
            self.created_at,
            self.kind,
            &self.tags,
            &self.content,
        )
    }

    /// Recompute the id from the event's fields.
    pub fn compute_id(&self) -> EventId {
        compute_event_id(
            &self.pubkey,
            self.created_at,
            self.kind,
            &self.tags,
            &self.content,
        )
    }

    /// Check the id and signature.
    pub fn verify(&self) -> Result<(), ValidationError> {
        crate::validation::validate_event(self)
    }

    /// Discard id and signature, returning the editable draft.
    pub fn into_draft(self) -> EventDraft {
        EventDraft {
            pubkey: self.pubkey,
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags,
            content: self.content,
        }
    }

    /// Serialize to the JSON wire object.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(|e| CoreError::EncodingError(e.to_string()))
    }

    /// Parse a JSON wire object. The result is not yet validated.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(|e| CoreError::DecodingError(e.to_string()))
    }
}

/// Builder for event drafts.
pub struct EventBuilder {
    kind: Kind,
    content: String,
    tags: Vec<Tag>,
    created_at: Option<u64>,
}

impl EventBuilder {
    /// Start building an event of the given kind.
    pub fn new(kind: Kind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            tags: Vec::new(),
            created_at: None,
        }
    }

    /// Start building a short text note.
    pub fn text_note(content: impl Into<String>) -> Self {
        Self::new(Kind::TEXT_NOTE, content)
    }

    /// Add a tag.
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Add several tags, in order.
    pub fn tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Pin the timestamp instead of using the current time.
    pub fn created_at(mut self, ts: u64) -> Self {
        self.created_at = Some(ts);
        self
    }

    /// Build the draft for an issuer.
    pub fn build(self, pubkey: PublicKey) -> EventDraft {
        EventDraft {
            pubkey,
            created_at: self.created_at.unwrap_or_else(unix_now),
            kind: self.kind,
            tags: self.tags,
            content: self.content,
        }
    }

    /// Build and sign in one step.
    pub fn sign(self, keys: &Keys) -> Event {
        finalize(self.build(keys.public_key()), keys, SignMode::Randomized)
    }
}
