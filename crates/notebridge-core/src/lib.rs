//! # notebridge core
//!
//! Pure primitives for finalizing events: canonical encoding, content
//! hashing, Schnorr signing and proof-of-work mining.
//!
//! This crate contains no I/O and no networking. Mining is CPU-bound and
//! blocking; async callers run it on a dedicated worker.
//!
//! ## Key Types
//!
//! - [`EventDraft`] - Mutable pre-signing event
//! - [`Event`] - Immutable signed event
//! - [`EventId`] - Content address (SHA-256 of the canonical encoding)
//! - [`Keys`] - Issuer key material, validated on load
//! - [`PowMiner`] - Nonce search for a target difficulty
//!
//! ## Pipeline
//!
//! ```rust
//! use notebridge_core::{sign_draft, CancelFlag, EventBuilder, Keys, PowMiner, Tag};
//!
//! let keys = Keys::generate();
//! let draft = EventBuilder::text_note("hello")
//!     .tag(Tag::hashtag("test"))
//!     .build(keys.public_key());
//!
//! let mined = PowMiner::new(4).mine(&draft, &CancelFlag::new(), None).unwrap();
//! let event = sign_draft(&mined.draft, &keys).unwrap();
//! assert!(event.id().to_hex().starts_with('0'));
//! event.verify().unwrap();
//! ```

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod event;
pub mod pow;
pub mod signer;
pub mod types;
pub mod validation;

pub use canonical::{canonical_bytes, compute_event_id};
pub use crypto::{Keys, PublicKey, Sha256Hash, Signature};
pub use error::{CoreError, KeyError, MiningError, ValidationError};
pub use event::{unix_now, Event, EventBuilder, EventDraft};
pub use pow::{
    committed_difficulty, leading_zero_bits, meets_difficulty, CancelFlag, CancelGuard, MinedDraft,
    MiningObserver, MiningProgress, MiningResult, PowMiner, MINING_DEADLINE,
};
pub use signer::{sign_draft, sign_draft_with, SignMode};
pub use types::{EventId, Kind, Tag};
pub use validation::{validate_event, validate_pow};
