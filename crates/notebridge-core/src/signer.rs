//! Record signing.
//!
//! Signing always recomputes the identifier from the draft's current fields.
//! There is no way to attach an existing id or signature to a changed draft:
//! after mining rewrites the nonce tag, the draft must be signed again.

use crate::crypto::Keys;
use crate::error::{CoreError, Result};
use crate::event::{Event, EventDraft};

/// How the Schnorr nonce is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignMode {
    /// Fresh auxiliary randomness per signature (BIP-340 recommendation).
    Randomized,
    /// No auxiliary randomness; same key and id give the same signature.
    Deterministic,
}

/// Sign a draft, producing a finalized event.
///
/// Fails if the draft names a different issuer than `keys`.
pub fn sign_draft(draft: &EventDraft, keys: &Keys) -> Result<Event> {
    sign_draft_with(draft, keys, SignMode::Randomized)
}

/// Sign a draft with an explicit nonce mode.
pub fn sign_draft_with(draft: &EventDraft, keys: &Keys, mode: SignMode) -> Result<Event> {
    let signer = keys.public_key();
    if draft.pubkey() != &signer {
        return Err(CoreError::IssuerMismatch {
            draft: *draft.pubkey(),
            signer,
        });
    }
    Ok(finalize(draft.clone(), keys, mode))
}

/// Hash and sign without the issuer check.
pub(crate) fn finalize(draft: EventDraft, keys: &Keys, mode: SignMode) -> Event {
    let id = draft.compute_id();
    let sig = match mode {
        SignMode::Randomized => keys.sign(&id),
        SignMode::Deterministic => keys.sign_deterministic(&id),
    };
    Event::from_parts(draft, id, sig)
}
