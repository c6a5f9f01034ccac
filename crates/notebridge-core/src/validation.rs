//! Event validation: identifier, signature and proof-of-work checks.

use crate::error::ValidationError;
use crate::event::Event;
use crate::pow::{committed_difficulty, leading_zero_bits};

/// Validate an event's id and signature.
///
/// This performs:
/// - Id recomputation from the canonical encoding
/// - Schnorr signature verification against the issuer key
pub fn validate_event(event: &Event) -> Result<(), ValidationError> {
    // 1. The claimed id must match the content
    let computed = event.compute_id();
    if &computed != event.id() {
        return Err(ValidationError::IdMismatch {
            claimed: *event.id(),
            computed,
        });
    }

    // 2. The signature must be over that id
    event
        .pubkey()
        .verify(event.id(), event.sig())
        .map_err(|_| ValidationError::SignatureFailed)?;

    Ok(())
}

/// Validate that an event carries at least `min_difficulty` bits of work.
///
/// If the event commits to a target in its nonce tag, the commitment must
/// also reach `min_difficulty`; a lucky hash under a lower target does not
/// count.
pub fn validate_pow(event: &Event, min_difficulty: u32) -> Result<(), ValidationError> {
    if min_difficulty == 0 {
        return Ok(());
    }

    let actual = leading_zero_bits(event.id());
    if actual < min_difficulty {
        return Err(ValidationError::InsufficientWork {
            required: min_difficulty,
            actual,
        });
    }

    if let Some(committed) = committed_difficulty(event.tags()) {
        if committed < min_difficulty {
            return Err(ValidationError::CommitmentTooLow {
                committed,
                required: min_difficulty,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keys;
    use crate::event::EventBuilder;
    use crate::pow::{CancelFlag, PowMiner};
    use crate::signer::sign_draft;
    use crate::types::Tag;

    fn keys() -> Keys {
        Keys::from_secret_bytes(&[0x44; 32]).unwrap()
    }

    fn signed() -> Event {
        EventBuilder::text_note("validate me")
            .tag(Tag::hashtag("test"))
            .created_at(1700000000)
            .sign(&keys())
    }

    /// Re-serialize an event with one JSON field replaced.
    fn tamper(event: &Event, field: &str, value: serde_json::Value) -> Event {
        let mut json: serde_json::Value = serde_json::to_value(event).unwrap();
        json[field] = value;
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_valid_event() {
        validate_event(&signed()).unwrap();
    }

    #[test]
    fn test_tampered_content_detected() {
        let event = tamper(&signed(), "content", "changed".into());
        assert!(matches!(
            validate_event(&event),
            Err(ValidationError::IdMismatch { .. })
        ));
    }

    #[test]
    fn test_tampered_tags_detected() {
        let event = tamper(&signed(), "tags", serde_json::json!([["t", "other"]]));
        assert!(matches!(
            validate_event(&event),
            Err(ValidationError::IdMismatch { .. })
        ));
    }

    #[test]
    fn test_foreign_signature_detected() {
        let other = EventBuilder::text_note("different")
            .created_at(1)
            .sign(&keys());
        let event = tamper(&signed(), "sig", other.sig().to_hex().into());
        assert!(matches!(
            validate_event(&event),
            Err(ValidationError::SignatureFailed)
        ));
    }

    #[test]
    fn test_pow_validation() {
        let draft = EventBuilder::text_note("work")
            .created_at(1700000000)
            .build(keys().public_key());
        let mined = PowMiner::new(8)
            .mine(&draft, &CancelFlag::new(), None)
            .unwrap();
        let event = sign_draft(&mined.draft, &keys()).unwrap();

        validate_event(&event).unwrap();
        validate_pow(&event, 8).unwrap();
        validate_pow(&event, 0).unwrap();
        assert!(matches!(
            validate_pow(&event, 200),
            Err(ValidationError::InsufficientWork { required: 200, .. })
        ));
    }

    #[test]
    fn test_pow_commitment_too_low() {
        let draft = EventBuilder::text_note("lucky")
            .created_at(1700000000)
            .build(keys().public_key());
        let mined = PowMiner::new(4)
            .mine(&draft, &CancelFlag::new(), None)
            .unwrap();
        let event = sign_draft(&mined.draft, &keys()).unwrap();

        // Ask for exactly what the hash achieved, above the committed 4.
        let actual = leading_zero_bits(event.id());
        if actual > 4 {
            assert!(matches!(
                validate_pow(&event, actual),
                Err(ValidationError::CommitmentTooLow { committed: 4, .. })
            ));
        } else {
            validate_pow(&event, 4).unwrap();
        }
    }
}
