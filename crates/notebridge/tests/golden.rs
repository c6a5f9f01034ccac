//! Golden test vectors for cross-implementation verification.
//!
//! Every implementation must produce identical:
//! - x-only public key from the secret key
//! - canonical serialization
//! - event id
//!
//! and must reject the tampered events below.

use notebridge::core::{compute_event_id, validate_pow, Event, Signature, ValidationError};
use notebridge::{Keys, Kind, Tag};
use notebridge_testkit::{all_vectors, vectors_json, TestFixture};
use serde_json::{json, Value};

#[test]
fn test_vectors_public_keys() {
    for vector in all_vectors() {
        assert_eq!(
            vector.keys().public_key().to_hex(),
            vector.pubkey,
            "vector '{}'",
            vector.name
        );
    }
}

#[test]
fn test_vectors_canonical_and_id() {
    for vector in all_vectors() {
        let draft = vector.draft();
        assert_eq!(
            draft.canonical_bytes(),
            vector.canonical.as_bytes(),
            "canonical mismatch for '{}'",
            vector.name
        );
        assert_eq!(draft.compute_id().to_hex(), vector.id, "id mismatch for '{}'", vector.name);
    }
}

#[test]
fn test_vectors_match_free_function() {
    for vector in all_vectors() {
        let draft = vector.draft();
        let id = compute_event_id(
            draft.pubkey(),
            draft.created_at(),
            draft.kind(),
            draft.tags(),
            draft.content(),
        );
        assert_eq!(id, vector.expected_id());
    }
}

#[test]
fn test_vectors_match_serde_json() {
    // A generic JSON encoder agrees with the canonical form
    for vector in all_vectors() {
        let array = json!([
            0,
            vector.pubkey,
            vector.created_at,
            vector.kind,
            vector.tags,
            vector.content
        ]);
        assert_eq!(serde_json::to_string(&array).unwrap(), vector.canonical);
    }
}

#[test]
fn test_signed_vector_wire_form() {
    let vector = &all_vectors()[0];
    let event = notebridge::core::sign_draft(&vector.draft(), &vector.keys()).unwrap();

    let value: Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
    assert_eq!(value["id"], vector.id);
    assert_eq!(value["pubkey"], vector.pubkey);
    assert_eq!(value["created_at"], 1700000000);
    assert_eq!(value["kind"], 1);
    assert_eq!(value["tags"], json!([["t", "test"]]));
    assert_eq!(value["content"], "hello");
    assert_eq!(value["sig"].as_str().unwrap().len(), 128);

    assert_eq!(Event::from_json(&event.to_json().unwrap()).unwrap(), event);
}

#[test]
fn test_vectors_export_is_stable() {
    assert_eq!(vectors_json(), vectors_json());
}

// =============================================================================
// REJECTION TEST VECTORS
// These test that invalid events are properly rejected.
// =============================================================================

fn tamper(event: &Event, field: &str, value: Value) -> Event {
    let mut json = serde_json::to_value(event).unwrap();
    json[field] = value;
    serde_json::from_value(json).unwrap()
}

#[test]
fn test_reject_modified_content() {
    let event = TestFixture::with_scalar(1).note("original");
    let tampered = tamper(&event, "content", json!("changed"));
    assert!(
        matches!(tampered.verify(), Err(ValidationError::IdMismatch { .. })),
        "must reject content that does not hash to the id"
    );
}

#[test]
fn test_reject_appended_tag() {
    let event = TestFixture::with_scalar(1).note("tagged");
    let tampered = tamper(&event, "tags", json!([["t", "extra"]]));
    assert!(tampered.verify().is_err(), "must reject added tags");
}

#[test]
fn test_reject_invalid_signature() {
    let event = TestFixture::with_scalar(1).note("signed");
    let tampered = tamper(&event, "sig", json!(Signature::ZERO));
    assert!(
        matches!(tampered.verify(), Err(ValidationError::SignatureFailed)),
        "must reject invalid signature"
    );
}

#[test]
fn test_reject_signature_from_other_key() {
    let alice = TestFixture::with_scalar(1).note("who wrote this");
    let bob = TestFixture::with_scalar(2);
    let forged = tamper(&alice, "pubkey", json!(bob.public_key()));
    assert!(forged.verify().is_err(), "must reject re-attributed event");
}

#[test]
fn test_reject_overstated_commitment() {
    // Claims difficulty 200 but the id does not have it
    let keys = Keys::from_secret_bytes(&[0x01; 32]).unwrap();
    let event = notebridge::core::EventBuilder::new(Kind::TEXT_NOTE, "bold claim")
        .tag(Tag::nonce(1, 200))
        .created_at(1700000000)
        .sign(&keys);
    assert!(matches!(
        validate_pow(&event, 200),
        Err(ValidationError::InsufficientWork { required: 200, .. })
    ));
}

#[test]
fn test_mined_fixture_passes_pow_validation() {
    let event = TestFixture::with_scalar(5).mined_note("work", 10);
    validate_pow(&event, 10).unwrap();
    event.verify().unwrap();
}
