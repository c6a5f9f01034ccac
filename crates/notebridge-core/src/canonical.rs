//! Canonical JSON encoding for event identifiers.
//!
//! An event's identity fields are serialized as a compact JSON array:
//!
//! ```text
//! [0,"<pubkey hex>",<created_at>,<kind>,[["t","test"],...],"<content>"]
//! ```
//!
//! - No whitespace anywhere
//! - Integers in decimal
//! - Tag order preserved exactly (order is part of identity)
//! - Written by `serde_json`'s compact formatter, so strings use the minimal
//!   JSON escape set: `\"`, `\\`, `\n`, `\r`, `\t`, `\b`, `\f`, and
//!   `\u00XX` for other control characters.
//!   Everything else, including non-ASCII, is written verbatim as UTF-8.
//!
//! The encoding is FROZEN: any change alters every event id.

use serde_json::json;

use crate::crypto::{PublicKey, Sha256Hash};
use crate::types::{EventId, Kind, Tag};

/// Encode an event's identity fields to canonical bytes.
pub fn canonical_bytes(
    pubkey: &PublicKey,
    created_at: u64,
    kind: Kind,
    tags: &[Tag],
    content: &str,
) -> Vec<u8> {
    json!([0, pubkey.to_hex(), created_at, kind.as_u16(), tags, content])
        .to_string()
        .into_bytes()
}

/// Compute the event id: SHA-256 over the canonical bytes.
pub fn compute_event_id(
    pubkey: &PublicKey,
    created_at: u64,
    kind: Kind,
    tags: &[Tag],
    content: &str,
) -> EventId {
    let bytes = canonical_bytes(pubkey, created_at, kind, tags, content);
    Sha256Hash::hash(&bytes).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pubkey() -> PublicKey {
        PublicKey::from_hex("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
            .unwrap()
    }

    fn encode(s: &str) -> String {
        let bytes = canonical_bytes(&pubkey(), 0, Kind(0), &[], s);
        let text = String::from_utf8(bytes).unwrap();
        let prefix_len = text.find(",[],").unwrap() + 4;
        text[prefix_len..text.len() - 1].to_string()
    }

    #[test]
    fn test_canonical_layout() {
        let tags = vec![Tag::new("t", ["test"])];
        let bytes = canonical_bytes(&pubkey(), 1700000000, Kind::TEXT_NOTE, &tags, "hello");
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "[0,\"79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798\",\
             1700000000,1,[[\"t\",\"test\"]],\"hello\"]"
        );
    }

    #[test]
    fn test_empty_tags_and_content() {
        let bytes = canonical_bytes(&pubkey(), 0, Kind(0), &[], "");
        let s = String::from_utf8(bytes).unwrap();
        assert!(s.ends_with(",0,0,[],\"\"]"));
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(encode("a\"b"), r#""a\"b""#);
        assert_eq!(encode("back\\slash"), r#""back\\slash""#);
        assert_eq!(encode("line\nbreak\ttab\rcr"), r#""line\nbreak\ttab\rcr""#);
        assert_eq!(encode("\u{8}\u{c}"), r#""\b\f""#);
        assert_eq!(encode("\u{1}\u{1f}"), r#""\u0001\u001f""#);
        assert_eq!(encode("héllo 🌍 /"), "\"héllo 🌍 /\"");
    }

    #[test]
    fn test_tag_order_is_significant() {
        let a = vec![Tag::new("t", ["x"]), Tag::new("t", ["y"])];
        let b = vec![Tag::new("t", ["y"]), Tag::new("t", ["x"])];
        let id_a = compute_event_id(&pubkey(), 1, Kind::TEXT_NOTE, &a, "c");
        let id_b = compute_event_id(&pubkey(), 1, Kind::TEXT_NOTE, &b, "c");
        assert_ne!(id_a, id_b);
    }

    #[test]
    fn test_tag_boundaries_are_unambiguous() {
        let a = vec![Tag::new("t", ["a,b"])];
        let b = vec![Tag::new("t", ["a", "b"])];
        assert_ne!(
            canonical_bytes(&pubkey(), 1, Kind::TEXT_NOTE, &a, ""),
            canonical_bytes(&pubkey(), 1, Kind::TEXT_NOTE, &b, "")
        );
    }

    proptest! {
        #[test]
        fn test_matches_serde_json(
            created_at in any::<u64>(),
            kind in any::<u16>(),
            tags in prop::collection::vec(prop::collection::vec(any::<String>(), 0..4), 0..4),
            content in any::<String>(),
        ) {
            let tags: Vec<Tag> = tags.into_iter().map(Tag).collect();
            let ours = canonical_bytes(&pubkey(), created_at, Kind(kind), &tags, &content);
            let reference = serde_json::to_vec(&(
                0u8,
                pubkey().to_hex(),
                created_at,
                kind,
                &tags,
                &content,
            ))
            .unwrap();
            prop_assert_eq!(ours, reference);
        }

        #[test]
        fn test_canonical_deterministic(content in any::<String>(), ts in any::<u64>()) {
            let tags = vec![Tag::hashtag("test")];
            let b1 = canonical_bytes(&pubkey(), ts, Kind::TEXT_NOTE, &tags, &content);
            let b2 = canonical_bytes(&pubkey(), ts, Kind::TEXT_NOTE, &tags, &content);
            prop_assert_eq!(b1, b2);
        }
    }
}
