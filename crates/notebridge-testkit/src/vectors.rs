//! Golden test vectors for deterministic verification.
//!
//! The expected values were computed independently of this crate, so they
//! pin the canonical encoding and id derivation for every implementation.

use notebridge_core::{canonical_bytes, EventDraft, EventId, Keys, Kind, Tag};
use serde::Serialize;

/// A golden test vector.
#[derive(Debug, Clone, Serialize)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Issuer secret key (hex).
    pub secret_key: &'static str,
    /// Expected x-only public key (hex).
    pub pubkey: &'static str,
    pub created_at: u64,
    pub kind: u16,
    pub tags: &'static [&'static [&'static str]],
    pub content: &'static str,
    /// Expected canonical serialization.
    pub canonical: &'static str,
    /// Expected event id (hex).
    pub id: &'static str,
}

const SECRET_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";
const SECRET_TWO: &str = "0000000000000000000000000000000000000000000000000000000000000002";
const PUBKEY_ONE: &str = "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
const PUBKEY_TWO: &str = "c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5";

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "text note with hashtag",
            secret_key: SECRET_ONE,
            pubkey: PUBKEY_ONE,
            created_at: 1700000000,
            kind: 1,
            tags: &[&["t", "test"]],
            content: "hello",
            canonical: r#"[0,"79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",1700000000,1,[["t","test"]],"hello"]"#,
            id: "4f79bf49156fa4dee5af0c8634c9a81a8ce2c5c92314e034e202a22d08011110",
        },
        GoldenVector {
            name: "empty tags and content",
            secret_key: SECRET_ONE,
            pubkey: PUBKEY_ONE,
            created_at: 0,
            kind: 1,
            tags: &[],
            content: "",
            canonical: r#"[0,"79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",0,1,[],""]"#,
            id: "1d60156c7d5c3d752ed401ba085300ea90869712b4acc88edff9601de4c0b15c",
        },
        GoldenVector {
            name: "escaped characters",
            secret_key: SECRET_TWO,
            pubkey: PUBKEY_TWO,
            created_at: 1700000001,
            kind: 1,
            tags: &[&["t", "a\"b"]],
            content: "line1\nline2\t\"quoted\" \\ back\u{1}\u{8}\u{c}\r",
            canonical: r#"[0,"c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5",1700000001,1,[["t","a\"b"]],"line1\nline2\t\"quoted\" \\ back\u0001\b\f\r"]"#,
            id: "b860210655150c7ef025eb93136b6aac33d18dd760f410b42867e3b03bd67ca9",
        },
        GoldenVector {
            name: "non-ascii content is not escaped",
            secret_key: SECRET_TWO,
            pubkey: PUBKEY_TWO,
            created_at: 1700000002,
            kind: 30023,
            tags: &[&["d", "slug"], &["t", "日本"]],
            content: "héllo 🌍",
            canonical: r#"[0,"c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5",1700000002,30023,[["d","slug"],["t","日本"]],"héllo 🌍"]"#,
            id: "bcf9a3e27f86a3f3f12d56fe358b1a1002dc1e1b8f71c1a760ea42bfa7cc1bda",
        },
        GoldenVector {
            name: "trailing nonce tag",
            secret_key: SECRET_ONE,
            pubkey: PUBKEY_ONE,
            created_at: 1700000003,
            kind: 1,
            tags: &[&["t", "test"], &["nonce", "42", "8"]],
            content: "mined?",
            canonical: r#"[0,"79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",1700000003,1,[["t","test"],["nonce","42","8"]],"mined?"]"#,
            id: "1fb38f4101f4a1c73709d5fef261452ad1ff286569b4f6754d3af65b9706820d",
        },
        GoldenVector {
            name: "metadata with embedded json",
            secret_key: SECRET_ONE,
            pubkey: PUBKEY_ONE,
            created_at: 1700000004,
            kind: 0,
            tags: &[],
            content: r#"{"name":"bob"}"#,
            canonical: r#"[0,"79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",1700000004,0,[],"{\"name\":\"bob\"}"]"#,
            id: "af849a2753edf982f18e4346e1b379eaf9a3aecf754c6feba8fc4e9fceb008cd",
        },
    ]
}

impl GoldenVector {
    pub fn keys(&self) -> Keys {
        Keys::from_secret_hex(self.secret_key).expect("vector secret key is valid")
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.tags
            .iter()
            .map(|t| Tag(t.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    /// Build the draft described by this vector.
    pub fn draft(&self) -> EventDraft {
        EventDraft::new(
            self.keys().public_key(),
            self.created_at,
            Kind(self.kind),
            self.tags(),
            self.content,
        )
    }

    pub fn expected_id(&self) -> EventId {
        EventId::from_hex(self.id).expect("vector id is valid hex")
    }
}

/// Check every vector; returns `(name, matches, computed id)`.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let draft = v.draft();
            let bytes = canonical_bytes(
                draft.pubkey(),
                draft.created_at(),
                draft.kind(),
                draft.tags(),
                draft.content(),
            );
            let hex = draft.compute_id().to_hex();
            let matches = bytes == v.canonical.as_bytes()
                && hex == v.id
                && draft.pubkey().to_hex() == v.pubkey;
            (v.name.to_string(), matches, hex)
        })
        .collect()
}

/// All vectors as pretty JSON, for sharing with other implementations.
pub fn vectors_json() -> String {
    serde_json::to_string_pretty(&all_vectors()).expect("vectors serialize")
}
