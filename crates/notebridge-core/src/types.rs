//! Strong type definitions for notebridge events.
//!
//! Identifiers are newtypes so that an event id can never be passed where a
//! public key is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Implements hex-string serde for a fixed-size byte newtype.
///
/// Events travel as JSON, where ids, keys and signatures are lowercase hex.
macro_rules! impl_hex_serde {
    ($ty:ty) => {
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::core::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::core::result::Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use impl_hex_serde;

/// Decode exactly `N` bytes of hex.
pub(crate) fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], hex::FromHexError> {
    let mut arr = [0u8; N];
    hex::decode_to_slice(s, &mut arr)?;
    Ok(arr)
}

/// A 32-byte event identifier: SHA-256 of the event's canonical encoding.
///
/// This is the content-address of an event. Two drafts with the same
/// pubkey, timestamp, kind, tags and content have the same EventId.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub [u8; 32]);

impl EventId {
    /// Create a new EventId from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        decode_fixed(s).map(Self)
    }

    /// The zero event ID (used as a sentinel).
    pub const ZERO: Self = Self([0u8; 32]);
}

impl_hex_serde!(EventId);

impl fmt::Debug for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for EventId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for EventId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Event kind: the integer category code of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kind(pub u16);

impl Kind {
    /// Profile metadata.
    pub const METADATA: Self = Self(0);
    /// Short text note.
    pub const TEXT_NOTE: Self = Self(1);
    /// Follow list.
    pub const CONTACTS: Self = Self(3);
    /// Deletion request.
    pub const DELETION: Self = Self(5);
    /// Reaction to another event.
    pub const REACTION: Self = Self(7);
    /// Long-form article.
    pub const LONG_FORM: Self = Self(30023);

    /// Get the raw kind number.
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl From<u16> for Kind {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tag: an ordered array of strings.
///
/// The first element names the tag; the rest hold its values. Common tags:
///
/// - `p` – references another author's public key
/// - `e` – links to another event ID
/// - `t` – free-form topic or hashtag
/// - `nonce` – proof-of-work nonce and committed target difficulty
///
/// Tags are stored verbatim; their order is part of the event's identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub Vec<String>);

impl Tag {
    /// Name of the proof-of-work tag.
    pub const NONCE: &'static str = "nonce";

    /// Build a tag from a name and values.
    pub fn new<I, S>(name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parts = vec![name.to_string()];
        parts.extend(values.into_iter().map(Into::into));
        Self(parts)
    }

    /// A `["t", topic]` hashtag.
    pub fn hashtag(topic: &str) -> Self {
        Self::new("t", [topic])
    }

    /// A `["p", pubkey]` reference.
    pub fn pubkey(pubkey: &crate::crypto::PublicKey) -> Self {
        Self::new("p", [pubkey.to_hex()])
    }

    /// An `["e", id]` reference.
    pub fn event(id: &EventId) -> Self {
        Self::new("e", [id.to_hex()])
    }

    /// A `["nonce", nonce, difficulty]` proof-of-work tag.
    pub fn nonce(nonce: u64, difficulty: u32) -> Self {
        Self(vec![
            Self::NONCE.to_string(),
            nonce.to_string(),
            difficulty.to_string(),
        ])
    }

    /// The tag name (first element), if any.
    pub fn name(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// The tag values (everything after the name).
    pub fn values(&self) -> &[String] {
        self.0.get(1..).unwrap_or(&[])
    }

    /// Whether this is a proof-of-work nonce tag.
    pub fn is_nonce(&self) -> bool {
        self.name() == Some(Self::NONCE)
    }

    /// Borrow the raw parts.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for Tag {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
