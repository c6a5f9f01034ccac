//! Proptest generators for property-based testing.

use proptest::prelude::*;

use notebridge_core::{EventDraft, EventId, Keys, Kind, PublicKey, Tag};

/// Generate random keys.
pub fn keys() -> impl Strategy<Value = Keys> {
    any::<[u8; 32]>().prop_filter_map("not a valid secret key", |bytes| {
        Keys::from_secret_bytes(&bytes).ok()
    })
}

/// Generate a random public key.
pub fn public_key() -> impl Strategy<Value = PublicKey> {
    keys().prop_map(|k| k.public_key())
}

/// Generate a random EventId.
pub fn event_id() -> impl Strategy<Value = EventId> {
    any::<[u8; 32]>().prop_map(EventId::from_bytes)
}

/// Generate a reasonable timestamp.
pub fn created_at() -> impl Strategy<Value = u64> {
    0u64..=4_102_444_800
}

/// Generate a Kind, biased toward common ones.
pub fn kind() -> impl Strategy<Value = Kind> {
    prop_oneof![
        Just(Kind::METADATA),
        Just(Kind::TEXT_NOTE),
        Just(Kind::CONTACTS),
        Just(Kind::REACTION),
        Just(Kind::LONG_FORM),
        any::<u16>().prop_map(Kind),
    ]
}

/// Any string, including quotes, backslashes, control and non-ASCII
/// characters.
pub fn text(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>(), 0..=max_len).prop_map(|c| c.into_iter().collect())
}

/// Generate a tag with a short name and up to three values.
pub fn tag() -> impl Strategy<Value = Tag> {
    (
        "[a-z]{1,8}",
        prop::collection::vec(text(24), 0..=3),
    )
        .prop_map(|(name, values)| Tag::new(&name, values))
}

/// Generate a tag list.
pub fn tags(max: usize) -> impl Strategy<Value = Vec<Tag>> {
    prop::collection::vec(tag(), 0..=max)
}

/// Parameters for generating a draft.
#[derive(Debug, Clone)]
pub struct DraftParams {
    pub keys: Keys,
    pub created_at: u64,
    pub kind: Kind,
    pub tags: Vec<Tag>,
    pub content: String,
}

impl Arbitrary for DraftParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (keys(), created_at(), kind(), tags(6), text(200))
            .prop_map(|(keys, created_at, kind, tags, content)| DraftParams {
                keys,
                created_at,
                kind,
                tags,
                content,
            })
            .boxed()
    }
}

/// Generate a draft from parameters.
pub fn draft_from_params(params: &DraftParams) -> EventDraft {
    EventDraft::new(
        params.keys.public_key(),
        params.created_at,
        params.kind,
        params.tags.clone(),
        params.content.clone(),
    )
}
