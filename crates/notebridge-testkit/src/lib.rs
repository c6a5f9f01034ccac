//! # notebridge testkit
//!
//! Testing utilities for notebridge.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known drafts with their canonical serialization and id
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Reproducible keys, events and relay networks
//!
//! ## Golden Vectors
//!
//! ```rust
//! use notebridge_testkit::vectors::all_vectors;
//!
//! for vector in all_vectors() {
//!     assert_eq!(vector.draft().compute_id().to_hex(), vector.id);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use notebridge_testkit::generators::{draft_from_params, DraftParams};
//!
//! proptest! {
//!     #[test]
//!     fn event_id_is_deterministic(params: DraftParams) {
//!         let d1 = draft_from_params(&params);
//!         let d2 = draft_from_params(&params);
//!         prop_assert_eq!(d1.compute_id(), d2.compute_id());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use notebridge_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::with_scalar(1);
//! let event = fixture.note("hello");
//! event.verify().unwrap();
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, relay_network, TestFixture, FIXED_TIME};
pub use generators::{draft_from_params, DraftParams};
pub use vectors::{all_vectors, verify_all_vectors, vectors_json, GoldenVector};
