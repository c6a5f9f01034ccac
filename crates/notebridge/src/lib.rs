//! # notebridge
//!
//! Finalize events and publish them to relays.
//!
//! ## Overview
//!
//! An event goes through one pipeline regardless of its kind:
//!
//! 1. **Draft**: issuer, timestamp, kind, tags and content
//! 2. **Sign**: canonical encoding, SHA-256 id, Schnorr signature
//! 3. **Mine** (optional): search for a nonce tag until the id has enough
//!    leading zero bits, then sign again
//! 4. **Dispatch**: send to every relay concurrently; success if any accepts
//!
//! ## Usage
//!
//! ```rust,no_run
//! use notebridge::{Publisher, PublisherConfig, PublishRequest, Tag};
//! use notebridge::relay::{MemoryNetwork, RelayBehavior};
//!
//! async fn example() -> notebridge::Result<()> {
//!     let config = PublisherConfig::from_json_file("notebridge.json")?;
//!
//!     let network = MemoryNetwork::new();
//!     network.add_relay("mem://a", RelayBehavior::Accept).await;
//!
//!     let publisher = Publisher::new(config, network.endpoints().await)?;
//!     let report = publisher
//!         .submit(
//!             PublishRequest::text_note("hello")
//!                 .tag(Tag::hashtag("test"))
//!                 .difficulty(4),
//!         )
//!         .await?;
//!
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `notebridge::core` - Encoding, hashing, signing and mining
//! - `notebridge::relay` - Relay abstraction and dispatch

pub mod config;
pub mod error;
pub mod publisher;

// Re-export component crates
pub use notebridge_core as core;
pub use notebridge_relay as relay;

pub use config::{PublisherConfig, TimeoutFallback};
pub use error::{PublisherError, Result};
pub use publisher::{Finalized, PowStatus, PublishRequest, Publisher};

// Re-export commonly used types
pub use notebridge_core::{CancelFlag, Event, EventDraft, EventId, Keys, Kind, PublicKey, Tag};
pub use notebridge_relay::{PublishReport, Relay};
