//! # notebridge relay
//!
//! Publication of finalized events to a set of relays.
//!
//! ## Overview
//!
//! A finalized event is shared read-only (`Arc<Event>`) and sent to every
//! configured relay concurrently. Each relay answers with an `OK` verdict,
//! fails to answer, or times out. Publication succeeds if any relay accepts.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use notebridge_core::{EventBuilder, Keys};
//! use notebridge_relay::{Dispatcher, MemoryNetwork, RelayBehavior};
//!
//! # tokio_test_main();
//! # fn tokio_test_main() {
//! # let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
//! # rt.block_on(async {
//! let network = MemoryNetwork::new();
//! network.add_relay("mem://a", RelayBehavior::Accept).await;
//! network.add_relay("mem://b", RelayBehavior::Unreachable).await;
//!
//! let event = Arc::new(EventBuilder::text_note("hello").sign(&Keys::generate()));
//! let outcome = Dispatcher::default()
//!     .publish(event, &network.endpoints().await)
//!     .await;
//!
//! let report = outcome.into_result().unwrap();
//! assert!(report.is_partial());
//! # });
//! # }
//! ```
//!
//! ## Message Flow
//!
//! ```text
//! Publisher                           Relay
//!   |-------- ["EVENT", {..}] -------->|
//!   |<------- ["OK", id, bool, msg] ---|
//! ```

pub mod dispatcher;
pub mod error;
pub mod messages;
pub mod outcome;
pub mod relay;

pub use dispatcher::{DispatchConfig, DispatchObserver, Dispatcher};
pub use error::{PublishError, RelayError, RelayFailure, Result};
pub use messages::{ClientMessage, OkPrefix, RelayAck, RelayMessage};
pub use outcome::{PublishOutcome, PublishReport, RelayResult};
pub use relay::{
    memory::{MemoryNetwork, MemoryRelay, RelayBehavior},
    Relay,
};
