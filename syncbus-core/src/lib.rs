//! # syncbus-core
//!
//! Wire contract and collaborator traits for the syncbus dispatch core.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! transport adapters and client wrappers that don't need the full `syncbus`
//! dispatch engine.
//!
//! # What lives here
//!
//! - [`Payload`] — the marker trait for bucket-defined data shapes. A bucket
//!   picks one payload type for its `data`, `result` and option values; the
//!   core never inspects it.
//! - Wire envelopes — [`SyncRequest`], [`SyncReply`], [`SyncFault`] and
//!   [`SyncNotice`], the four message shapes exchanged with the client
//!   wrapper. With the `serde` feature enabled they derive
//!   `Serialize`/`Deserialize` for transports that speak JSON or similar.
//! - [`Transport`] — the narrow interface the dispatch engine consumes to
//!   answer one client and to fan results out to [`Recipient`] targets
//!   (a whole bucket, a named channel, or a single client).
//! - Error types — [`DispatchError`] for protocol and configuration faults,
//!   [`ResponseError`] for response-sink misuse.
//!
//! The dispatch engine itself (buckets, middleware chains, the dispatcher and
//! the notification protocol) lives in the `syncbus` crate.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod envelope;
mod error;
mod payload;
mod transport;

// Re-exports
pub use envelope::{SyncFault, SyncNotice, SyncReply, SyncRequest};
pub use error::{BoxError, DispatchError, ResponseError};
pub use payload::Payload;
pub use transport::{ClientHandle, DynTransport, Recipient, Transport};
