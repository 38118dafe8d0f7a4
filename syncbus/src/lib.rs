//! # syncbus - Bidirectional Sync Dispatch Core
//!
//! `syncbus` routes named sync actions (create/read/update/delete/custom)
//! arriving from many concurrently connected clients through a composable,
//! per-bucket chain of middleware, then fans the result out as notification
//! events to interested clients.
//!
//! # Architecture
//!
//! Leaves first:
//!
//! - **[`Middleware`]** — one step of a bucket's handler chain, optionally
//!   filtered by action; proceeds, aborts, or answers the request.
//! - **[`Request`] / [`Responder`]** — the per-dispatch context and the
//!   single-use terminal sink.
//! - **[`Bucket`]** — a named aggregate owning one chain plus `connection`
//!   and `sync` listener registries.
//! - **[`SyncDispatcher`]** — receives inbound messages from the transport
//!   glue, resolves the bucket, drives the chain, and runs the notification
//!   protocol over the [`SyncEvent`].
//!
//! The real-time transport is an external collaborator behind the
//! [`Transport`] trait; `syncbus` never owns connections, framing or rooms.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use syncbus::{BucketRegistry, SyncDispatcher};
//!
//! let registry = Arc::new(BucketRegistry::new());
//! registry
//!     .bucket("messages")
//!     .layer_for(["create", "update"], StoreMiddleware::new())
//!     .on_sync(AuditListener);
//!
//! let dispatcher = SyncDispatcher::new(registry, transport);
//! // transport glue:
//! dispatcher.connection("messages", client).await;
//! dispatcher.dispatch("messages", message, client).await;
//! ```
//!
//! # Concurrency model
//!
//! Each dispatch is one async execution. Within it, layers and listeners run
//! strictly in order, never concurrently; across dispatches nothing is
//! ordered — a later-arriving request may complete first if its chain
//! resolves faster. There is no cancellation and no built-in timeout: a layer
//! that never returns leaves its request pending, which is the caller's
//! responsibility to bound.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod bucket;
mod chain;
mod dispatcher;
mod listener;
pub mod middleware;
mod registry;
mod request;
mod response;
mod sync;

pub mod testing;

// Re-exports: the whole dispatch surface.
pub use bucket::Bucket;
pub use dispatcher::SyncDispatcher;
pub use listener::{ConnectionListener, DynConnectionListener, DynSyncListener, SyncListener};
pub use middleware::{ActionFilter, DynMiddleware, LoggingMiddleware, Middleware};
pub use registry::BucketRegistry;
pub use request::{Locals, Request};
pub use response::{Outcome, Responder};
pub use sync::SyncEvent;

// Re-export the wire contract so most users need only this crate.
pub use syncbus_core::{
    BoxError, ClientHandle, DispatchError, Payload, Recipient, ResponseError, SyncFault,
    SyncNotice, SyncReply, SyncRequest, Transport,
};

/// Prelude module - common imports for syncbus.
///
/// # Usage
///
/// ```rust,ignore
/// use syncbus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ActionFilter,
        BoxError,
        Bucket,
        BucketRegistry,
        ClientHandle,
        ConnectionListener,
        DispatchError,
        Middleware,
        Payload,
        Recipient,
        Request,
        Responder,
        SyncDispatcher,
        SyncEvent,
        SyncFault,
        SyncListener,
        SyncNotice,
        SyncReply,
        SyncRequest,
        Transport,
    };
}
