//! Bucket event listeners.
//!
//! A bucket emits exactly two events:
//!
//! - `connection` — a client attached to the bucket's namespace, reported by
//!   the transport glue before any sync traffic for that client.
//! - `sync` — a request completed successfully; the [`SyncEvent`] carries the
//!   result and the notification controls (`stop` / `notify`).
//!
//! Listeners run synchronously in registration order. A failing listener is
//! logged and isolated: it never stops emission to the remaining listeners
//! and never crashes the dispatcher.

use crate::{bucket::Bucket, sync::SyncEvent};
use std::{future::Future, pin::Pin};
use syncbus_core::{BoxError, ClientHandle, Payload};

/// Observer of completed syncs on one bucket.
///
/// This is where the notification protocol is steered: call
/// [`SyncEvent::stop`] to suppress the default broadcast or
/// [`SyncEvent::notify`] to redirect it.
pub trait SyncListener<P: Payload, C: ClientHandle>: Send + Sync + 'static {
    /// Called once per successfully completed request on the bucket.
    fn on_sync(&self, sync: &SyncEvent<P, C>)
    -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Observer of client attachments on one bucket.
///
/// Useful for per-client setup. Dispatch of the client's first sync request
/// is *not* blocked on listener completion; asynchronous setup must tolerate
/// a request arriving before it finishes.
pub trait ConnectionListener<P: Payload, C: ClientHandle>: Send + Sync + 'static {
    /// Called once per client-bucket attachment.
    fn on_connection(
        &self,
        bucket: &Bucket<P, C>,
        client: &C,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Dynamic object-safe version of [`SyncListener`].
pub trait DynSyncListener<P: Payload, C: ClientHandle>: Send + Sync + 'static {
    /// Called once per successfully completed request (dynamic dispatch version).
    fn on_sync_dyn<'a>(
        &'a self,
        sync: &'a SyncEvent<P, C>,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>>;
}

impl<P: Payload, C: ClientHandle, L: SyncListener<P, C>> DynSyncListener<P, C> for L {
    fn on_sync_dyn<'a>(
        &'a self,
        sync: &'a SyncEvent<P, C>,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>> {
        Box::pin(self.on_sync(sync))
    }
}

/// Dynamic object-safe version of [`ConnectionListener`].
pub trait DynConnectionListener<P: Payload, C: ClientHandle>: Send + Sync + 'static {
    /// Called once per client-bucket attachment (dynamic dispatch version).
    fn on_connection_dyn<'a>(
        &'a self,
        bucket: &'a Bucket<P, C>,
        client: &'a C,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>>;
}

impl<P: Payload, C: ClientHandle, L: ConnectionListener<P, C>> DynConnectionListener<P, C> for L {
    fn on_connection_dyn<'a>(
        &'a self,
        bucket: &'a Bucket<P, C>,
        client: &'a C,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>> {
        Box::pin(self.on_connection(bucket, client))
    }
}
