//! Named sync endpoints owning a middleware chain and listener registries.

use crate::{
    chain::{Chain, ChainEntry},
    listener::{
        ConnectionListener, DynConnectionListener, DynSyncListener, SyncListener,
    },
    middleware::{ActionFilter, Middleware},
};
use std::sync::{Arc, RwLock};
use syncbus_core::{ClientHandle, Payload};

/// A named, independently configured sync endpoint.
///
/// A bucket owns an append-only ordered middleware list plus the `connection`
/// and `sync` listener registries. Buckets are created lazily on first
/// reference through a [`BucketRegistry`] and live for the process lifetime;
/// buckets never share state with each other.
///
/// Registration normally happens during a setup phase, but it is safe
/// concurrently with live dispatch: every dispatch snapshots the lists it
/// needs, so an in-flight chain execution always sees the middleware list as
/// it was when the request arrived.
///
/// [`BucketRegistry`]: crate::BucketRegistry
pub struct Bucket<P: Payload, C: ClientHandle> {
    name: String,
    chain: RwLock<Vec<ChainEntry<P, C>>>,
    connection_listeners: RwLock<Vec<Arc<dyn DynConnectionListener<P, C>>>>,
    sync_listeners: RwLock<Vec<Arc<dyn DynSyncListener<P, C>>>>,
}

impl<P: Payload, C: ClientHandle> Bucket<P, C> {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chain: RwLock::new(Vec::new()),
            connection_listeners: RwLock::new(Vec::new()),
            sync_listeners: RwLock::new(Vec::new()),
        }
    }

    /// The bucket's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a layer matching every action.
    pub fn layer<M>(&self, middleware: M) -> &Self
    where
        M: Middleware<P, C>,
    {
        self.push(ActionFilter::All, middleware)
    }

    /// Append a layer matching only the given actions.
    ///
    /// An empty action list matches everything, same as [`layer`](Self::layer).
    pub fn layer_for<I, S, M>(&self, actions: I, middleware: M) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        M: Middleware<P, C>,
    {
        self.push(ActionFilter::only(actions), middleware)
    }

    fn push<M>(&self, filter: ActionFilter, middleware: M) -> &Self
    where
        M: Middleware<P, C>,
    {
        self.chain.write().unwrap().push(ChainEntry {
            filter,
            layer: Arc::new(middleware),
        });
        self
    }

    /// Register a `connection` listener.
    pub fn on_connection<L>(&self, listener: L) -> &Self
    where
        L: ConnectionListener<P, C>,
    {
        self.connection_listeners
            .write()
            .unwrap()
            .push(Arc::new(listener));
        self
    }

    /// Register a `sync` listener.
    pub fn on_sync<L>(&self, listener: L) -> &Self
    where
        L: SyncListener<P, C>,
    {
        self.sync_listeners.write().unwrap().push(Arc::new(listener));
        self
    }

    /// Number of registered layers (matching or not).
    pub fn layer_count(&self) -> usize {
        self.chain.read().unwrap().len()
    }

    pub(crate) fn chain(&self) -> Chain<P, C> {
        Chain::new(self.chain.read().unwrap().clone())
    }

    pub(crate) fn sync_listener_snapshot(&self) -> Vec<Arc<dyn DynSyncListener<P, C>>> {
        self.sync_listeners.read().unwrap().clone()
    }

    pub(crate) fn connection_listener_snapshot(
        &self,
    ) -> Vec<Arc<dyn DynConnectionListener<P, C>>> {
        self.connection_listeners.read().unwrap().clone()
    }
}
