//! The per-dispatch request context.

use crate::bucket::Bucket;
use std::{
    any::Any,
    collections::HashMap,
    sync::{Arc, Mutex},
};
use syncbus_core::{ClientHandle, Payload, SyncRequest};

/// One inbound sync request, bound to its bucket and originating client.
///
/// Constructed once per inbound message by the dispatcher. The action, data
/// and options are fixed at construction; [`Locals`] is the only mutable
/// surface, a side-channel for layers to pass derived state downstream.
pub struct Request<P: Payload, C: ClientHandle> {
    action: String,
    data: Option<P>,
    options: HashMap<String, P>,
    bucket: Arc<Bucket<P, C>>,
    client: C,
    locals: Locals,
}

impl<P: Payload, C: ClientHandle> Request<P, C> {
    pub(crate) fn new(message: SyncRequest<P>, bucket: Arc<Bucket<P, C>>, client: C) -> Self {
        Self {
            action: message.action,
            data: message.data,
            options: message.options,
            bucket,
            client,
            locals: Locals::default(),
        }
    }

    /// The action verb. Fixed at construction.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The bucket-defined payload, if the message carried one.
    pub fn data(&self) -> Option<&P> {
        self.data.as_ref()
    }

    /// All per-request options.
    pub fn options(&self) -> &HashMap<String, P> {
        &self.options
    }

    /// One option by key.
    pub fn option(&self, key: &str) -> Option<&P> {
        self.options.get(key)
    }

    /// The bucket this request targets.
    pub fn bucket(&self) -> &Arc<Bucket<P, C>> {
        &self.bucket
    }

    /// The originating client handle.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// The request-scoped side-channel.
    pub fn locals(&self) -> &Locals {
        &self.locals
    }
}

/// A request-scoped key/value side-channel.
///
/// Any layer may read or write; the last writer wins and the value is visible
/// to all downstream layers (an auth layer stashing the authenticated
/// identity is the typical use). Each request owns its own `Locals`; nothing
/// is shared across requests.
#[derive(Default)]
pub struct Locals {
    values: Mutex<HashMap<String, Arc<dyn Any + Send + Sync>>>,
}

impl Locals {
    /// Store a value under `key`, replacing any previous value.
    pub fn insert<T: Send + Sync + 'static>(&self, key: impl Into<String>, value: T) {
        self.values
            .lock()
            .unwrap()
            .insert(key.into(), Arc::new(value));
    }

    /// Fetch the value under `key`, if present and of type `T`.
    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Option<Arc<T>> {
        let values = self.values.lock().unwrap();
        let value = values.get(key)?.clone();
        value.downcast::<T>().ok()
    }

    /// Whether any value is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.values.lock().unwrap().contains_key(key)
    }
}
