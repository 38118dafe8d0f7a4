//! The process-wide bucket registry.

use crate::bucket::Bucket;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use syncbus_core::{ClientHandle, DispatchError, Payload};

/// An explicit registry of named buckets.
///
/// Created at startup, populated during the setup phase, and injected into
/// the dispatcher — there is no ambient global state. By default buckets are
/// created lazily on first reference; a [`strict`](BucketRegistry::strict)
/// registry instead rejects dispatches to names that were never registered.
pub struct BucketRegistry<P: Payload, C: ClientHandle> {
    buckets: RwLock<HashMap<String, Arc<Bucket<P, C>>>>,
    strict: bool,
}

impl<P: Payload, C: ClientHandle> BucketRegistry<P, C> {
    /// A registry that creates buckets lazily on first reference.
    pub fn new() -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            strict: false,
        }
    }

    /// A registry that requires buckets to be pre-registered.
    ///
    /// Dispatching to an unregistered name becomes a protocol error answered
    /// to the client; [`bucket`](Self::bucket) still registers new names, so
    /// setup code is identical either way.
    pub fn strict() -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            strict: true,
        }
    }

    /// Get or create the named bucket.
    pub fn bucket(&self, name: &str) -> Arc<Bucket<P, C>> {
        if let Some(bucket) = self.buckets.read().unwrap().get(name) {
            return Arc::clone(bucket);
        }
        let mut buckets = self.buckets.write().unwrap();
        // Raced registration: first writer wins.
        Arc::clone(
            buckets
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Bucket::new(name))),
        )
    }

    /// Look up an existing bucket without creating it.
    pub fn get(&self, name: &str) -> Option<Arc<Bucket<P, C>>> {
        self.buckets.read().unwrap().get(name).cloned()
    }

    /// Resolve a bucket for dispatch, honoring strictness.
    pub(crate) fn resolve(&self, name: &str) -> Result<Arc<Bucket<P, C>>, DispatchError> {
        if self.strict {
            self.get(name)
                .ok_or_else(|| DispatchError::UnknownBucket(name.to_string()))
        } else {
            Ok(self.bucket(name))
        }
    }

    /// Number of known buckets.
    pub fn len(&self) -> usize {
        self.buckets.read().unwrap().len()
    }

    /// Whether no bucket has been referenced yet.
    pub fn is_empty(&self) -> bool {
        self.buckets.read().unwrap().is_empty()
    }
}

impl<P: Payload, C: ClientHandle> Default for BucketRegistry<P, C> {
    fn default() -> Self {
        Self::new()
    }
}
