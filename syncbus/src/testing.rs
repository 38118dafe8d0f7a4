//! Testing utilities for syncbus.
//!
//! This module provides doubles for exercising buckets, middleware and the
//! notification protocol without a real transport:
//!
//! - [`MemoryTransport`]: an in-process transport recording every delivery
//! - [`StaticMiddleware`]: always answers with a fixed result
//! - [`ProceedMiddleware`] / [`OrderRecordingMiddleware`]: observe and proceed
//! - [`FailingMiddleware`]: aborts the chain with a fixed error
//! - [`RecordingSyncListener`] / [`RecordingConnectionListener`]: capture
//!   emitted events
//! - [`StoppingSyncListener`] / [`RedirectingSyncListener`]: steer the
//!   notification protocol

use crate::{
    bucket::Bucket,
    listener::{ConnectionListener, SyncListener},
    middleware::Middleware,
    request::Request,
    response::Responder,
    sync::SyncEvent,
};
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};
use syncbus_core::{
    BoxError, ClientHandle, Payload, Recipient, SyncFault, SyncNotice, SyncReply, Transport,
};

/// The client handle used by [`MemoryTransport`].
pub type TestClient = u64;

/// One recorded outbound delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery<P: Payload> {
    /// A success reply to one client.
    Reply {
        /// Receiving client.
        to: TestClient,
        /// The reply envelope.
        reply: SyncReply<P>,
    },
    /// A fault to one client.
    Fault {
        /// Receiving client.
        to: TestClient,
        /// The fault envelope.
        fault: SyncFault,
    },
    /// A pushed notice to one client.
    Notice {
        /// Receiving client.
        to: TestClient,
        /// The notice envelope.
        notice: SyncNotice<P>,
    },
}

/// An in-process transport that records every delivery.
///
/// Subscriber and channel membership are plain maps the test controls via
/// [`subscribe`](MemoryTransport::subscribe) and
/// [`join`](MemoryTransport::join); publishing to a bucket fans out to its
/// current subscribers, including the initiator if subscribed.
#[derive(Default)]
pub struct MemoryTransport<P: Payload> {
    subscriptions: Mutex<HashMap<String, Vec<TestClient>>>,
    channels: Mutex<HashMap<String, Vec<TestClient>>>,
    deliveries: Mutex<Vec<Delivery<P>>>,
}

impl<P: Payload> MemoryTransport<P> {
    /// Create an empty transport.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            subscriptions: Mutex::new(HashMap::new()),
            channels: Mutex::new(HashMap::new()),
            deliveries: Mutex::new(Vec::new()),
        })
    }

    /// Subscribe a client to a bucket's broadcasts.
    pub fn subscribe(&self, bucket: impl Into<String>, client: TestClient) {
        self.subscriptions
            .lock()
            .unwrap()
            .entry(bucket.into())
            .or_default()
            .push(client);
    }

    /// Put a client into a named channel.
    pub fn join(&self, channel: impl Into<String>, client: TestClient) {
        self.channels
            .lock()
            .unwrap()
            .entry(channel.into())
            .or_default()
            .push(client);
    }

    /// Everything delivered so far, in order.
    pub fn deliveries(&self) -> Vec<Delivery<P>> {
        self.deliveries.lock().unwrap().clone()
    }

    /// Replies delivered to one client.
    pub fn replies_for(&self, client: TestClient) -> Vec<SyncReply<P>> {
        self.deliveries()
            .into_iter()
            .filter_map(|delivery| match delivery {
                Delivery::Reply { to, reply } if to == client => Some(reply),
                _ => None,
            })
            .collect()
    }

    /// Faults delivered to one client.
    pub fn faults_for(&self, client: TestClient) -> Vec<SyncFault> {
        self.deliveries()
            .into_iter()
            .filter_map(|delivery| match delivery {
                Delivery::Fault { to, fault } if to == client => Some(fault),
                _ => None,
            })
            .collect()
    }

    /// Notices delivered to one client.
    pub fn notices_for(&self, client: TestClient) -> Vec<SyncNotice<P>> {
        self.deliveries()
            .into_iter()
            .filter_map(|delivery| match delivery {
                Delivery::Notice { to, notice } if to == client => Some(notice),
                _ => None,
            })
            .collect()
    }

    /// Forget all recorded deliveries (membership is kept).
    pub fn clear(&self) {
        self.deliveries.lock().unwrap().clear();
    }

    fn members(&self, recipient: &Recipient<TestClient>) -> Vec<TestClient> {
        match recipient {
            Recipient::Bucket(name) => self
                .subscriptions
                .lock()
                .unwrap()
                .get(name)
                .cloned()
                .unwrap_or_default(),
            Recipient::Channel(name) => self
                .channels
                .lock()
                .unwrap()
                .get(name)
                .cloned()
                .unwrap_or_default(),
            Recipient::Client(client) => vec![*client],
        }
    }
}

impl<P: Payload> Transport<P> for MemoryTransport<P> {
    type Client = TestClient;

    async fn reply(&self, client: &TestClient, reply: SyncReply<P>) -> Result<(), BoxError> {
        self.deliveries.lock().unwrap().push(Delivery::Reply {
            to: *client,
            reply,
        });
        Ok(())
    }

    async fn reply_error(&self, client: &TestClient, fault: SyncFault) -> Result<(), BoxError> {
        self.deliveries.lock().unwrap().push(Delivery::Fault {
            to: *client,
            fault,
        });
        Ok(())
    }

    async fn publish(
        &self,
        recipient: &Recipient<TestClient>,
        notice: &SyncNotice<P>,
    ) -> Result<(), BoxError> {
        let members = self.members(recipient);
        let mut deliveries = self.deliveries.lock().unwrap();
        for member in members {
            deliveries.push(Delivery::Notice {
                to: member,
                notice: notice.clone(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Middleware doubles
// ============================================================================

/// A layer that always answers with a fixed result.
pub struct StaticMiddleware<P: Payload> {
    result: P,
}

impl<P: Payload> StaticMiddleware<P> {
    /// Answer every matching request with `result`.
    pub fn new(result: P) -> Self {
        Self { result }
    }
}

impl<P: Payload, C: ClientHandle> Middleware<P, C> for StaticMiddleware<P> {
    async fn handle(
        &self,
        _request: &Request<P, C>,
        response: &Responder<P>,
    ) -> Result<(), BoxError> {
        response.send(self.result.clone())?;
        Ok(())
    }
}

/// A layer that counts invocations and proceeds.
#[derive(Clone, Default)]
pub struct ProceedMiddleware {
    calls: Arc<AtomicUsize>,
}

impl ProceedMiddleware {
    /// Create a fresh counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many requests reached this layer.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<P: Payload, C: ClientHandle> Middleware<P, C> for ProceedMiddleware {
    async fn handle(
        &self,
        _request: &Request<P, C>,
        _response: &Responder<P>,
    ) -> Result<(), BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A layer that records its id in a shared order log and proceeds.
pub struct OrderRecordingMiddleware {
    /// This layer's id.
    pub id: usize,
    /// Shared execution log.
    pub order: Arc<Mutex<Vec<usize>>>,
}

impl<P: Payload, C: ClientHandle> Middleware<P, C> for OrderRecordingMiddleware {
    async fn handle(
        &self,
        _request: &Request<P, C>,
        _response: &Responder<P>,
    ) -> Result<(), BoxError> {
        self.order.lock().unwrap().push(self.id);
        Ok(())
    }
}

/// A layer that aborts the chain with a fixed error message.
pub struct FailingMiddleware {
    message: String,
}

impl FailingMiddleware {
    /// Abort every matching request with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl<P: Payload, C: ClientHandle> Middleware<P, C> for FailingMiddleware {
    async fn handle(
        &self,
        _request: &Request<P, C>,
        _response: &Responder<P>,
    ) -> Result<(), BoxError> {
        Err(self.message.clone().into())
    }
}

// ============================================================================
// Listener doubles
// ============================================================================

/// Records every sync event emitted on a bucket.
pub struct RecordingSyncListener<P: Payload, C: ClientHandle> {
    records: Arc<Mutex<Vec<(C, String, String, P)>>>,
}

impl<P: Payload, C: ClientHandle> RecordingSyncListener<P, C> {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Recorded `(client, bucket, action, result)` tuples, in emission order.
    pub fn records(&self) -> Vec<(C, String, String, P)> {
        self.records.lock().unwrap().clone()
    }

    /// Number of recorded events.
    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl<P: Payload, C: ClientHandle> Default for RecordingSyncListener<P, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Payload, C: ClientHandle> Clone for RecordingSyncListener<P, C> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
        }
    }
}

impl<P: Payload, C: ClientHandle> SyncListener<P, C>
    for RecordingSyncListener<P, C>
{
    async fn on_sync(&self, sync: &SyncEvent<P, C>) -> Result<(), BoxError> {
        self.records.lock().unwrap().push((
            sync.client().clone(),
            sync.bucket().to_string(),
            sync.action().to_string(),
            sync.result().clone(),
        ));
        Ok(())
    }
}

/// A sync listener that always calls [`SyncEvent::stop`].
pub struct StoppingSyncListener;

impl<P: Payload, C: ClientHandle> SyncListener<P, C> for StoppingSyncListener {
    async fn on_sync(&self, sync: &SyncEvent<P, C>) -> Result<(), BoxError> {
        sync.stop();
        Ok(())
    }
}

/// A sync listener that redirects the broadcast to fixed targets.
pub struct RedirectingSyncListener<C> {
    targets: Vec<Recipient<C>>,
}

impl<C> RedirectingSyncListener<C> {
    /// Redirect every sync on the bucket to `targets`.
    pub fn new(targets: Vec<Recipient<C>>) -> Self {
        Self { targets }
    }
}

impl<P: Payload, C: ClientHandle> SyncListener<P, C>
    for RedirectingSyncListener<C>
{
    async fn on_sync(&self, sync: &SyncEvent<P, C>) -> Result<(), BoxError> {
        sync.notify(self.targets.clone());
        Ok(())
    }
}

/// A sync listener that always fails, for isolation tests.
pub struct FailingSyncListener;

impl<P: Payload, C: ClientHandle> SyncListener<P, C> for FailingSyncListener {
    async fn on_sync(&self, _sync: &SyncEvent<P, C>) -> Result<(), BoxError> {
        Err("listener exploded".into())
    }
}

/// Records every client that connects to a bucket.
pub struct RecordingConnectionListener<C> {
    clients: Arc<Mutex<Vec<C>>>,
}

impl<C> RecordingConnectionListener<C> {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self {
            clients: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<C: Clone> RecordingConnectionListener<C> {
    /// Clients seen so far, in attachment order.
    pub fn clients(&self) -> Vec<C> {
        self.clients.lock().unwrap().clone()
    }
}

impl<C> Default for RecordingConnectionListener<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for RecordingConnectionListener<C> {
    fn clone(&self) -> Self {
        Self {
            clients: self.clients.clone(),
        }
    }
}

impl<P: Payload, C: ClientHandle> ConnectionListener<P, C>
    for RecordingConnectionListener<C>
{
    async fn on_connection(&self, _bucket: &Bucket<P, C>, client: &C) -> Result<(), BoxError> {
        self.clients.lock().unwrap().push(client.clone());
        Ok(())
    }
}
