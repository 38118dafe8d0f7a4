//! The dispatcher: inbound message → bucket → chain → notification.

use crate::{
    bucket::Bucket,
    registry::BucketRegistry,
    request::Request,
    response::Outcome,
    sync::SyncEvent,
};
use futures::future::join_all;
use std::sync::Arc;
use syncbus_core::{
    DispatchError, Payload, SyncFault, SyncNotice, SyncReply, SyncRequest, Transport,
};

/// Drives the full lifecycle of inbound sync messages.
///
/// The transport glue calls [`connection`](Self::connection) when a client
/// attaches to a bucket's namespace and [`dispatch`](Self::dispatch) for each
/// inbound message. Everything else — request construction, chain execution,
/// reply/fault delivery and the notification protocol — happens here.
///
/// # Outcome policies (documented and tested)
///
/// - A `sync` event is emitted for **successful** outcomes only. Errors are
///   answered to the originating client and never reach sync listeners or
///   other clients.
/// - The default broadcast goes to all current subscribers of the bucket,
///   **including** the initiating client.
/// - Transport delivery failures (client gone mid-chain) are logged and
///   otherwise treated as no-ops.
pub struct SyncDispatcher<P: Payload, T: Transport<P>> {
    registry: Arc<BucketRegistry<P, T::Client>>,
    transport: Arc<T>,
}

impl<P: Payload, T: Transport<P>> SyncDispatcher<P, T> {
    /// Build a dispatcher over a configured registry and a transport.
    pub fn new(registry: Arc<BucketRegistry<P, T::Client>>, transport: Arc<T>) -> Self {
        Self {
            registry,
            transport,
        }
    }

    /// The bucket registry this dispatcher serves.
    pub fn registry(&self) -> &Arc<BucketRegistry<P, T::Client>> {
        &self.registry
    }

    /// Convenience pass-through to [`BucketRegistry::bucket`].
    pub fn bucket(&self, name: &str) -> Arc<Bucket<P, T::Client>> {
        self.registry.bucket(name)
    }

    /// Handle one inbound sync message from `client` targeting `bucket_name`.
    ///
    /// Never returns an error to the caller: every outcome is either answered
    /// to the client or logged. One failing dispatch is fully isolated from
    /// other in-flight chains.
    pub async fn dispatch(&self, bucket_name: &str, message: SyncRequest<P>, client: T::Client) {
        if message.action.is_empty() {
            tracing::warn!(bucket = bucket_name, client = ?client, "rejecting message without an action");
            self.fault(&client, &DispatchError::MissingAction).await;
            return;
        }

        let bucket = match self.registry.resolve(bucket_name) {
            Ok(bucket) => bucket,
            Err(err) => {
                tracing::warn!(bucket = bucket_name, client = ?client, "rejecting message for unknown bucket");
                self.fault(&client, &err).await;
                return;
            }
        };

        tracing::debug!(
            bucket = bucket.name(),
            action = %message.action,
            client = ?client,
            "dispatching sync request"
        );

        let chain = bucket.chain();
        let request = Request::new(message, Arc::clone(&bucket), client.clone());

        match chain.execute(&request).await {
            Outcome::Sent(result) => {
                if let Err(err) = self
                    .transport
                    .reply(&client, SyncReply {
                        result: result.clone(),
                    })
                    .await
                {
                    tracing::warn!(client = ?client, error = %err, "reply undeliverable");
                }
                self.emit_sync(&bucket, request.action().to_string(), client, result)
                    .await;
            }
            Outcome::Failed(err) => {
                // Errors go to the originating client only; no sync event,
                // no broadcast of any kind.
                self.fault(&client, err.as_ref()).await;
            }
        }
    }

    /// Emit `connection` on the bucket for a newly attached client.
    ///
    /// Call this before dispatching any sync traffic for the client. Listener
    /// completion does not gate subsequent dispatch; a listener doing
    /// asynchronous setup must tolerate an early first request.
    pub async fn connection(&self, bucket_name: &str, client: T::Client) {
        let bucket = match self.registry.resolve(bucket_name) {
            Ok(bucket) => bucket,
            Err(err) => {
                tracing::warn!(bucket = bucket_name, client = ?client, error = %err, "ignoring connection to unknown bucket");
                return;
            }
        };

        for listener in bucket.connection_listener_snapshot() {
            if let Err(err) = listener.on_connection_dyn(&bucket, &client).await {
                tracing::error!(
                    bucket = bucket.name(),
                    client = ?client,
                    error = %err,
                    "connection listener failed; continuing"
                );
            }
        }
    }

    /// Run the post-response notification protocol for a successful outcome.
    async fn emit_sync(
        &self,
        bucket: &Arc<Bucket<P, T::Client>>,
        action: String,
        client: T::Client,
        result: P,
    ) {
        let event = SyncEvent::new(client, bucket.name().to_string(), action, result);

        for listener in bucket.sync_listener_snapshot() {
            if let Err(err) = listener.on_sync_dyn(&event).await {
                tracing::error!(
                    bucket = bucket.name(),
                    action = event.action(),
                    error = %err,
                    "sync listener failed; continuing"
                );
            }
        }

        let notice = SyncNotice {
            bucket: event.bucket().to_string(),
            action: event.action().to_string(),
            result: event.result().clone(),
        };

        let Some(targets) = event.into_targets() else {
            tracing::debug!(bucket = %notice.bucket, action = %notice.action, "broadcast stopped by listener");
            return;
        };

        let results = join_all(
            targets
                .iter()
                .map(|target| self.transport.publish(target, &notice)),
        )
        .await;

        for (target, delivery) in targets.iter().zip(results) {
            if let Err(err) = delivery {
                tracing::warn!(?target, error = %err, "notice undeliverable");
            }
        }
    }

    async fn fault(&self, client: &T::Client, err: &(dyn std::error::Error + Send + Sync)) {
        if let Err(transport_err) = self
            .transport
            .reply_error(client, SyncFault::new(err))
            .await
        {
            tracing::warn!(client = ?client, error = %transport_err, "fault undeliverable");
        }
    }
}
