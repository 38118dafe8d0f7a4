//! Transport collaborator traits.
//!
//! The dispatch core does not own connections, framing or rooms. It consumes
//! a [`Transport`] through three narrow operations: answer one client with a
//! reply or a fault, and publish a notice to a [`Recipient`]. Inbound
//! delivery goes the other way — the transport glue calls
//! `SyncDispatcher::dispatch` / `SyncDispatcher::connection` as messages and
//! attachments arrive.

use crate::{
    envelope::{SyncFault, SyncNotice, SyncReply},
    error::BoxError,
    payload::Payload,
};
use std::{future::Future, hash::Hash, pin::Pin};

/// A marker trait for the opaque per-connection client handle.
///
/// Handles are cheap identifiers (an id, an `Arc`-backed session, ...), not
/// the connection itself. Blanket-implemented for every qualifying type.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid ClientHandle",
    label = "must be `Clone + Eq + Hash + Debug + Send + Sync + 'static`",
    note = "Client handles are compared, hashed and logged by the dispatch core."
)]
pub trait ClientHandle:
    Clone + PartialEq + Eq + Hash + std::fmt::Debug + Send + Sync + 'static
{
}

impl<T> ClientHandle for T where
    T: Clone + PartialEq + Eq + Hash + std::fmt::Debug + Send + Sync + 'static
{
}

/// A fan-out target for a sync notice.
///
/// The default notification target is the whole bucket; listeners may
/// redirect to named channels (transport rooms) or individual clients via
/// `SyncEvent::notify`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient<C> {
    /// Every client currently subscribed to the named bucket.
    Bucket(String),

    /// Every client in a transport-defined named channel ("room").
    Channel(String),

    /// A single client.
    Client(C),
}

impl<C> Recipient<C> {
    /// Address every subscriber of `bucket`.
    pub fn bucket(name: impl Into<String>) -> Self {
        Recipient::Bucket(name.into())
    }

    /// Address a named channel.
    pub fn channel(name: impl Into<String>) -> Self {
        Recipient::Channel(name.into())
    }
}

/// The outbound half of the real-time transport.
///
/// Implementations are expected to treat an undeliverable send (client gone
/// mid-chain) as a no-op `Ok(())` or a non-fatal `Err`; the dispatcher logs
/// transport failures and moves on, it never aborts a dispatch over them.
///
/// # Static vs dynamic dispatch
///
/// This trait uses native `async fn` for static dispatch. For trait objects
/// (e.g. storing adapters heterogeneously) use [`DynTransport`].
pub trait Transport<P: Payload>: Send + Sync + 'static {
    /// The opaque client connection handle this transport hands out.
    type Client: ClientHandle;

    /// Answer one client's sync request with a success reply.
    fn reply(
        &self,
        client: &Self::Client,
        reply: SyncReply<P>,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;

    /// Answer one client's sync request with a fault.
    fn reply_error(
        &self,
        client: &Self::Client,
        fault: SyncFault,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;

    /// Deliver a notice to every client addressed by `recipient`.
    ///
    /// The transport owns subscriber enumeration: `Recipient::Bucket` means
    /// "all current subscribers of that bucket" at delivery time.
    fn publish(
        &self,
        recipient: &Recipient<Self::Client>,
        notice: &SyncNotice<P>,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Dynamic object-safe version of [`Transport`].
pub trait DynTransport<P: Payload>: Send + Sync + 'static {
    /// The opaque client connection handle this transport hands out.
    type Client: ClientHandle;

    /// Answer one client's sync request with a success reply (dynamic dispatch version).
    fn reply_dyn<'a>(
        &'a self,
        client: &'a Self::Client,
        reply: SyncReply<P>,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>>;

    /// Answer one client's sync request with a fault (dynamic dispatch version).
    fn reply_error_dyn<'a>(
        &'a self,
        client: &'a Self::Client,
        fault: SyncFault,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>>;

    /// Deliver a notice to every client addressed by `recipient` (dynamic dispatch version).
    fn publish_dyn<'a>(
        &'a self,
        recipient: &'a Recipient<Self::Client>,
        notice: &'a SyncNotice<P>,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>>;
}

// Blanket implementation: any Transport is usable as a DynTransport.
impl<P: Payload, T: Transport<P>> DynTransport<P> for T {
    type Client = T::Client;

    fn reply_dyn<'a>(
        &'a self,
        client: &'a Self::Client,
        reply: SyncReply<P>,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>> {
        Box::pin(self.reply(client, reply))
    }

    fn reply_error_dyn<'a>(
        &'a self,
        client: &'a Self::Client,
        fault: SyncFault,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>> {
        Box::pin(self.reply_error(client, fault))
    }

    fn publish_dyn<'a>(
        &'a self,
        recipient: &'a Recipient<Self::Client>,
        notice: &'a SyncNotice<P>,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>> {
        Box::pin(self.publish(recipient, notice))
    }
}
