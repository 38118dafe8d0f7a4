//! # Middleware Layer
//!
//! The unit of request processing in syncbus. A bucket's chain is an ordered,
//! append-only list of middleware, each optionally filtered to a subset of
//! actions.
//!
//! # Contract
//!
//! A layer receives the immutable [`Request`] and the single-use
//! [`Responder`] and does exactly one of three things:
//!
//! - return `Ok(())` **without** settling the responder — proceed to the next
//!   matching layer;
//! - return `Err(e)` — abort the chain; the error is delivered to the
//!   originating client only;
//! - settle the responder with [`Responder::send`] or [`Responder::error`] —
//!   terminal; no further layers run.
//!
//! A layer may do arbitrary async work before deciding: the chain driver
//! awaits each layer in turn, so layers of one execution never overlap while
//! independent executions interleave freely.
//!
//! # Static vs dynamic dispatch
//!
//! [`Middleware`] uses native `async fn` for static dispatch. Buckets store
//! layers heterogeneously as [`DynMiddleware`] trait objects; the blanket
//! implementation converts automatically.

mod logging;

pub use logging::LoggingMiddleware;

use crate::{request::Request, response::Responder};
use std::{collections::HashSet, future::Future, pin::Pin};
use syncbus_core::{BoxError, ClientHandle, Payload};

/// Which actions a layer participates in.
///
/// A filtered layer is skipped entirely for non-matching actions: it does not
/// count toward chain position and cannot abort or answer those requests.
#[derive(Debug, Clone, Default)]
pub enum ActionFilter {
    /// Match every action.
    #[default]
    All,

    /// Match only the named actions.
    Only(HashSet<String>),
}

impl ActionFilter {
    /// Build a filter from a list of action names.
    ///
    /// An empty list matches all actions, same as [`ActionFilter::All`].
    pub fn only<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: HashSet<String> = actions.into_iter().map(Into::into).collect();
        if set.is_empty() {
            ActionFilter::All
        } else {
            ActionFilter::Only(set)
        }
    }

    /// Whether a request with `action` passes this filter.
    pub fn matches(&self, action: &str) -> bool {
        match self {
            ActionFilter::All => true,
            ActionFilter::Only(actions) => actions.contains(action),
        }
    }
}

/// One step of a bucket's handler chain.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Middleware<{P}, {C}>`",
    label = "missing `Middleware` implementation",
    note = "Middleware must implement `handle` for the bucket's payload type `{P}`."
)]
pub trait Middleware<P: Payload, C: ClientHandle>: Send + Sync + 'static {
    /// Process one request.
    ///
    /// See the [module docs](self) for the proceed / abort / respond
    /// contract.
    fn handle(
        &self,
        request: &Request<P, C>,
        response: &Responder<P>,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Dynamic object-safe version of [`Middleware`].
///
/// Buckets store their chain as `Arc<dyn DynMiddleware>`; any [`Middleware`]
/// implementation converts via the blanket impl.
pub trait DynMiddleware<P: Payload, C: ClientHandle>: Send + Sync + 'static {
    /// Process one request (dynamic dispatch version).
    fn handle_dyn<'a>(
        &'a self,
        request: &'a Request<P, C>,
        response: &'a Responder<P>,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>>;
}

// Blanket implementation: any Middleware is usable as DynMiddleware.
impl<P: Payload, C: ClientHandle, M: Middleware<P, C>> DynMiddleware<P, C> for M {
    fn handle_dyn<'a>(
        &'a self,
        request: &'a Request<P, C>,
        response: &'a Responder<P>,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>> {
        Box::pin(self.handle(request, response))
    }
}

// Allow Box<dyn DynMiddleware> where Middleware is expected.
impl<P: Payload, C: ClientHandle> Middleware<P, C> for Box<dyn DynMiddleware<P, C>> {
    async fn handle(
        &self,
        request: &Request<P, C>,
        response: &Responder<P>,
    ) -> Result<(), BoxError> {
        self.handle_dyn(request, response).await
    }
}
