//! Chain execution: the explicit cursor over a bucket's middleware snapshot.

use crate::{
    middleware::{ActionFilter, DynMiddleware},
    request::Request,
    response::{Outcome, Responder},
};
use std::sync::Arc;
use syncbus_core::{ClientHandle, DispatchError, Payload};

/// One registered layer: its filter plus the middleware itself.
pub(crate) struct ChainEntry<P: Payload, C: ClientHandle> {
    pub(crate) filter: ActionFilter,
    pub(crate) layer: Arc<dyn DynMiddleware<P, C>>,
}

impl<P: Payload, C: ClientHandle> Clone for ChainEntry<P, C> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            layer: Arc::clone(&self.layer),
        }
    }
}

/// An immutable snapshot of a bucket's middleware list, taken once per
/// dispatch so the execution sees a stable chain for its full run.
pub(crate) struct Chain<P: Payload, C: ClientHandle> {
    entries: Vec<ChainEntry<P, C>>,
}

impl<P: Payload, C: ClientHandle> Chain<P, C> {
    pub(crate) fn new(entries: Vec<ChainEntry<P, C>>) -> Self {
        Self { entries }
    }

    /// Run matching layers in insertion order until one settles the response
    /// or aborts.
    ///
    /// Non-matching layers are skipped entirely. Each layer is awaited before
    /// the next starts, so layers of one execution never run concurrently;
    /// suspension inside a layer only yields to *other* chain executions.
    pub(crate) async fn execute(&self, request: &Request<P, C>) -> Outcome<P> {
        let responder = Responder::new();

        for entry in self
            .entries
            .iter()
            .filter(|entry| entry.filter.matches(request.action()))
        {
            match entry.layer.handle_dyn(request, &responder).await {
                Ok(()) => {
                    if let Some(outcome) = responder.take() {
                        return outcome;
                    }
                    // Layer proceeded; on to the next matching one.
                }
                Err(err) => {
                    if responder.is_settled() {
                        // The layer answered the request and then errored
                        // (typically by propagating AlreadyCompleted from a
                        // second terminal call). Keep the first outcome.
                        tracing::error!(
                            bucket = request.bucket().name(),
                            action = request.action(),
                            error = %err,
                            "middleware errored after the response settled"
                        );
                        if let Some(outcome) = responder.take() {
                            return outcome;
                        }
                    }
                    return Outcome::Failed(err);
                }
            }
        }

        Outcome::Failed(Box::new(DispatchError::ChainExhausted))
    }
}
